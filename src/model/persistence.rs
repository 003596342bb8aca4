use std::path::{Path, PathBuf};

use log::warn;
use rocket::serde::json::serde_json;
use rocket::tokio::fs;

use crate::error::Result;

use super::registry::VoterRegistry;

/// The flat JSON document holding every voter and the site statistics.
///
/// The whole document is rewritten on every save; there is no locking or
/// atomic replace.
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document.
    pub async fn try_load(&self) -> Result<VoterRegistry> {
        let raw = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Read the document, starting from an empty registry if it is absent or
    /// unreadable.
    pub async fn load(&self) -> VoterRegistry {
        match self.try_load().await {
            Ok(registry) => registry,
            Err(e) => {
                warn!(
                    "No usable data file at {} ({e}), starting fresh",
                    self.path.display()
                );
                VoterRegistry::default()
            }
        }
    }

    /// Overwrite the document with pretty-printed JSON.
    pub async fn save(&self, registry: &VoterRegistry) -> Result<()> {
        let raw = serde_json::to_string_pretty(registry)?;
        fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::{stats::AggregateStats, voter::Registration};

    fn scratch_file(name: &str) -> DataFile {
        let random: u32 = rand::random();
        DataFile::new(std::env::temp_dir().join(format!("ourvoice-{name}-{random}.json")))
    }

    #[rocket::async_test]
    async fn missing_file_starts_empty() {
        let file = scratch_file("missing");
        assert!(file.try_load().await.is_err());

        let registry = file.load().await;
        assert!(registry.voters.is_empty());
        assert_eq!(registry.stats, AggregateStats::default());
    }

    #[rocket::async_test]
    async fn corrupt_file_starts_empty() {
        let file = scratch_file("corrupt");
        fs::write(file.path(), "{ not json").await.unwrap();

        let registry = file.load().await;
        assert!(registry.voters.is_empty());

        fs::remove_file(file.path()).await.unwrap();
    }

    #[rocket::async_test]
    async fn saved_document_is_reloaded() {
        let file = scratch_file("saved");
        // Persisted timestamps carry millisecond precision.
        let now = Utc
            .timestamp_millis_opt(Utc::now().timestamp_millis())
            .unwrap();
        let mut registry = VoterRegistry::default();
        registry.register(Registration::example(), now).unwrap();
        file.save(&registry).await.unwrap();

        let raw = fs::read_to_string(file.path()).await.unwrap();
        assert!(raw.starts_with("{\n  \"voters\": ["));

        let reloaded = file.load().await;
        assert_eq!(reloaded.voters, registry.voters);
        assert_eq!(reloaded.stats.registered_voters, 1);

        fs::remove_file(file.path()).await.unwrap();
    }

    #[rocket::async_test]
    async fn partial_document_is_merged_with_defaults() {
        let file = scratch_file("partial");
        fs::write(file.path(), r#"{"stats": {"totalBallots": 7}}"#)
            .await
            .unwrap();

        let registry = file.load().await;
        assert!(registry.voters.is_empty());
        assert_eq!(registry.stats.total_ballots, 7);
        assert_eq!(registry.stats.turnout_2020, 66.8);

        fs::remove_file(file.path()).await.unwrap();
    }

    #[rocket::async_test]
    async fn unwritable_path_is_an_error() {
        let file = DataFile::new(std::env::temp_dir().join("ourvoice-no-such-dir/data.json"));
        assert!(file.save(&VoterRegistry::default()).await.is_err());
    }
}
