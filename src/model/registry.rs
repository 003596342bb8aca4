use chrono::{DateTime, Utc};
use log::{error, info};
use rocket::tokio::sync::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{
    persistence::DataFile,
    stats::AggregateStats,
    voter::{Registered, Registration, StatusLookup, VoterRecord, VoterStatus},
};

/// Every registered voter plus the site statistics. This is also the exact
/// shape of the data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoterRegistry {
    #[serde(default)]
    pub voters: Vec<VoterRecord>,
    #[serde(default)]
    pub stats: AggregateStats,
}

impl VoterRegistry {
    /// The first voter matching any key of the lookup.
    pub fn find(&self, lookup: &StatusLookup) -> Option<&VoterRecord> {
        self.voters.iter().find(|voter| lookup.matches(voter))
    }

    pub fn find_by_id(&self, voter_id: &str) -> Option<&VoterRecord> {
        self.voters.iter().find(|voter| voter.voter_id == voter_id)
    }

    pub fn active_count(&self) -> usize {
        self.voters
            .iter()
            .filter(|voter| voter.status == VoterStatus::Active)
            .count()
    }

    /// Add a pending voter.
    ///
    /// A voter is a duplicate if any existing record, whatever its status,
    /// shares the email address or a non-null SSN suffix.
    /// Only `registeredVoters` is refreshed here.
    pub fn register(&mut self, registration: Registration, now: DateTime<Utc>) -> Result<Registered> {
        let ssn = registration.ssn_suffix();
        let record = registration.into_record(now)?;

        let duplicate = self.voters.iter().any(|voter| {
            voter.email == record.email
                || (voter.ssn.is_some() && voter.ssn.as_deref() == ssn.as_deref())
        });
        if duplicate {
            return Err(Error::Conflict("Voter already registered".to_string()));
        }

        let registered = Registered {
            voter_id: record.voter_id.clone(),
            status: record.status,
        };
        self.voters.push(record);
        self.stats.registered_voters = self.voters.len();
        Ok(registered)
    }

    /// Overwrite a voter's status. Any transition is allowed.
    /// Only `activeVoters` is refreshed here.
    pub fn set_status(&mut self, voter_id: &str, status: VoterStatus) -> Result<VoterRecord> {
        let voter = self
            .voters
            .iter_mut()
            .find(|voter| voter.voter_id == voter_id)
            .ok_or_else(|| Error::NotFound("Voter not found".to_string()))?;
        voter.status = status;
        let updated = voter.clone();
        self.stats.active_voters = self.active_count();
        Ok(updated)
    }

    /// Statistics with both voter counters computed from the current records.
    pub fn live_stats(&self) -> AggregateStats {
        AggregateStats {
            registered_voters: self.voters.len(),
            active_voters: self.active_count(),
            ..self.stats.clone()
        }
    }
}

/// The registry as managed state: the in-memory copy plus the file it is
/// flushed to after every mutation.
pub struct Registry {
    voters: Mutex<VoterRegistry>,
    file: DataFile,
}

impl Registry {
    pub fn new(voters: VoterRegistry, file: DataFile) -> Self {
        Self {
            voters: Mutex::new(voters),
            file,
        }
    }

    /// Load the registry from `file`, or start empty.
    pub async fn load(file: DataFile) -> Self {
        let voters = file.load().await;
        info!(
            "Loaded {} voters ({} active) from {}",
            voters.voters.len(),
            voters.stats.active_voters,
            file.path().display()
        );
        Self::new(voters, file)
    }

    /// Run a read-only operation.
    pub async fn read<T>(&self, op: impl FnOnce(&VoterRegistry) -> T) -> T {
        let voters = self.voters.lock().await;
        op(&voters)
    }

    /// Run a mutation and, if it succeeds, save the whole registry.
    ///
    /// Save failures are logged and otherwise ignored: the mutation stands in
    /// memory and the caller still sees success.
    pub async fn update<T>(&self, op: impl FnOnce(&mut VoterRegistry) -> Result<T>) -> Result<T> {
        let mut voters = self.voters.lock().await;
        let output = op(&mut voters)?;
        if let Err(e) = self.file.save(&voters).await {
            error!(
                "Failed to save data file {}: {e}",
                self.file.path().display()
            );
        }
        Ok(output)
    }
}
