use std::path::{Path, PathBuf};

use log::{error, info, warn};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{credentials::AdminCredentials, persistence::DataFile, registry::Registry};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_index_file")]
    index_file: PathBuf,
    #[serde(default = "default_admin_username")]
    admin_username: String,
    // secrets
    #[serde(default = "default_admin_password")]
    admin_password: String,
    #[serde(default)]
    admin_password_hash: Option<String>,
    // development
    #[serde(default)]
    expose_errors: bool,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_index_file() -> PathBuf {
    PathBuf::from("new.html")
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

impl Config {
    /// The static page served at `/`.
    pub fn index_file(&self) -> &Path {
        &self.index_file
    }

    pub fn admin_username(&self) -> &str {
        &self.admin_username
    }

    /// Plaintext admin password, used only if no hash is configured.
    pub fn admin_password(&self) -> &str {
        &self.admin_password
    }

    /// Argon2 encoded admin password hash.
    pub fn admin_password_hash(&self) -> Option<&str> {
        self.admin_password_hash.as_deref()
    }

    /// Whether internal error details are included in 500 responses.
    pub fn expose_errors(&self) -> bool {
        self.expose_errors
    }
}

/// A fairing that loads the application config and puts it, along with the
/// admin credentials it describes, in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        if config.admin_password_hash().is_none()
            && config.admin_password() == default_admin_password()
        {
            warn!("Admin login is using the default password, set `admin_password_hash`");
        }

        // Manage the state.
        let credentials = AdminCredentials::from_config(&config);
        rocket = rocket.manage(credentials).manage(config);
        Ok(rocket)
    }
}

/// Configuration for the registry: where voters and statistics are persisted.
#[derive(Deserialize)]
struct RegistryConfig {
    #[serde(default = "default_data_file")]
    data_file: PathBuf,
}

/// A fairing that loads the registry from the data file and places it into
/// managed state. An absent or unreadable file yields an empty registry.
pub struct RegistryFairing;

#[rocket::async_trait]
impl Fairing for RegistryFairing {
    fn info(&self) -> Info {
        Info {
            name: "Voter registry",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<RegistryConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load registry config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loading registry...");
        let registry = Registry::load(DataFile::new(config.data_file)).await;
        info!("...registry online!");

        // Manage the state.
        rocket = rocket.manage(registry);
        Ok(rocket)
    }
}
