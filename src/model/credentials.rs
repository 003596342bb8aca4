use log::error;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// The body of an admin login request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// The single admin account the server accepts.
///
/// Either a plaintext password compared exactly, or an Argon2 encoded hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCredentials {
    Plaintext { username: String, password: String },
    Hashed { username: String, password_hash: String },
}

impl AdminCredentials {
    /// Build the credentials described by the application config. A configured
    /// hash takes precedence over a plaintext password.
    pub fn from_config(config: &Config) -> Self {
        match config.admin_password_hash() {
            Some(hash) => Self::Hashed {
                username: config.admin_username().to_string(),
                password_hash: hash.to_string(),
            },
            None => Self::Plaintext {
                username: config.admin_username().to_string(),
                password: config.admin_password().to_string(),
            },
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Self::Plaintext { username, .. } | Self::Hashed { username, .. } => username,
        }
    }

    /// Check a submitted username and password.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if username != self.username() {
            return false;
        }
        match self {
            Self::Plaintext {
                password: expected, ..
            } => password == expected,
            Self::Hashed { password_hash, .. } => {
                argon2::verify_encoded(password_hash, password.as_bytes()).unwrap_or_else(|e| {
                    error!("Configured admin password hash is malformed: {e}");
                    false
                })
            }
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use argon2::{Config as Argon2Config, Error as Argon2Error};
    use rand::Rng;

    use super::*;

    impl AdminCredentials {
        /// Hash `password` with a fresh random salt.
        pub fn hashed(username: String, password: &str) -> Result<Self, Argon2Error> {
            // 16 bytes is the recommended salt length for Argon2.
            let mut salt = [0_u8; 16];
            rand::thread_rng().fill(&mut salt);
            let password_hash =
                argon2::hash_encoded(password.as_bytes(), &salt, &Argon2Config::default())?;
            Ok(Self::Hashed {
                username,
                password_hash,
            })
        }

        pub fn example() -> Self {
            Self::Plaintext {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            }
        }

        /// The hash of the password "coordinator".
        pub fn hashed_example() -> Self {
            Self::Hashed {
                username: "coordinator".to_string(),
                password_hash: "$argon2i$v=19$m=4096,t=2,p=1$VzJlNzBsa0ZUeGFCNVVucA$01vYAqN0vTeqhZEzW7q9PWmrZlXtzQ/Ns7NkCNE2mA0".to_string(),
            }
        }
    }
}
