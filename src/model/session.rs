use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use rocket::tokio::sync::Mutex;
use serde::{Deserialize, Serialize};

use crate::model::{random_base36, timestamp};

/// An opaque admin bearer token: `admin_<epoch-ms>_<9 base-36 chars>`.
/// Tokens carry no signature and never expire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Mint a fresh token.
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!(
            "admin_{}_{}",
            now.timestamp_millis(),
            random_base36(9)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `Authorization` header value presenting this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl Display for SessionToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub username: String,
    #[serde(with = "timestamp")]
    pub login_time: DateTime<Utc>,
}

/// Live admin sessions, keyed by token. Nothing here is persisted, so a
/// restart logs every admin out.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionToken, AdminSession>>,
}

impl SessionStore {
    /// Start a session for `username` and return its token.
    pub async fn open(&self, username: &str) -> SessionToken {
        let now = Utc::now();
        let token = SessionToken::generate(now);
        let session = AdminSession {
            username: username.to_string(),
            login_time: now,
        };
        self.sessions.lock().await.insert(token.clone(), session);
        token
    }

    pub async fn get(&self, token: &SessionToken) -> Option<AdminSession> {
        self.sessions.lock().await.get(token).cloned()
    }

    /// End a session. Returns whether the token was live; closing an unknown
    /// token is not an error.
    pub async fn close(&self, token: &SessionToken) -> bool {
        self.sessions.lock().await.remove(token).is_some()
    }

    pub async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
