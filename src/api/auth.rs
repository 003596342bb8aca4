use log::{info, warn};
use rocket::{serde::json::Json, Route, State};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    model::{
        auth::BearerToken,
        credentials::{AdminCredentials, LoginRequest},
        envelope::Envelope,
        session::{SessionStore, SessionToken},
    },
};

pub fn routes() -> Vec<Route> {
    routes![login, logout]
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginData {
    pub token: SessionToken,
}

#[post("/api/admin/login", data = "<request>")]
pub async fn login(
    request: Json<LoginRequest>,
    credentials: &State<AdminCredentials>,
    sessions: &State<SessionStore>,
) -> Result<Json<Envelope<LoginData>>> {
    let (username, password) = match (request.username.as_deref(), request.password.as_deref()) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            (username, password)
        }
        _ => {
            return Err(Error::Unauthorized(
                "Username and password are required".to_string(),
            ))
        }
    };

    if !credentials.verify(username, password) {
        warn!("Failed admin login for {username:?}");
        return Err(Error::Unauthorized("Invalid credentials".to_string()));
    }

    let token = sessions.open(username).await;
    info!("Admin {username} logged in");
    Ok(Json(
        Envelope::data(LoginData { token }).with_message("Login successful"),
    ))
}

/// Ends the presented session, if any. Always succeeds.
#[post("/api/admin/logout")]
pub async fn logout(
    token: Option<BearerToken>,
    sessions: &State<SessionStore>,
) -> Json<Envelope<()>> {
    if let Some(BearerToken(token)) = token {
        if sessions.close(&token).await {
            info!("Admin session closed");
        }
    }
    Json(Envelope::ok("Logged out successfully"))
}
