use std::io::ErrorKind;

use chrono::Utc;
use rocket::{fs::NamedFile, serde::json::Json, tokio::fs, Route, State};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{Error, Result},
    model::{
        envelope::Envelope,
        polling::{AddressQuery, PollingPlace},
        registry::Registry,
        stats::AggregateStats,
        timestamp,
    },
};

pub fn routes() -> Vec<Route> {
    routes![index, health, stats, polling_place]
}

/// Liveness report. Unlike other responses the timestamp sits beside the
/// message rather than under `data`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

#[get("/")]
async fn index(config: &State<Config>) -> Result<NamedFile> {
    let path = config.index_file();
    let page_not_found = || Error::NotFound("Page not found".to_string());
    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => Ok(NamedFile::open(path).await?),
        Ok(_) => Err(page_not_found()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(page_not_found()),
        Err(e) => Err(e.into()),
    }
}

#[get("/api/health")]
fn health() -> Json<Health> {
    Json(Health {
        success: true,
        message: "Server is running".to_string(),
        timestamp: timestamp::format(&Utc::now()),
    })
}

/// Static figures plus voter counts taken from the records themselves.
#[get("/api/stats")]
async fn stats(registry: &State<Registry>) -> Json<Envelope<AggregateStats>> {
    let stats = registry.read(|voters| voters.live_stats()).await;
    Json(Envelope::data(stats))
}

#[post("/api/polling-place", data = "<query>")]
fn polling_place(query: Json<AddressQuery>) -> Result<Json<Envelope<PollingPlace>>> {
    let place = query.resolve()?;
    Ok(Json(Envelope::data(place)))
}
