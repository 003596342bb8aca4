use log::info;
use rocket::{serde::json::Json, Route, State};

use crate::{
    error::Result,
    model::{
        auth::AdminToken,
        envelope::Envelope,
        registry::Registry,
        voter::{StatusUpdate, VoterRecord, VoterStatus, VoterSummary},
    },
};

pub fn routes() -> Vec<Route> {
    routes![voters, approve, reject, update_status]
}

#[get("/api/admin/voters")]
async fn voters(
    _token: AdminToken,
    registry: &State<Registry>,
) -> Json<Envelope<Vec<VoterSummary>>> {
    let summaries: Vec<VoterSummary> = registry
        .read(|voters| voters.voters.iter().map(VoterSummary::from).collect())
        .await;
    Json(Envelope::data(summaries))
}

#[post("/api/admin/voter/<voter_id>/approve")]
async fn approve(
    token: AdminToken,
    voter_id: &str,
    registry: &State<Registry>,
) -> Result<Json<Envelope<VoterRecord>>> {
    let voter = set_status(&token, registry, voter_id, VoterStatus::Active).await?;
    Ok(Json(
        Envelope::data(voter).with_message("Voter approved successfully"),
    ))
}

#[post("/api/admin/voter/<voter_id>/reject")]
async fn reject(
    token: AdminToken,
    voter_id: &str,
    registry: &State<Registry>,
) -> Result<Json<Envelope<VoterRecord>>> {
    let voter = set_status(&token, registry, voter_id, VoterStatus::Rejected).await?;
    Ok(Json(
        Envelope::data(voter).with_message("Voter rejected successfully"),
    ))
}

/// Set any of the four statuses. The status is validated before the voter is
/// looked up.
#[put("/api/admin/voter/<voter_id>/status", data = "<update>")]
async fn update_status(
    token: AdminToken,
    voter_id: &str,
    update: Json<StatusUpdate>,
    registry: &State<Registry>,
) -> Result<Json<Envelope<VoterRecord>>> {
    let status = update.parse()?;
    let voter = set_status(&token, registry, voter_id, status).await?;
    Ok(Json(Envelope::data(voter).with_message("Voter status updated")))
}

async fn set_status(
    token: &AdminToken,
    registry: &Registry,
    voter_id: &str,
    status: VoterStatus,
) -> Result<VoterRecord> {
    let voter = registry
        .update(|voters| voters.set_status(voter_id, status))
        .await?;
    info!(
        "Admin {} set voter {voter_id} to {status}",
        token.session.username
    );
    Ok(voter)
}
