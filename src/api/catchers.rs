use rocket::{
    http::Status,
    response::status,
    serde::json::Json,
    Catcher, Request,
};

use crate::model::{auth::UNAUTHORIZED, envelope::Envelope};

pub fn catchers() -> Vec<Catcher> {
    catchers![
        bad_request,
        unauthorized,
        not_found,
        payload_too_large,
        unprocessable,
        internal
    ]
}

#[catch(400)]
fn bad_request() -> Json<Envelope<()>> {
    Json(Envelope::failure("Malformed request", None))
}

#[catch(401)]
fn unauthorized() -> Json<Envelope<()>> {
    Json(Envelope::failure(UNAUTHORIZED, None))
}

#[catch(404)]
fn not_found(req: &Request<'_>) -> Json<Envelope<()>> {
    Json(Envelope::failure(format!("No route for {}", req.uri()), None))
}

#[catch(413)]
fn payload_too_large() -> Json<Envelope<()>> {
    Json(Envelope::failure("Request body too large", None))
}

/// Rocket reports a body that fails to parse as 422; clients see a 400.
#[catch(422)]
fn unprocessable() -> status::Custom<Json<Envelope<()>>> {
    status::Custom(
        Status::BadRequest,
        Json(Envelope::failure("Malformed request body", None)),
    )
}

#[catch(500)]
fn internal() -> Json<Envelope<()>> {
    Json(Envelope::failure("Internal server error", None))
}
