use chrono::Utc;
use log::info;
use rocket::{http::Status, response::status, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{
        envelope::Envelope,
        registry::Registry,
        voter::{Registered, Registration, StatusLookup, StatusView},
    },
};

pub fn routes() -> Vec<Route> {
    routes![voter_status, register]
}

#[post("/api/voter/status", data = "<lookup>")]
async fn voter_status(
    lookup: Json<StatusLookup>,
    registry: &State<Registry>,
) -> Result<Json<Envelope<StatusView>>> {
    lookup.validate()?;
    let view = registry
        .read(|voters| voters.find(&lookup).map(StatusView::from))
        .await
        .ok_or_else(|| Error::NotFound("Voter not found".to_string()))?;
    Ok(Json(Envelope::data(view)))
}

#[post("/api/voter/register", data = "<registration>")]
async fn register(
    registration: Json<Registration>,
    registry: &State<Registry>,
) -> Result<status::Custom<Json<Envelope<Registered>>>> {
    let registered = registry
        .update(|voters| voters.register(registration.into_inner(), Utc::now()))
        .await?;
    info!("Registered voter {}", registered.voter_id);

    Ok(status::Custom(
        Status::Created,
        Json(Envelope::data(registered).with_message("Registration submitted successfully")),
    ))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::ContentType,
        local::asynchronous::Client,
        serde::json::serde_json::{json, Value},
    };

    use super::*;
    use crate::model::{persistence::DataFile, voter::VoterStatus};

    async fn register_example(client: &Client, registration: &Registration) -> Registered {
        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(registration).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Created, response.status());
        let envelope: Envelope<Registered> = response.into_json().await.unwrap();
        envelope.data.unwrap()
    }

    async fn lookup(client: &Client, body: Value) -> (Status, Envelope<StatusView>) {
        let response = client
            .post(uri!(voter_status))
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch()
            .await;
        let status = response.status();
        (status, response.into_json().await.unwrap())
    }

    #[backend_test]
    async fn register_new_voter(client: Client) {
        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(
                json!({
                    "firstName": "A",
                    "lastName": "B",
                    "email": "a@b.com",
                    "dateOfBirth": "2000-01-01",
                    "address": "1 St",
                    "city": "X",
                    "state": "Y",
                    "zipCode": "00000",
                })
                .to_string(),
            )
            .dispatch()
            .await;
        assert_eq!(Status::Created, response.status());

        let envelope: Envelope<Registered> = response.into_json().await.unwrap();
        assert!(envelope.success);
        assert_eq!(
            envelope.message.as_deref(),
            Some("Registration submitted successfully")
        );
        let registered = envelope.data.unwrap();
        assert_eq!(registered.status, VoterStatus::Pending);
        assert!(registered.voter_id.starts_with('V'));
        assert!(registered.voter_id.len() > 6);
    }

    #[backend_test]
    async fn register_twice_conflicts(client: Client) {
        register_example(&client, &Registration::example()).await;

        let response = client
            .post(uri!(register))
            .header(ContentType::JSON)
            .body(json!(Registration::example()).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Conflict, response.status());

        let envelope: Envelope<Value> = response.into_json().await.unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("Voter already registered"));
    }

    #[backend_test]
    async fn register_missing_field(client: Client) {
        for field in [
            "firstName",
            "lastName",
            "email",
            "dateOfBirth",
            "address",
            "city",
            "state",
            "zipCode",
        ] {
            let mut body = json!(Registration::example());
            body.as_object_mut().unwrap().remove(field);

            let response = client
                .post(uri!(register))
                .header(ContentType::JSON)
                .body(body.to_string())
                .dispatch()
                .await;
            assert_eq!(Status::BadRequest, response.status(), "without {field}");

            let envelope: Envelope<Value> = response.into_json().await.unwrap();
            assert_eq!(envelope.message.as_deref(), Some("Missing required fields"));
        }
    }

    #[backend_test]
    async fn registration_is_persisted(client: Client, data_file: DataFile) {
        let registered = register_example(&client, &Registration::example2()).await;

        let saved = data_file.try_load().await.unwrap();
        assert_eq!(saved.voters.len(), 1);
        assert_eq!(saved.stats.registered_voters, 1);
        let voter = &saved.voters[0];
        assert_eq!(voter.voter_id, registered.voter_id);
        assert_eq!(voter.ssn.as_deref(), Some("6789"));
        assert_eq!(voter.status, VoterStatus::Pending);
    }

    #[backend_test]
    async fn status_by_each_key(client: Client) {
        let registered = register_example(&client, &Registration::example2()).await;

        for body in [
            json!({ "voterId": registered.voter_id }),
            json!({ "email": "marge@example.com" }),
            json!({ "ssn": "6789" }),
            json!({ "ssn": "123-45-6789" }),
        ] {
            let (status, envelope) = lookup(&client, body).await;
            assert_eq!(Status::Ok, status);
            let view = envelope.data.unwrap();
            assert_eq!(view.voter_id, registered.voter_id);
            assert_eq!(view.status, VoterStatus::Pending);
            assert_eq!(view.polling_place, None);
        }
    }

    #[backend_test]
    async fn status_unknown_voter(client: Client) {
        register_example(&client, &Registration::example()).await;

        let (status, envelope) = lookup(&client, json!({ "email": "nobody@b.com" })).await;
        assert_eq!(Status::NotFound, status);
        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("Voter not found"));
    }

    #[backend_test]
    async fn status_without_keys(client: Client) {
        let (status, envelope) = lookup(&client, json!({})).await;
        assert_eq!(Status::BadRequest, status);
        assert_eq!(
            envelope.message.as_deref(),
            Some("Please provide voter ID, email, or SSN")
        );
    }

    #[backend_test]
    async fn status_response_fields(client: Client) {
        let registered = register_example(&client, &Registration::example()).await;
        let response = client
            .post(uri!(voter_status))
            .header(ContentType::JSON)
            .body(json!({ "voterId": registered.voter_id }).to_string())
            .dispatch()
            .await;
        let body: Value = response.into_json().await.unwrap();
        let data = body["data"].as_object().unwrap();

        let mut keys: Vec<&str> = data.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["pollingPlace", "registeredDate", "status", "voterId"]
        );
        assert!(data["pollingPlace"].is_null());
    }
}
