use rocket::{
    http::Status,
    outcome::try_outcome,
    request::{FromRequest, Outcome},
    Request,
};

use crate::error::Error;

use super::session::{AdminSession, SessionStore, SessionToken};

pub const UNAUTHORIZED: &str = "Unauthorized. Please login as admin.";

/// The token presented in an `Authorization` header, whether or not it belongs
/// to a live session. The `Bearer ` prefix is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub SessionToken);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = Error;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = req
            .headers()
            .get_one("Authorization")
            .map(|value| value.strip_prefix("Bearer ").unwrap_or(value))
            .filter(|token| !token.is_empty());
        match token {
            Some(token) => Outcome::Success(BearerToken(SessionToken::from(token.to_string()))),
            None => Outcome::Failure((
                Status::Unauthorized,
                Error::Unauthorized(UNAUTHORIZED.to_string()),
            )),
        }
    }
}

/// Proof that the request carries the token of a live admin session.
///
/// Every live session has full admin rights; there is no further scoping.
#[derive(Debug, Clone)]
pub struct AdminToken {
    pub token: SessionToken,
    pub session: AdminSession,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = Error;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let BearerToken(token) = try_outcome!(req.guard::<BearerToken>().await);

        let sessions = match req.rocket().state::<SessionStore>() {
            Some(sessions) => sessions,
            None => {
                return Outcome::Failure((
                    Status::InternalServerError,
                    Error::Unmanaged("SessionStore"),
                ))
            }
        };

        match sessions.get(&token).await {
            Some(session) => Outcome::Success(AdminToken { token, session }),
            None => Outcome::Failure((
                Status::Unauthorized,
                Error::Unauthorized(UNAUTHORIZED.to_string()),
            )),
        }
    }
}
