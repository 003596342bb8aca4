use std::io::Error as IoError;

use log::error;
use rocket::{
    http::Status,
    response::{self, status, Responder},
    serde::json::{serde_json::Error as JsonError, Json},
    Request,
};
use thiserror::Error;

use crate::{config::Config, model::envelope::Envelope};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error("{0} is not managed by the server")]
    Unmanaged(&'static str),
}

impl Error {
    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::BadRequest,
            Self::Conflict(_) => Status::Conflict,
            Self::NotFound(_) => Status::NotFound,
            Self::Unauthorized(_) => Status::Unauthorized,
            Self::Io(_) | Self::Json(_) | Self::Unmanaged(_) => Status::InternalServerError,
        }
    }
}

/// Render the error as a failed envelope. Internal details are only included
/// when the server is configured to expose them.
impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        let envelope = if status == Status::InternalServerError {
            error!("{self}");
            let expose = req
                .rocket()
                .state::<Config>()
                .map_or(false, Config::expose_errors);
            Envelope::failure("Server error", expose.then(|| self.to_string()))
        } else {
            Envelope::failure(self.to_string(), None)
        };
        status::Custom(status, Json(envelope)).respond_to(req)
    }
}
