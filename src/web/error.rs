use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use crate::newsletter_client;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("request body rejected: {0}")]
    BodyRejection(String),

    #[error("data parsing error: {0}")]
    DataParsing(#[from] super::data::DataParsingError),

    #[error("newsletter client error: {0}")]
    NewsletterClient(#[from] newsletter_client::Error),

    #[error("error awaiting a tokio task: {0}")]
    TokioJoin(#[from] tokio::task::JoinError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::BodyRejection(_) => (StatusCode::BAD_REQUEST, BadRequest),
            Error::DataParsing(data_er) => {
                (StatusCode::BAD_REQUEST, MissingFields(data_er.to_string()))
            }
            Error::NewsletterClient(newsletter_client::Error::ApiKeyMissing) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ServerMisconfigured)
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, ServerError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// Client-facing error taxonomy. `AsRefStr` yields the wire-format error
/// kind (`BAD_REQUEST`, `MISSING_FIELDS`, ...).
#[derive(Debug, Clone, AsRefStr, derive_more::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientError {
    #[display("bad request")]
    BadRequest,
    #[display("{_0}")]
    MissingFields(String),
    #[display("missing newsletter API key")]
    ServerMisconfigured,
    #[display("service error")]
    ServerError,
}

impl ClientError {
    /// Human-readable detail included in the response body, when there is one.
    pub fn message(&self) -> Option<String> {
        match self {
            ClientError::MissingFields(msg) => Some(msg.clone()),
            ClientError::ServerMisconfigured => {
                Some(format!("Missing {}", crate::config::API_KEY_ENV_VAR))
            }
            _ => None,
        }
    }
}
