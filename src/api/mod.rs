//! HTTP/JSON front end for the control engine.

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

pub mod commands;
pub mod routes;

pub use routes::router;

/// Body of every command response.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub message: String
}

impl From<String> for Message {
    fn from(message: String) -> Self {
        Self { message }
    }
}


/// A request that never reached the appliance.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    BadRequest(#[from] JsonRejection),

    #[error("no such endpoint: {0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
