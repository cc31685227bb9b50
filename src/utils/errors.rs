use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SolanaError {
    #[error("Client error: {0}")]
    ClientError(#[from] solana_client::client_error::ClientError),

    #[error("Raydium API error: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Raydium API rejected request: {0}")]
    ApiResponse(String),

    #[error("Invalid wallet secret: {0}")]
    InvalidSecret(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub fn json_rejection_message(err: &JsonRejection) -> &'static str {
    match err {
        JsonRejection::JsonDataError(_) => "Invalid JSON format",
        JsonRejection::JsonSyntaxError(_) => "JSON syntax error",
        JsonRejection::MissingJsonContentType(_) => "Missing Content-Type: application/json header",
        _ => "JSON processing error",
    }
}

impl IntoResponse for SolanaError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        let error_message = self.to_string();

        info!("Response: 400 - {}", error_message);

        let body = Json(json!({
            "success": false,
            "error": error_message
        }));

        (status, body).into_response()
    }
}
