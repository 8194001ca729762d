use crate::utils::error::BridgeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            // upstream status is passed through unchanged
            ApiError::Bridge(BridgeError::RejectedError { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Bridge(BridgeError::InvalidConfigValueError { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Bridge(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Bridge(e @ BridgeError::RejectedError { .. }) => e.user_friendly_message(),
            ApiError::Bridge(BridgeError::TransportError(e)) => format!("Error adding card: {}", e),
            ApiError::Bridge(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "detail": self.detail() }));
        (status, body).into_response()
    }
}
