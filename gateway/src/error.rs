//! Maps library errors onto the `{success: false, error}` envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use country_risk::RiskError;
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ApiError(#[from] pub RiskError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RiskError::NotFound { .. } => StatusCode::NOT_FOUND,
            RiskError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RiskError::DataUnavailable { .. }
            | RiskError::CorruptStore { .. }
            | RiskError::PersistenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self.0);
        } else {
            tracing::debug!("{}", self.0);
        }

        let body = serde_json::json!({
            "success": false,
            "error": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
