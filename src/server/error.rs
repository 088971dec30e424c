use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::utils::error::{ErrorCategory, ErrorSeverity, TalentError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub category: ErrorCategory,
}

pub fn status_for(err: &TalentError) -> StatusCode {
    match err {
        TalentError::NotFound { .. } => StatusCode::NOT_FOUND,
        TalentError::ValidationError { .. } => StatusCode::BAD_REQUEST,
        TalentError::LlmError { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for TalentError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        // Client errors carry the full message; server errors are summarised.
        let detail = if let TalentError::ValidationError { message } = &self {
            message.clone()
        } else if self.severity() == ErrorSeverity::Low {
            self.to_string()
        } else {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                self,
                self.category(),
                self.severity()
            );
            self.user_friendly_message()
        };

        let body = ErrorBody {
            detail,
            category: self.category(),
        };
        (status, Json(body)).into_response()
    }
}
