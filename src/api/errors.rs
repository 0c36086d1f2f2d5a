use actix_web::http::StatusCode;
use actix_web::{error, web, HttpResponse, ResponseError};

use crate::domain::order::{ErrorKind, OrderError};

// ============================================================================
// Error Responses
// ============================================================================
//
// Validation -> 400, NotFound -> 404, Internal -> 500 with an opaque message.
// Internal failures are logged here, once, with their full cause.
//
// ============================================================================

impl ResponseError for OrderError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let kind = self.kind();
        let message = match kind {
            ErrorKind::Internal => {
                tracing::error!(error = %self, "Order request failed");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": kind.as_str(),
            "message": message,
        }))
    }
}

/// Route body-parsing failures through the same validation response.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected order request body");
        error::Error::from(OrderError::InvalidRequest(err.to_string()))
    })
}
