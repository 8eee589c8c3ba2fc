//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use homepanel_domain::error::HomePanelError;

/// JSON error body returned by every endpoint.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps handler failures to an HTTP response with the matching status code.
#[derive(Debug)]
pub enum ApiError {
    Domain(HomePanelError),
    /// The request body is not a JSON document.
    InvalidJson(serde_json::Error),
}

impl From<HomePanelError> for ApiError {
    fn from(err: HomePanelError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidJson(err) => (StatusCode::BAD_REQUEST, format!("invalid JSON body: {err}")),
            Self::Domain(HomePanelError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(HomePanelError::Payload(err)) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Domain(HomePanelError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(HomePanelError::Transport(err)) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homepanel_domain::error::{NotFoundError, ValidationError};

    #[test]
    fn should_map_validation_to_bad_request() {
        let response = ApiError::from(HomePanelError::from(ValidationError::EmptyName)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn should_map_not_found_to_404() {
        let err = NotFoundError {
            resource: "state",
            name: "heating".to_string(),
        };
        let response = ApiError::from(HomePanelError::from(err)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn should_hide_transport_details() {
        let io = std::io::Error::other("disk on fire");
        let response = ApiError::from(HomePanelError::Transport(Box::new(io))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
