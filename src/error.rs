use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors raised for malformed rating or catalog input
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Missing required field '{field}' on line {line}")]
    MissingField { field: &'static str, line: u64 },

    #[error("Invalid rating {rating} for user {user_id} and place {place_id}: ratings must be finite and positive")]
    InvalidRating {
        user_id: u32,
        place_id: u32,
        rating: f64,
    },

    #[error("Malformed record on line {line}: {message}")]
    Malformed { line: u64, message: String },
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input data: {0}")]
    Input(#[from] InputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Input(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Io(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Malformed request bodies get the same JSON error shape as every other 400
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_maps_to_bad_request() {
        let err = AppError::from(InputError::Malformed {
            line: 3,
            message: "invalid float literal".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unavailable_maps_to_service_unavailable() {
        let response = AppError::Unavailable("no source".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_missing_field_message() {
        let err = InputError::MissingField {
            field: "Place_Id",
            line: 7,
        };
        assert_eq!(
            err.to_string(),
            "Missing required field 'Place_Id' on line 7"
        );
    }
}
