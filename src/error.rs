use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Every way a request can fail once it reaches a handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MalformedBody(String),
    #[error("Invalid ID")]
    InvalidId,
    #[error("{entity} with ID: {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("User with that username already exists")]
    UsernameTaken,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_) | ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::UsernameTaken => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let kind = if status.is_server_error() {
            tracing::error!(error = %message, "request failed");
            "error"
        } else {
            tracing::debug!(status = status.as_u16(), error = %message, "request rejected");
            "fail"
        };

        let error_response = json!({
            "status": kind,
            "message": message,
        });
        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_kind() {
        assert_eq!(ApiError::MalformedBody("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound { entity: "Task", id: 1 }.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::UsernameTaken.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Internal("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_names_the_entity_and_id() {
        let err = ApiError::NotFound { entity: "Task", id: 9 };
        assert_eq!(err.to_string(), "Task with ID: 9 not found");
    }

    #[test]
    fn into_response_keeps_the_status() {
        let response = ApiError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
