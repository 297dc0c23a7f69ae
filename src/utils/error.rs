use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;

use crate::error::ErrorKind;

#[derive(Debug)]
pub struct AppError {
  pub status_code: StatusCode,
  pub message: String,
}

impl AppError {
  pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status_code,
      message: message.into(),
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, message)
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(StatusCode::NOT_FOUND, message)
  }

  pub fn internal_server_error(message: impl Into<String>) -> Self {
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let body = Json(json!({
      "error": self.message,
      "status_code": self.status_code.as_u16(),
    }));

    (self.status_code, body).into_response()
  }
}

impl From<AppError> for StatusCode {
  fn from(err: AppError) -> Self {
    err.status_code
  }
}

impl From<serde_json::Error> for AppError {
  fn from(error: serde_json::Error) -> Self {
    tracing::debug!("JSON error: {:?}", error);
    AppError::bad_request("Invalid JSON format")
  }
}

impl From<crate::domains::user::service::UserServiceError> for AppError {
  fn from(error: crate::domains::user::service::UserServiceError) -> Self {
    match error.kind() {
      ErrorKind::Validation => AppError::bad_request(error.to_string()),
      ErrorKind::NotFound => AppError::not_found("User not found"),
      ErrorKind::Storage => {
        tracing::error!("{}", error);
        AppError::internal_server_error("Internal server error occurred")
      }
    }
  }
}
