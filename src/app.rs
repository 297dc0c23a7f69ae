use std::time::Duration;

use axum::{http::StatusCode, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{domains::user::rest::user_routes, state::SharedAppState};

pub fn create_app(state: SharedAppState) -> Router {
  Router::new()
    .merge(user_routes())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Bounds every request to `timeout`, answering 408 once it elapses.
pub fn with_request_timeout(app: Router, timeout: Duration) -> Router {
  app.layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
}
