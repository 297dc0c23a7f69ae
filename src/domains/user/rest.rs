use axum::{
  body::Bytes,
  extract::{Path, State},
  http::StatusCode,
  response::Json as JsonResponse,
  routing::get,
  Router,
};

use super::model::{parse_user_id, CreateUserRequest, UpdateUserRequest, User};
use crate::{
  state::{AppState, SharedAppState},
  AppError,
};

const USERS_URL: &str = "/users";
const USER_URL: &str = "/users/{id}";

pub fn user_routes() -> Router<SharedAppState> {
  Router::new()
    .route(USERS_URL, get(list_users_handler).post(create_user_handler))
    .route(
      USER_URL,
      get(get_user_handler).put(update_user_handler).delete(delete_user_handler),
    )
}

fn validate_id(id: &str) -> Result<(), AppError> {
  parse_user_id(id)
    .map(|_| ())
    .map_err(|_| AppError::bad_request(format!("Invalid user id: {}", id)))
}

pub async fn list_users_handler(State(state): State<SharedAppState>) -> Result<JsonResponse<Vec<User>>, AppError> {
  tracing::debug!("list users");
  state.find_all_users().await.map(JsonResponse).map_err(Into::into)
}

pub async fn get_user_handler(
  State(state): State<SharedAppState>,
  Path(id): Path<String>,
) -> Result<JsonResponse<User>, AppError> {
  tracing::debug!("get user by id: {}", id);
  validate_id(&id)?;

  state.find_user(&id).await.map(JsonResponse).map_err(Into::into)
}

pub async fn create_user_handler(
  State(state): State<SharedAppState>,
  body: Bytes,
) -> Result<(StatusCode, JsonResponse<User>), AppError> {
  tracing::debug!("create user");
  let payload: CreateUserRequest = serde_json::from_slice(&body)?;

  let user = state.create_user(payload).await?;
  Ok((StatusCode::CREATED, JsonResponse(user)))
}

pub async fn update_user_handler(
  State(state): State<SharedAppState>,
  Path(id): Path<String>,
  body: Bytes,
) -> Result<StatusCode, AppError> {
  tracing::debug!("update user by id: {}", id);
  validate_id(&id)?;

  let mut payload: UpdateUserRequest = serde_json::from_slice(&body)?;
  payload.id = id;

  state.update_user(payload).await?;
  Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_user_handler(
  State(state): State<SharedAppState>,
  Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
  tracing::debug!("delete user by id: {}", id);
  validate_id(&id)?;

  state.delete_user(&id).await?;
  Ok(StatusCode::NO_CONTENT)
}
