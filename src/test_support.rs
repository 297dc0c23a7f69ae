use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
  body::{Body, Bytes},
  http::{header::CONTENT_TYPE, Request, StatusCode},
  Router,
};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use tower::ServiceExt;

use crate::{
  app::create_app,
  domains::user::{
    model::{parse_user_id, User},
    repository::{RepositoryError, UserRepository},
    service::UserServiceImpl,
  },
  state::SharedAppState,
};

/// Repository backed by a vector, keeping insertion order like a collection scan.
#[derive(Default)]
pub struct InMemoryUserRepository {
  users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
    Ok(self.users.lock().unwrap().clone())
  }

  async fn create(&self, user: &User) -> Result<String, RepositoryError> {
    let id = ObjectId::new().to_hex();
    let mut stored = user.clone();
    stored.id = id.clone();
    self.users.lock().unwrap().push(stored);
    Ok(id)
  }

  async fn find_one(&self, id: &str) -> Result<User, RepositoryError> {
    parse_user_id(id).map_err(|e| RepositoryError::NotFound(e.to_string()))?;
    self
      .users
      .lock()
      .unwrap()
      .iter()
      .find(|u| u.id == id)
      .cloned()
      .ok_or_else(|| RepositoryError::NotFound(format!("user {} not found", id)))
  }

  async fn update(&self, user: &User) -> Result<(), RepositoryError> {
    parse_user_id(&user.id).map_err(|e| RepositoryError::Validation(e.to_string()))?;
    let mut users = self.users.lock().unwrap();
    let stored = users
      .iter_mut()
      .find(|u| u.id == user.id)
      .ok_or_else(|| RepositoryError::NotFound(format!("user {} not found", user.id)))?;
    *stored = user.clone();
    Ok(())
  }

  async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
    parse_user_id(id).map_err(|e| RepositoryError::Validation(e.to_string()))?;
    let mut users = self.users.lock().unwrap();
    let before = users.len();
    users.retain(|u| u.id != id);
    if users.len() == before {
      return Err(RepositoryError::NotFound(format!("user {} not found", id)));
    }
    Ok(())
  }
}

/// Repository whose every call fails as if the store were unreachable.
pub struct FailingUserRepository;

fn unreachable_store() -> RepositoryError {
  RepositoryError::DatabaseError("server selection timeout: no available servers".to_string())
}

#[async_trait]
impl UserRepository for FailingUserRepository {
  async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
    Err(unreachable_store())
  }

  async fn create(&self, _user: &User) -> Result<String, RepositoryError> {
    Err(unreachable_store())
  }

  async fn find_one(&self, _id: &str) -> Result<User, RepositoryError> {
    Err(unreachable_store())
  }

  async fn update(&self, _user: &User) -> Result<(), RepositoryError> {
    Err(unreachable_store())
  }

  async fn delete(&self, _id: &str) -> Result<(), RepositoryError> {
    Err(unreachable_store())
  }
}

pub fn app_with_repository<R: UserRepository + 'static>(repository: R) -> Router {
  let state = SharedAppState::with_service(Arc::new(UserServiceImpl::new(repository)));
  create_app(state)
}

pub fn app_with_memory_storage() -> Router {
  app_with_repository(InMemoryUserRepository::default())
}

pub fn app_with_failing_storage() -> Router {
  app_with_repository(FailingUserRepository)
}

pub async fn send_raw(
  app: Router,
  method: &str,
  uri: &str,
  body: Option<&str>,
) -> (StatusCode, Option<String>, Bytes) {
  let body = match body {
    Some(body) => Body::from(body.to_string()),
    None => Body::empty(),
  };
  let request = Request::builder()
    .method(method)
    .uri(uri)
    .header("content-type", "application/json")
    .body(body)
    .expect("build request");

  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let content_type = response
    .headers()
    .get(CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .map(str::to_string);
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  (status, content_type, body)
}

async fn send_json<T: Serialize>(app: Router, method: &str, uri: &str, body: &T) -> (StatusCode, Bytes) {
  let body = serde_json::to_string(body).expect("serialize request body");
  let (status, _, bytes) = send_raw(app, method, uri, Some(&body)).await;
  (status, bytes)
}

pub async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  send_json(app, "POST", uri, body).await
}

pub async fn put_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  send_json(app, "PUT", uri, body).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Bytes) {
  let (status, _, bytes) = send_raw(app, "GET", uri, None).await;
  (status, bytes)
}

pub async fn delete(app: Router, uri: &str) -> (StatusCode, Bytes) {
  let (status, _, bytes) = send_raw(app, "DELETE", uri, None).await;
  (status, bytes)
}
