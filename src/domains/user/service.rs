use async_trait::async_trait;
use std::error::Error;

use super::{
  model::{parse_user_id, CreateUserRequest, UpdateUserRequest, User},
  repository::UserRepository,
};
use crate::{error::ErrorKind, impl_service_error_conversions};

#[derive(Debug, PartialEq, Eq)]
pub enum UserServiceError {
  ValidationError(String),
  UserNotFound(String),
  InternalServerError(String),
}

impl UserServiceError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      UserServiceError::ValidationError(_) => ErrorKind::Validation,
      UserServiceError::UserNotFound(_) => ErrorKind::NotFound,
      UserServiceError::InternalServerError(_) => ErrorKind::Storage,
    }
  }

  /// Prefixes the message of a storage failure with the failing operation.
  /// Client-facing messages for validation and not-found errors are left as they are.
  fn context(self, operation: &str) -> Self {
    match self {
      UserServiceError::InternalServerError(msg) => {
        UserServiceError::InternalServerError(format!("{}: {}", operation, msg))
      }
      other => other,
    }
  }
}

impl Error for UserServiceError {}

impl std::fmt::Display for UserServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      UserServiceError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
      UserServiceError::UserNotFound(msg) => write!(f, "User Not Found: {}", msg),
      UserServiceError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
    }
  }
}

impl_service_error_conversions!(UserServiceError, ValidationError, UserNotFound, InternalServerError);

#[async_trait]
pub trait UserService: Send + Sync {
  async fn create_user(&self, req: CreateUserRequest) -> Result<User, UserServiceError>;
  async fn find_user(&self, id: &str) -> Result<User, UserServiceError>;
  async fn find_all_users(&self) -> Result<Vec<User>, UserServiceError>;
  async fn update_user(&self, req: UpdateUserRequest) -> Result<(), UserServiceError>;
  async fn delete_user(&self, id: &str) -> Result<(), UserServiceError>;
}

pub struct UserServiceImpl<U> {
  user_repository: U,
}

impl<U> UserServiceImpl<U>
where
  U: UserRepository,
{
  pub fn new(user_repository: U) -> Self {
    Self { user_repository }
  }
}

fn ensure_valid_id(id: &str) -> Result<(), UserServiceError> {
  parse_user_id(id)
    .map(|_| ())
    .map_err(|e| UserServiceError::ValidationError(format!("Invalid user id {}: {}", id, e)))
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
  U: UserRepository,
{
  async fn create_user(&self, req: CreateUserRequest) -> Result<User, UserServiceError> {
    let mut user = User {
      id: String::new(),
      username: req.username,
      email: req.email,
      password_hash: crate::utils::hash_password(&req.password),
    };

    user.id = self
      .user_repository
      .create(&user)
      .await
      .map_err(|e| UserServiceError::from(e).context("Failed to create user"))?;

    tracing::info!(user_id = %user.id, "user created");
    Ok(user)
  }

  async fn find_user(&self, id: &str) -> Result<User, UserServiceError> {
    ensure_valid_id(id)?;

    let user = self
      .user_repository
      .find_one(id)
      .await
      .map_err(|e| UserServiceError::from(e).context(&format!("Failed to find user {}", id)))?;

    Ok(user)
  }

  async fn find_all_users(&self) -> Result<Vec<User>, UserServiceError> {
    let users = self
      .user_repository
      .find_all()
      .await
      .map_err(|e| UserServiceError::from(e).context("Failed to list users"))?;

    Ok(users)
  }

  async fn update_user(&self, req: UpdateUserRequest) -> Result<(), UserServiceError> {
    ensure_valid_id(&req.id)?;

    let user = User {
      id: req.id,
      username: req.username,
      email: req.email,
      password_hash: crate::utils::hash_password(&req.password),
    };

    self
      .user_repository
      .update(&user)
      .await
      .map_err(|e| UserServiceError::from(e).context(&format!("Failed to update user {}", user.id)))?;

    tracing::info!(user_id = %user.id, "user updated");
    Ok(())
  }

  async fn delete_user(&self, id: &str) -> Result<(), UserServiceError> {
    ensure_valid_id(id)?;

    self
      .user_repository
      .delete(id)
      .await
      .map_err(|e| UserServiceError::from(e).context(&format!("Failed to delete user {}", id)))?;

    tracing::info!(user_id = %id, "user deleted");
    Ok(())
  }
}

