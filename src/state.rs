use std::sync::Arc;

use mongodb::Database;

use crate::domains::user::{
  model::{CreateUserRequest, UpdateUserRequest, User},
  repository::MongoUserRepository,
  service::{UserService, UserServiceError, UserServiceImpl},
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn find_all_users(&self) -> impl std::future::Future<Output = Result<Vec<User>, UserServiceError>> + Send;
  fn find_user(&self, id: &str) -> impl std::future::Future<Output = Result<User, UserServiceError>> + Send;
  fn create_user(
    &self,
    req: CreateUserRequest,
  ) -> impl std::future::Future<Output = Result<User, UserServiceError>> + Send;
  fn update_user(
    &self,
    req: UpdateUserRequest,
  ) -> impl std::future::Future<Output = Result<(), UserServiceError>> + Send;
  fn delete_user(&self, id: &str) -> impl std::future::Future<Output = Result<(), UserServiceError>> + Send;
}

#[derive(Clone)]
pub struct SharedAppState {
  pub user_service: Arc<dyn UserService>,
}

impl SharedAppState {
  pub fn new(db: &Database, collection: &str) -> Self {
    let user_repository = MongoUserRepository::new(db, collection);
    let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(user_repository));

    Self { user_service }
  }

  pub fn with_service(user_service: Arc<dyn UserService>) -> Self {
    Self { user_service }
  }
}

impl AppState for SharedAppState {
  async fn find_all_users(&self) -> Result<Vec<User>, UserServiceError> {
    self.user_service.find_all_users().await
  }

  async fn find_user(&self, id: &str) -> Result<User, UserServiceError> {
    self.user_service.find_user(id).await
  }

  async fn create_user(&self, req: CreateUserRequest) -> Result<User, UserServiceError> {
    self.user_service.create_user(req).await
  }

  async fn update_user(&self, req: UpdateUserRequest) -> Result<(), UserServiceError> {
    self.user_service.update_user(req).await
  }

  async fn delete_user(&self, id: &str) -> Result<(), UserServiceError> {
    self.user_service.delete_user(id).await
  }
}
