use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};

use super::model::{parse_user_id, User, UserDocument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
  Validation(String),
  NotFound(String),
  DatabaseError(String),
}

impl std::error::Error for RepositoryError {}

impl std::fmt::Display for RepositoryError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RepositoryError::Validation(msg) => write!(f, "Validation error: {}", msg),
      RepositoryError::NotFound(msg) => write!(f, "Not found: {}", msg),
      RepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
    }
  }
}

fn database_error(context: impl std::fmt::Display, err: mongodb::error::Error) -> RepositoryError {
  RepositoryError::DatabaseError(format!("{}: {}", context, err))
}

/// Persistence contract for users. Ids cross this boundary as 24-character hex strings.
#[async_trait]
pub trait UserRepository: Send + Sync {
  async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;
  async fn create(&self, user: &User) -> Result<String, RepositoryError>;
  async fn find_one(&self, id: &str) -> Result<User, RepositoryError>;
  async fn update(&self, user: &User) -> Result<(), RepositoryError>;
  async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}

pub struct MongoUserRepository {
  collection: Collection<UserDocument>,
}

impl MongoUserRepository {
  pub fn new(db: &Database, collection: &str) -> Self {
    Self {
      collection: db.collection(collection),
    }
  }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
  async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
    tracing::debug!("finding all users");
    let cursor = self
      .collection
      .find(doc! {})
      .await
      .map_err(|e| database_error("can't find users", e))?;

    let docs: Vec<UserDocument> = cursor
      .try_collect()
      .await
      .map_err(|e| database_error("can't decode users", e))?;

    Ok(docs.into_iter().map(User::from).collect())
  }

  async fn create(&self, user: &User) -> Result<String, RepositoryError> {
    tracing::debug!("creating user");
    let result = self
      .collection
      .insert_one(UserDocument::for_insert(user))
      .await
      .map_err(|e| database_error("can't create user", e))?;

    match result.inserted_id.as_object_id() {
      Some(oid) => Ok(oid.to_hex()),
      None => {
        tracing::trace!(inserted_id = ?result.inserted_id, "inserted id is not an ObjectId");
        Err(RepositoryError::DatabaseError(
          "can't convert inserted id to object id".to_string(),
        ))
      }
    }
  }

  async fn find_one(&self, id: &str) -> Result<User, RepositoryError> {
    tracing::debug!("finding user by id: {}", id);
    let oid = parse_user_id(id).map_err(|e| RepositoryError::NotFound(format!("invalid user id {}: {}", id, e)))?;

    let doc = self
      .collection
      .find_one(doc! { "_id": oid })
      .await
      .map_err(|e| database_error(format!("can't find user {}", id), e))?
      .ok_or_else(|| RepositoryError::NotFound(format!("user {} not found", id)))?;

    Ok(doc.into())
  }

  async fn update(&self, user: &User) -> Result<(), RepositoryError> {
    tracing::debug!("updating user by id: {}", user.id);
    if user.id.is_empty() {
      return Err(RepositoryError::Validation("user id is not set".to_string()));
    }
    let oid = parse_user_id(&user.id)
      .map_err(|e| RepositoryError::Validation(format!("invalid user id {}: {}", user.id, e)))?;

    let update = doc! {
      "$set": {
        "username": user.username.as_str(),
        "email": user.email.as_str(),
        "password": user.password_hash.as_str(),
      }
    };

    let result = self
      .collection
      .update_one(doc! { "_id": oid }, update)
      .await
      .map_err(|e| database_error(format!("can't update user {}", user.id), e))?;

    tracing::trace!(
      matched = result.matched_count,
      modified = result.modified_count,
      "user update applied"
    );

    if result.matched_count == 0 {
      return Err(RepositoryError::NotFound(format!("user {} not found", user.id)));
    }
    Ok(())
  }

  async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
    tracing::debug!("deleting user by id: {}", id);
    let oid = parse_user_id(id).map_err(|e| RepositoryError::Validation(format!("invalid user id {}: {}", id, e)))?;

    let result = self
      .collection
      .delete_one(doc! { "_id": oid })
      .await
      .map_err(|e| database_error(format!("can't delete user {}", id), e))?;

    if result.deleted_count == 0 {
      return Err(RepositoryError::NotFound(format!("user {} not found", id)));
    }
    tracing::trace!(deleted = result.deleted_count, "user deleted");
    Ok(())
  }
}
