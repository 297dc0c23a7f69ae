use mongodb::bson::oid::{self, ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: String,
  pub username: String,
  pub email: String,
  pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateUserRequest {
  pub username: String,
  pub email: String,
  pub password: String,
}

/// Full replacement of a user's fields. The id comes from the resource path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateUserRequest {
  #[serde(skip)]
  pub id: String,
  pub username: String,
  pub email: String,
  pub password: String,
}

/// Shape of a user as stored in the collection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserDocument {
  #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
  pub id: Option<ObjectId>,
  pub username: String,
  pub email: String,
  #[serde(rename = "password")]
  pub password_hash: String,
}

impl From<UserDocument> for User {
  fn from(doc: UserDocument) -> Self {
    Self {
      id: doc.id.map(|oid| oid.to_hex()).unwrap_or_default(),
      username: doc.username,
      email: doc.email,
      password_hash: doc.password_hash,
    }
  }
}

impl UserDocument {
  /// Builds a document for insertion. Any id on the user is ignored so the store assigns one.
  pub fn for_insert(user: &User) -> Self {
    Self {
      id: None,
      username: user.username.clone(),
      email: user.email.clone(),
      password_hash: user.password_hash.clone(),
    }
  }
}

/// Parses the 24-character hex form of a user id.
pub fn parse_user_id(id: &str) -> Result<ObjectId, oid::Error> {
  ObjectId::parse_str(id)
}
