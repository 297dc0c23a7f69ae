/// Classification every service error is reduced to at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Validation,
  NotFound,
  Storage,
}

/// Macro to generate the repository error conversion for a service error
///
/// Usage:
/// ```ignore
/// impl_service_error_conversions!(UserServiceError, ValidationError, UserNotFound, InternalServerError);
/// ```
#[macro_export]
macro_rules! impl_service_error_conversions {
  ($error_type:ty, $validation_variant:ident, $not_found_variant:ident, $internal_variant:ident) => {
    impl From<$crate::domains::user::repository::RepositoryError> for $error_type {
      fn from(err: $crate::domains::user::repository::RepositoryError) -> Self {
        use $crate::domains::user::repository::RepositoryError;
        match err {
          RepositoryError::Validation(msg) => <$error_type>::$validation_variant(msg),
          RepositoryError::NotFound(msg) => <$error_type>::$not_found_variant(msg),
          RepositoryError::DatabaseError(msg) => <$error_type>::$internal_variant(format!("Database error: {}", msg)),
        }
      }
    }
  };
}
