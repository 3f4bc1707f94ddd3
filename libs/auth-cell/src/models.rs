use serde::{Deserialize, Serialize};

use shared_database::Record;
use shared_models::auth::{Role, User};
use shared_models::AppError;
use uuid::Uuid;

/// Stored user row: the public profile plus its argon2 password hash.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: String,
}

impl Record for UserAccount {
    fn id(&self) -> Uuid {
        self.user.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("User not found")]
    UserNotFound,

    #[error("User with email {email} already exists")]
    EmailAlreadyExists { email: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidSession(_) => {
                AppError::Auth(err.to_string())
            }
            AuthError::UserNotFound => AppError::NotFound(err.to_string()),
            AuthError::EmailAlreadyExists { .. } | AuthError::ValidationError(_) => {
                AppError::ValidationError(err.to_string())
            }
            AuthError::PasswordHash(msg) => AppError::Internal(msg),
        }
    }
}
