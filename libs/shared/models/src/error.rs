use thiserror::Error;

/// Error shared by every cell once a cell-specific error crosses a cell boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Message suitable for showing to the person using the console.
    pub fn user_message(&self) -> String {
        let message = match self {
            AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::Storage(_) | AppError::Internal(_) => {
                "Something went wrong, please try again".to_string()
            }
        };

        tracing::debug!("Mapped {:?} to user message", self);
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_details_are_hidden_from_users() {
        let err = AppError::Storage("lock poisoned".to_string());
        assert_eq!(err.user_message(), "Something went wrong, please try again");

        let err = AppError::NotFound("Appointment not found".to_string());
        assert_eq!(err.user_message(), "Appointment not found");
        assert!(err.is_not_found());
    }
}
