use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{SessionClaims, User};
use shared_utils::token::{issue_token, validate_token};

use crate::models::{AuthError, LoginCredentials, RegisterUserRequest, Session, UserAccount};
use crate::services::password::PasswordService;
use crate::services::users::UserRepository;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: Arc<AppConfig>) -> Self {
        Self { users, config }
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register_user(&self, request: RegisterUserRequest) -> Result<User, AuthError> {
        let name = request.name.trim();
        let email = request.email.trim().to_lowercase();

        if name.is_empty() {
            return Err(AuthError::ValidationError("Name is required".to_string()));
        }
        if !email.contains('@') {
            return Err(AuthError::ValidationError(format!("Invalid email: {}", email)));
        }
        PasswordService::validate_length(&request.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists { email });
        }

        let account = UserAccount {
            user: User {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email,
                role: request.role,
                active: true,
                created_at: Utc::now(),
            },
            password_hash: PasswordService::hash_password(&request.password)?,
        };

        let stored = self.users.insert(account).await?;
        info!("Registered user {} with role {}", stored.user.id, stored.user.role);
        Ok(stored.user)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: LoginCredentials) -> Result<Session, AuthError> {
        let account = match self.users.find_by_email(&credentials.email).await? {
            Some(account) if account.user.active => account,
            Some(_) => {
                warn!("Login attempt for inactive user");
                return Err(AuthError::InvalidCredentials);
            }
            None => {
                debug!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !PasswordService::verify_password(&credentials.password, &account.password_hash)? {
            warn!("Password mismatch for user {}", account.user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let claims = SessionClaims {
            sub: account.user.id,
            role: account.user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.config.session_ttl_hours)).timestamp(),
        };
        let token = issue_token(&claims, &self.config.session_secret)
            .map_err(|e| AuthError::InvalidSession(e.to_string()))?;

        info!("User {} logged in", account.user.id);
        Ok(Session {
            user: account.user,
            token,
        })
    }

    #[instrument(skip(self, token))]
    pub async fn validate_token(&self, token: &str) -> Result<User, AuthError> {
        let claims = validate_token(token, &self.config.session_secret, Utc::now())
            .map_err(|e| AuthError::InvalidSession(e.to_string()))?;

        let account = self
            .users
            .get(claims.sub)
            .await
            .map_err(|_| AuthError::InvalidSession("Unknown user".to_string()))?;

        if !account.user.active {
            return Err(AuthError::InvalidSession("User is inactive".to_string()));
        }
        if account.user.role != claims.role {
            return Err(AuthError::InvalidSession("Role changed since login".to_string()));
        }

        debug!("Session validated for user {}", account.user.id);
        Ok(account.user)
    }

    /// Resolves the user behind a stored token; any failure means "logged out".
    pub async fn current_user(&self, token: Option<&str>) -> Option<User> {
        let token = token?;
        match self.validate_token(token).await {
            Ok(user) => Some(user),
            Err(e) => {
                debug!("Discarding stored session: {}", e);
                None
            }
        }
    }

    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let user = self.validate_token(token).await?;
        info!("User {} logged out", user.id);
        Ok(())
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AuthError> {
        Ok(self.users.get(id).await?.user)
    }

    /// Active users who attend consultations. Admins in this clinic are
    /// practising veterinarians too.
    pub async fn list_veterinarians(&self) -> Result<Vec<User>, AuthError> {
        let users = self.users.list().await?;
        Ok(users
            .into_iter()
            .map(|account| account.user)
            .filter(|user| user.active)
            .collect())
    }
}
