use async_trait::async_trait;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::InMemoryStore;

use crate::models::{AuthError, UserAccount};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<UserAccount>, AuthError>;
    async fn get(&self, id: Uuid) -> Result<UserAccount, AuthError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthError>;
    async fn insert(&self, account: UserAccount) -> Result<UserAccount, AuthError>;
}

pub struct InMemoryUserRepository {
    store: InMemoryStore<UserAccount>,
}

impl InMemoryUserRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_accounts(config, Vec::new())
    }

    pub fn with_accounts(config: &AppConfig, accounts: Vec<UserAccount>) -> Self {
        Self {
            store: InMemoryStore::with_rows("users", config, accounts),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<UserAccount>, AuthError> {
        Ok(self.store.all().await)
    }

    async fn get(&self, id: Uuid) -> Result<UserAccount, AuthError> {
        self.store.find(id).await.ok_or(AuthError::UserNotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthError> {
        let email = email.trim().to_lowercase();
        let mut matches = self
            .store
            .filter(|account| account.user.email.to_lowercase() == email)
            .await;
        Ok(matches.pop())
    }

    async fn insert(&self, account: UserAccount) -> Result<UserAccount, AuthError> {
        Ok(self.store.insert(account).await)
    }
}
