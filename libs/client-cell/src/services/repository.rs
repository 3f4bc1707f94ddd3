use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::InMemoryStore;

use crate::models::{Animal, Client, ClientError, UpdateAnimalRequest, UpdateClientRequest};

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Client>, ClientError>;
    async fn get(&self, id: Uuid) -> Result<Client, ClientError>;
    async fn search(&self, query: &str) -> Result<Vec<Client>, ClientError>;
    async fn insert(&self, client: Client) -> Result<Client, ClientError>;
    async fn update(&self, id: Uuid, changes: UpdateClientRequest) -> Result<Client, ClientError>;
    async fn delete(&self, id: Uuid) -> Result<(), ClientError>;
}

#[async_trait]
pub trait AnimalRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Animal>, ClientError>;
    async fn get(&self, id: Uuid) -> Result<Animal, ClientError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Animal>, ClientError>;
    async fn insert(&self, animal: Animal) -> Result<Animal, ClientError>;
    async fn update(&self, id: Uuid, changes: UpdateAnimalRequest) -> Result<Animal, ClientError>;
    async fn delete(&self, id: Uuid) -> Result<(), ClientError>;
}

pub struct InMemoryClientRepository {
    store: InMemoryStore<Client>,
}

impl InMemoryClientRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_clients(config, Vec::new())
    }

    pub fn with_clients(config: &AppConfig, clients: Vec<Client>) -> Self {
        Self {
            store: InMemoryStore::with_rows("clients", config, clients),
        }
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn list(&self) -> Result<Vec<Client>, ClientError> {
        Ok(self.store.all().await)
    }

    async fn get(&self, id: Uuid) -> Result<Client, ClientError> {
        self.store.find(id).await.ok_or(ClientError::NotFound)
    }

    async fn search(&self, query: &str) -> Result<Vec<Client>, ClientError> {
        Ok(self.store.filter(|client| client.matches(query)).await)
    }

    async fn insert(&self, client: Client) -> Result<Client, ClientError> {
        Ok(self.store.insert(client).await)
    }

    async fn update(&self, id: Uuid, changes: UpdateClientRequest) -> Result<Client, ClientError> {
        let now = Utc::now();
        self.store
            .update(id, move |client| changes.apply(client, now))
            .await
            .ok_or(ClientError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        self.store.remove(id).await.map(|_| ()).ok_or(ClientError::NotFound)
    }
}

pub struct InMemoryAnimalRepository {
    store: InMemoryStore<Animal>,
}

impl InMemoryAnimalRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_animals(config, Vec::new())
    }

    pub fn with_animals(config: &AppConfig, animals: Vec<Animal>) -> Self {
        Self {
            store: InMemoryStore::with_rows("animals", config, animals),
        }
    }
}

#[async_trait]
impl AnimalRepository for InMemoryAnimalRepository {
    async fn list(&self) -> Result<Vec<Animal>, ClientError> {
        Ok(self.store.all().await)
    }

    async fn get(&self, id: Uuid) -> Result<Animal, ClientError> {
        self.store.find(id).await.ok_or(ClientError::AnimalNotFound)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Animal>, ClientError> {
        Ok(self.store.filter(|animal| animal.owner_id == owner_id).await)
    }

    async fn insert(&self, animal: Animal) -> Result<Animal, ClientError> {
        Ok(self.store.insert(animal).await)
    }

    async fn update(&self, id: Uuid, changes: UpdateAnimalRequest) -> Result<Animal, ClientError> {
        let now = Utc::now();
        self.store
            .update(id, move |animal| changes.apply(animal, now))
            .await
            .ok_or(ClientError::AnimalNotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        self.store.remove(id).await.map(|_| ()).ok_or(ClientError::AnimalNotFound)
    }
}
