use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Client, ClientError, CreateClientRequest, UpdateClientRequest};
use crate::services::repository::{AnimalRepository, ClientRepository};

pub struct ClientService {
    clients: Arc<dyn ClientRepository>,
    animals: Arc<dyn AnimalRepository>,
}

impl ClientService {
    pub fn new(clients: Arc<dyn ClientRepository>, animals: Arc<dyn AnimalRepository>) -> Self {
        Self { clients, animals }
    }

    pub async fn create_client(&self, request: CreateClientRequest) -> Result<Client, ClientError> {
        debug!("Creating client record for: {}", request.email);

        validate_required("full name", &request.full_name)?;
        validate_document(&request.document)?;
        validate_required("phone", &request.phone)?;
        validate_email(&request.email)?;

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            full_name: request.full_name.trim().to_string(),
            document: request.document.trim().to_string(),
            phone: request.phone.trim().to_string(),
            email: request.email.trim().to_string(),
            address: request.address,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };

        let client = self.clients.insert(client).await?;
        info!("Client created with ID: {}", client.id);
        Ok(client)
    }

    pub async fn get_client(&self, id: Uuid) -> Result<Client, ClientError> {
        debug!("Fetching client: {}", id);
        self.clients.get(id).await
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>, ClientError> {
        self.clients.list().await
    }

    /// Case-insensitive on name and email, literal on document and phone.
    /// A blank query lists everyone.
    pub async fn search_clients(&self, query: &str) -> Result<Vec<Client>, ClientError> {
        let query = query.trim();
        if query.is_empty() {
            return self.clients.list().await;
        }
        self.clients.search(query).await
    }

    pub async fn update_client(
        &self,
        id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<Client, ClientError> {
        debug!("Updating client: {}", id);

        if let Some(full_name) = &request.full_name {
            validate_required("full name", full_name)?;
        }
        if let Some(document) = &request.document {
            validate_document(document)?;
        }
        if let Some(phone) = &request.phone {
            validate_required("phone", phone)?;
        }
        if let Some(email) = &request.email {
            validate_email(email)?;
        }

        let client = self.clients.update(id, request).await?;
        info!("Client {} updated", id);
        Ok(client)
    }

    /// Refuses to orphan animals: owners with registered animals stay.
    pub async fn delete_client(&self, id: Uuid) -> Result<(), ClientError> {
        self.clients.get(id).await?;

        let animals = self.animals.list_by_owner(id).await?;
        if !animals.is_empty() {
            return Err(ClientError::HasAnimals {
                count: animals.len(),
            });
        }

        self.clients.delete(id).await?;
        info!("Client {} deleted", id);
        Ok(())
    }
}

pub(crate) fn validate_required(field: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::ValidationError(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_document(document: &str) -> Result<(), ClientError> {
    let digits = document.chars().filter(|c| c.is_ascii_digit()).count();
    // CPF has 11 digits, CNPJ has 14
    if digits != 11 && digits != 14 {
        return Err(ClientError::ValidationError(format!(
            "Document must be a CPF or CNPJ, got {} digits",
            digits
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ClientError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ClientError::ValidationError(format!("Invalid email: {}", email))),
    }
}
