use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Animal, ClientError, CreateAnimalRequest, UpdateAnimalRequest};
use crate::services::client::validate_required;
use crate::services::repository::{AnimalRepository, ClientRepository};

pub struct AnimalService {
    animals: Arc<dyn AnimalRepository>,
    clients: Arc<dyn ClientRepository>,
}

impl AnimalService {
    pub fn new(animals: Arc<dyn AnimalRepository>, clients: Arc<dyn ClientRepository>) -> Self {
        Self { animals, clients }
    }

    pub async fn create_animal(&self, request: CreateAnimalRequest) -> Result<Animal, ClientError> {
        debug!("Registering animal {} for owner {}", request.name, request.owner_id);

        validate_required("name", &request.name)?;
        validate_weight(request.weight_kg)?;
        self.clients.get(request.owner_id).await?;

        let now = Utc::now();
        let animal = Animal {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            species: request.species,
            breed: request.breed,
            sex: request.sex,
            birth_date: request.birth_date,
            estimated_age: request.estimated_age,
            weight_kg: request.weight_kg,
            microchip: request.microchip,
            owner_id: request.owner_id,
            created_at: now,
            updated_at: now,
        };

        let animal = self.animals.insert(animal).await?;
        info!("Animal registered with ID: {}", animal.id);
        Ok(animal)
    }

    pub async fn get_animal(&self, id: Uuid) -> Result<Animal, ClientError> {
        self.animals.get(id).await
    }

    pub async fn list_animals(&self) -> Result<Vec<Animal>, ClientError> {
        self.animals.list().await
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Animal>, ClientError> {
        self.animals.list_by_owner(owner_id).await
    }

    pub async fn update_animal(
        &self,
        id: Uuid,
        request: UpdateAnimalRequest,
    ) -> Result<Animal, ClientError> {
        if let Some(name) = &request.name {
            validate_required("name", name)?;
        }
        if let Some(weight_kg) = request.weight_kg {
            validate_weight(weight_kg)?;
        }
        if let Some(owner_id) = request.owner_id {
            self.clients.get(owner_id).await?;
        }

        let animal = self.animals.update(id, request).await?;
        info!("Animal {} updated", id);
        Ok(animal)
    }

    pub async fn delete_animal(&self, id: Uuid) -> Result<(), ClientError> {
        self.animals.delete(id).await?;
        info!("Animal {} deleted", id);
        Ok(())
    }
}

fn validate_weight(weight_kg: f64) -> Result<(), ClientError> {
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Err(ClientError::ValidationError(format!(
            "Weight must be a non-negative number, got {}",
            weight_kg
        )));
    }
    Ok(())
}
