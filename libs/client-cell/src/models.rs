use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_database::Record;
use shared_models::AppError;

// ==============================================================================
// CLIENT (RESPONSÁVEL) MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Person responsible for one or more animals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: Uuid,
    pub full_name: String,
    /// CPF or CNPJ, stored as typed.
    pub document: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Client {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Client {
    pub fn matches(&self, query: &str) -> bool {
        let lower = query.to_lowercase();
        self.full_name.to_lowercase().contains(&lower)
            || self.document.contains(query)
            || self.phone.contains(query)
            || self.email.to_lowercase().contains(&lower)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClientRequest {
    pub full_name: String,
    pub document: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    pub full_name: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<Address>,
    pub notes: Option<String>,
}

impl UpdateClientRequest {
    pub fn apply(self, client: &mut Client, now: DateTime<Utc>) {
        if let Some(full_name) = self.full_name {
            client.full_name = full_name;
        }
        if let Some(document) = self.document {
            client.document = document;
        }
        if let Some(phone) = self.phone {
            client.phone = phone;
        }
        if let Some(email) = self.email {
            client.email = email;
        }
        if let Some(address) = self.address {
            client.address = address;
        }
        if let Some(notes) = self.notes {
            client.notes = Some(notes);
        }
        client.updated_at = now;
    }
}

// ==============================================================================
// ANIMAL MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Canine,
    Feline,
    Bird,
    Rodent,
    Reptile,
    Other,
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Canine => write!(f, "canine"),
            Species::Feline => write!(f, "feline"),
            Species::Bird => write!(f, "bird"),
            Species::Rodent => write!(f, "rodent"),
            Species::Reptile => write!(f, "reptile"),
            Species::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Animal {
    pub id: Uuid,
    pub name: String,
    pub species: Species,
    pub breed: String,
    pub sex: Sex,
    pub birth_date: Option<NaiveDate>,
    /// Free-text age for animals without a known birth date ("about 3 years").
    pub estimated_age: Option<String>,
    pub weight_kg: f64,
    pub microchip: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Animal {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Animal {
    /// Whole years since birth, when the birth date is known.
    pub fn age_years(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date.and_then(|born| today.years_since(born))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAnimalRequest {
    pub name: String,
    pub species: Species,
    pub breed: String,
    pub sex: Sex,
    pub birth_date: Option<NaiveDate>,
    pub estimated_age: Option<String>,
    pub weight_kg: f64,
    pub microchip: Option<String>,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAnimalRequest {
    pub name: Option<String>,
    pub species: Option<Species>,
    pub breed: Option<String>,
    pub sex: Option<Sex>,
    pub birth_date: Option<NaiveDate>,
    pub estimated_age: Option<String>,
    pub weight_kg: Option<f64>,
    pub microchip: Option<String>,
    pub owner_id: Option<Uuid>,
}

impl UpdateAnimalRequest {
    pub fn apply(self, animal: &mut Animal, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            animal.name = name;
        }
        if let Some(species) = self.species {
            animal.species = species;
        }
        if let Some(breed) = self.breed {
            animal.breed = breed;
        }
        if let Some(sex) = self.sex {
            animal.sex = sex;
        }
        if let Some(birth_date) = self.birth_date {
            animal.birth_date = Some(birth_date);
        }
        if let Some(estimated_age) = self.estimated_age {
            animal.estimated_age = Some(estimated_age);
        }
        if let Some(weight_kg) = self.weight_kg {
            animal.weight_kg = weight_kg;
        }
        if let Some(microchip) = self.microchip {
            animal.microchip = Some(microchip);
        }
        if let Some(owner_id) = self.owner_id {
            animal.owner_id = owner_id;
        }
        animal.updated_at = now;
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Client not found")]
    NotFound,

    #[error("Animal not found")]
    AnimalNotFound,

    #[error("Client still has {count} registered animal(s)")]
    HasAnimals { count: usize },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound | ClientError::AnimalNotFound => {
                AppError::NotFound(err.to_string())
            }
            ClientError::HasAnimals { .. } | ClientError::ValidationError(_) => {
                AppError::ValidationError(err.to_string())
            }
        }
    }
}
