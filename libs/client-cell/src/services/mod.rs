pub mod animal;
pub mod client;
pub mod repository;

pub use animal::AnimalService;
pub use client::ClientService;
pub use repository::*;
