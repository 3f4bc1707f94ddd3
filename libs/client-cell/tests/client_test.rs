use std::sync::Arc;

use assert_matches::assert_matches;
use uuid::Uuid;

use client_cell::{
    Address, AnimalService, ClientError, ClientService, CreateAnimalRequest, CreateClientRequest,
    InMemoryAnimalRepository, InMemoryClientRepository, Sex, Species, UpdateAnimalRequest,
    UpdateClientRequest,
};
use shared_utils::test_utils::{date, TestConfig};

struct TestSetup {
    clients: ClientService,
    animals: AnimalService,
}

impl TestSetup {
    fn new() -> Self {
        let config = TestConfig::default().to_app_config();
        let client_repo = Arc::new(InMemoryClientRepository::new(&config));
        let animal_repo = Arc::new(InMemoryAnimalRepository::new(&config));

        Self {
            clients: ClientService::new(client_repo.clone(), animal_repo.clone()),
            animals: AnimalService::new(animal_repo, client_repo),
        }
    }
}

fn address() -> Address {
    Address {
        street: "Rua das Flores".to_string(),
        number: "123".to_string(),
        complement: Some("Apto 45".to_string()),
        district: "Centro".to_string(),
        city: "São Paulo".to_string(),
        state: "SP".to_string(),
        postal_code: "01234-567".to_string(),
    }
}

fn joao() -> CreateClientRequest {
    CreateClientRequest {
        full_name: "João Pedro Oliveira".to_string(),
        document: "123.456.789-00".to_string(),
        phone: "(11) 98765-4321".to_string(),
        email: "joao@email.com".to_string(),
        address: address(),
        notes: None,
    }
}

fn rex(owner_id: Uuid) -> CreateAnimalRequest {
    CreateAnimalRequest {
        name: "Rex".to_string(),
        species: Species::Canine,
        breed: "Labrador".to_string(),
        sex: Sex::Male,
        birth_date: Some(date(2020, 5, 15)),
        estimated_age: None,
        weight_kg: 30.5,
        microchip: Some("123456789012345".to_string()),
        owner_id,
    }
}

#[tokio::test]
async fn test_search_matches_name_email_document_and_phone() {
    let setup = TestSetup::new();
    setup.clients.create_client(joao()).await.unwrap();
    setup
        .clients
        .create_client(CreateClientRequest {
            full_name: "Maria Fernanda Costa".to_string(),
            document: "987.654.321-00".to_string(),
            phone: "(11) 91234-5678".to_string(),
            email: "maria@email.com".to_string(),
            address: address(),
            notes: Some("Prefere contato por WhatsApp".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(setup.clients.search_clients("JOÃO").await.unwrap().len(), 1);
    assert_eq!(setup.clients.search_clients("maria@").await.unwrap().len(), 1);
    assert_eq!(setup.clients.search_clients("987.654").await.unwrap().len(), 1);
    assert_eq!(setup.clients.search_clients("(11)").await.unwrap().len(), 2);
    assert_eq!(setup.clients.search_clients("  ").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_required_fields_are_validated() {
    let setup = TestSetup::new();

    let mut request = joao();
    request.full_name = "   ".to_string();
    assert_matches!(
        setup.clients.create_client(request).await,
        Err(ClientError::ValidationError(_))
    );

    let mut request = joao();
    request.document = "123".to_string();
    assert_matches!(
        setup.clients.create_client(request).await,
        Err(ClientError::ValidationError(_))
    );
}

#[tokio::test]
async fn test_update_and_delete_missing_client() {
    let setup = TestSetup::new();
    let missing = Uuid::new_v4();

    assert_matches!(
        setup.clients.update_client(missing, UpdateClientRequest::default()).await,
        Err(ClientError::NotFound)
    );
    assert_matches!(setup.clients.delete_client(missing).await, Err(ClientError::NotFound));
}

#[tokio::test]
async fn test_update_changes_only_given_fields() {
    let setup = TestSetup::new();
    let client = setup.clients.create_client(joao()).await.unwrap();

    let updated = setup
        .clients
        .update_client(
            client.id,
            UpdateClientRequest {
                phone: Some("(11) 90000-0000".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.phone, "(11) 90000-0000");
    assert_eq!(updated.full_name, client.full_name);
    assert!(updated.updated_at >= client.updated_at);
}

#[tokio::test]
async fn test_animal_requires_existing_owner() {
    let setup = TestSetup::new();
    assert_matches!(
        setup.animals.create_animal(rex(Uuid::new_v4())).await,
        Err(ClientError::NotFound)
    );
}

#[tokio::test]
async fn test_owner_with_animals_cannot_be_deleted() {
    let setup = TestSetup::new();
    let owner = setup.clients.create_client(joao()).await.unwrap();
    let animal = setup.animals.create_animal(rex(owner.id)).await.unwrap();

    assert_eq!(setup.animals.list_by_owner(owner.id).await.unwrap().len(), 1);
    assert_matches!(
        setup.clients.delete_client(owner.id).await,
        Err(ClientError::HasAnimals { count: 1 })
    );

    setup.animals.delete_animal(animal.id).await.unwrap();
    setup.clients.delete_client(owner.id).await.unwrap();
    assert_matches!(setup.clients.get_client(owner.id).await, Err(ClientError::NotFound));
}

#[tokio::test]
async fn test_animal_weight_and_owner_changes_are_checked() {
    let setup = TestSetup::new();
    let owner = setup.clients.create_client(joao()).await.unwrap();
    let animal = setup.animals.create_animal(rex(owner.id)).await.unwrap();

    assert_matches!(
        setup
            .animals
            .update_animal(
                animal.id,
                UpdateAnimalRequest {
                    weight_kg: Some(-1.0),
                    ..Default::default()
                }
            )
            .await,
        Err(ClientError::ValidationError(_))
    );
    assert_matches!(
        setup
            .animals
            .update_animal(
                animal.id,
                UpdateAnimalRequest {
                    owner_id: Some(Uuid::new_v4()),
                    ..Default::default()
                }
            )
            .await,
        Err(ClientError::NotFound)
    );

    let heavier = setup
        .animals
        .update_animal(
            animal.id,
            UpdateAnimalRequest {
                weight_kg: Some(32.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(heavier.weight_kg, 32.0);
    assert_eq!(heavier.age_years(date(2024, 11, 20)), Some(4));
}
