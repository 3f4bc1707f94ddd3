use std::sync::Arc;

use assert_matches::assert_matches;
use uuid::Uuid;

use appointment_cell::{
    AppointmentBookingService, AppointmentError, AppointmentStatus, CreateAppointmentRequest,
    InMemoryAppointmentRepository, UpdateAppointmentRequest,
};
use auth_cell::{AuthService, InMemoryUserRepository, RegisterUserRequest};
use client_cell::{
    Address, Animal, AnimalService, Client, ClientService, CreateAnimalRequest,
    CreateClientRequest, InMemoryAnimalRepository, InMemoryClientRepository, Sex, Species,
};
use shared_models::auth::{Role, User};
use shared_utils::test_utils::{clinic_time, TestConfig};

struct TestSetup {
    booking: AppointmentBookingService,
    vet: User,
    joao: Client,
    maria: Client,
    rex: Animal,
    mimi: Animal,
}

fn address() -> Address {
    Address {
        street: "Rua das Flores".to_string(),
        number: "123".to_string(),
        complement: None,
        district: "Centro".to_string(),
        city: "São Paulo".to_string(),
        state: "SP".to_string(),
        postal_code: "01234-567".to_string(),
    }
}

fn client(full_name: &str, document: &str, email: &str) -> CreateClientRequest {
    CreateClientRequest {
        full_name: full_name.to_string(),
        document: document.to_string(),
        phone: "(11) 98765-4321".to_string(),
        email: email.to_string(),
        address: address(),
        notes: None,
    }
}

fn animal(name: &str, species: Species, owner_id: Uuid) -> CreateAnimalRequest {
    CreateAnimalRequest {
        name: name.to_string(),
        species,
        breed: "SRD".to_string(),
        sex: Sex::Female,
        birth_date: None,
        estimated_age: Some("3 anos".to_string()),
        weight_kg: 4.2,
        microchip: None,
        owner_id,
    }
}

impl TestSetup {
    async fn new() -> Self {
        let config = TestConfig::default().to_app_config();
        let users = Arc::new(InMemoryUserRepository::new(&config));
        let client_repo = Arc::new(InMemoryClientRepository::new(&config));
        let animal_repo = Arc::new(InMemoryAnimalRepository::new(&config));
        let appointment_repo = Arc::new(InMemoryAppointmentRepository::new(&config));

        let auth = AuthService::new(users.clone(), Arc::new(config));
        let clients = ClientService::new(client_repo.clone(), animal_repo.clone());
        let animals = AnimalService::new(animal_repo.clone(), client_repo.clone());

        let vet = auth
            .register_user(RegisterUserRequest {
                name: "Dra. Maria Santos".to_string(),
                email: "vet@kikao.vet".to_string(),
                role: Role::Veterinarian,
                password: "senha123".to_string(),
            })
            .await
            .unwrap();

        let joao = clients
            .create_client(client("João Pedro Oliveira", "123.456.789-00", "joao@email.com"))
            .await
            .unwrap();
        let maria = clients
            .create_client(client("Maria Fernanda Costa", "987.654.321-00", "maria@email.com"))
            .await
            .unwrap();

        let rex = animals
            .create_animal(animal("Rex", Species::Canine, joao.id))
            .await
            .unwrap();
        let mimi = animals
            .create_animal(animal("Mimi", Species::Feline, maria.id))
            .await
            .unwrap();

        Self {
            booking: AppointmentBookingService::new(appointment_repo, animal_repo, client_repo, users),
            vet,
            joao,
            maria,
            rex,
            mimi,
        }
    }

    fn request(&self, animal_id: Uuid) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            scheduled_at: clinic_time(2024, 11, 20, 10, 0),
            veterinarian_id: self.vet.id,
            animal_id,
            reason: "Consulta de rotina".to_string(),
            clinical_notes: None,
            diagnosis: None,
            prescription: None,
            total_amount: 150.0,
        }
    }
}

#[tokio::test]
async fn test_booking_resolves_display_names_from_records() {
    let setup = TestSetup::new().await;

    let appointment = setup
        .booking
        .create_appointment(setup.request(setup.rex.id))
        .await
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    assert_eq!(appointment.veterinarian_name, "Dra. Maria Santos");
    assert_eq!(appointment.animal_name, "Rex");
    assert_eq!(appointment.owner_id, setup.joao.id);
    assert_eq!(appointment.owner_name, "João Pedro Oliveira");

    let fetched = setup.booking.get_appointment(appointment.id).await.unwrap();
    assert_eq!(fetched, appointment);
}

#[tokio::test]
async fn test_booking_rejects_unknown_references_and_bad_input() {
    let setup = TestSetup::new().await;

    let mut unknown_vet = setup.request(setup.rex.id);
    unknown_vet.veterinarian_id = Uuid::new_v4();
    assert_matches!(
        setup.booking.create_appointment(unknown_vet).await,
        Err(AppointmentError::VeterinarianNotFound)
    );

    assert_matches!(
        setup.booking.create_appointment(setup.request(Uuid::new_v4())).await,
        Err(AppointmentError::AnimalNotFound)
    );

    let mut blank_reason = setup.request(setup.rex.id);
    blank_reason.reason = "   ".to_string();
    assert_matches!(
        setup.booking.create_appointment(blank_reason).await,
        Err(AppointmentError::ValidationError(_))
    );

    let mut negative = setup.request(setup.rex.id);
    negative.total_amount = -10.0;
    assert_matches!(
        setup.booking.create_appointment(negative).await,
        Err(AppointmentError::ValidationError(_))
    );

    assert!(setup.booking.list_appointments(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_changing_animal_moves_owner() {
    let setup = TestSetup::new().await;
    let appointment = setup
        .booking
        .create_appointment(setup.request(setup.rex.id))
        .await
        .unwrap();

    let updated = setup
        .booking
        .update_appointment(
            appointment.id,
            UpdateAppointmentRequest {
                animal_id: Some(setup.mimi.id),
                diagnosis: Some("Otite".to_string()),
                ..UpdateAppointmentRequest::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.animal_name, "Mimi");
    assert_eq!(updated.owner_id, setup.maria.id);
    assert_eq!(updated.owner_name, "Maria Fernanda Costa");
    assert_eq!(updated.diagnosis.as_deref(), Some("Otite"));
    assert_eq!(updated.reason, appointment.reason);
    assert!(updated.updated_at >= appointment.updated_at);
}

#[tokio::test]
async fn test_update_and_delete_of_missing_appointment() {
    let setup = TestSetup::new().await;

    assert_matches!(
        setup
            .booking
            .update_appointment(Uuid::new_v4(), UpdateAppointmentRequest::default())
            .await,
        Err(AppointmentError::NotFound)
    );
    assert_matches!(
        setup.booking.delete_appointment(Uuid::new_v4()).await,
        Err(AppointmentError::NotFound)
    );
}

#[tokio::test]
async fn test_status_filter_and_delete() {
    let setup = TestSetup::new().await;
    let first = setup
        .booking
        .create_appointment(setup.request(setup.rex.id))
        .await
        .unwrap();
    let second = setup
        .booking
        .create_appointment(setup.request(setup.mimi.id))
        .await
        .unwrap();

    setup
        .booking
        .set_status(first.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    let cancelled = setup
        .booking
        .list_appointments(Some(AppointmentStatus::Cancelled))
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, first.id);
    assert_eq!(setup.booking.list_appointments(None).await.unwrap().len(), 2);
    assert_eq!(
        setup.booking.list_by_veterinarian(setup.vet.id).await.unwrap().len(),
        2
    );

    setup.booking.delete_appointment(second.id).await.unwrap();
    assert_matches!(
        setup.booking.get_appointment(second.id).await,
        Err(AppointmentError::NotFound)
    );
}

#[tokio::test]
async fn test_animal_history() {
    let setup = TestSetup::new().await;

    let past = setup
        .booking
        .create_appointment(setup.request(setup.rex.id))
        .await
        .unwrap();
    setup
        .booking
        .set_status(past.id, AppointmentStatus::Completed)
        .await
        .unwrap();

    let mut follow_up = setup.request(setup.rex.id);
    follow_up.scheduled_at = clinic_time(2024, 12, 2, 9, 0);
    setup.booking.create_appointment(follow_up).await.unwrap();

    let history = setup
        .booking
        .animal_history(setup.rex.id, clinic_time(2024, 11, 25, 12, 0))
        .await
        .unwrap();

    assert_eq!(history.total_appointments, 2);
    assert_eq!(history.completed_appointments, 1);
    assert_eq!(history.last_visit, Some(clinic_time(2024, 11, 20, 10, 0)));
    assert_eq!(history.next_appointment, Some(clinic_time(2024, 12, 2, 9, 0)));

    assert_eq!(
        setup.booking.list_by_animal(setup.mimi.id).await.unwrap().len(),
        0
    );
    assert_matches!(
        setup.booking.animal_history(Uuid::new_v4(), clinic_time(2024, 11, 25, 12, 0)).await,
        Err(AppointmentError::AnimalNotFound)
    );
}
