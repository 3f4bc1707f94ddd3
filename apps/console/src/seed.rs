use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::info;

use appointment_cell::{
    AppointmentBookingService, AppointmentStatus, CreateAppointmentRequest,
    InMemoryAppointmentRepository,
};
use auth_cell::{AuthService, InMemoryUserRepository, RegisterUserRequest};
use client_cell::{
    Address, AnimalService, ClientService, CreateAnimalRequest, CreateClientRequest,
    InMemoryAnimalRepository, InMemoryClientRepository, Sex, Species,
};
use dashboard_cell::DashboardService;
use finance_cell::{
    Category, CreateEntryRequest, EntryKind, FinanceService, InMemoryLedgerRepository,
};
use shared_config::AppConfig;
use shared_models::auth::Role;

pub const DEMO_PASSWORD: &str = "senha123";
pub const ADMIN_EMAIL: &str = "admin@kikao.vet";

/// Every service of the clinic wired over one set of in-memory stores.
pub struct Clinic {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub clients: ClientService,
    pub animals: AnimalService,
    pub booking: AppointmentBookingService,
    pub appointments: Arc<InMemoryAppointmentRepository>,
    pub finance: FinanceService,
    pub dashboard: DashboardService,
}

impl Clinic {
    pub fn new(config: AppConfig) -> Self {
        let config = Arc::new(config);

        let users = Arc::new(InMemoryUserRepository::new(&config));
        let client_repo = Arc::new(InMemoryClientRepository::new(&config));
        let animal_repo = Arc::new(InMemoryAnimalRepository::new(&config));
        let appointments = Arc::new(InMemoryAppointmentRepository::new(&config));
        let ledger = Arc::new(InMemoryLedgerRepository::new(&config));

        Self {
            auth: AuthService::new(users.clone(), config.clone()),
            clients: ClientService::new(client_repo.clone(), animal_repo.clone()),
            animals: AnimalService::new(animal_repo.clone(), client_repo.clone()),
            booking: AppointmentBookingService::new(
                appointments.clone(),
                animal_repo.clone(),
                client_repo.clone(),
                users,
            ),
            finance: FinanceService::new(ledger.clone()),
            dashboard: DashboardService::new(
                client_repo,
                animal_repo,
                appointments.clone(),
                ledger,
                &config,
            ),
            appointments,
            config,
        }
    }

    fn at(&self, date: NaiveDate, hour: u32, minute: u32) -> Result<DateTime<Utc>> {
        let naive = date
            .and_hms_opt(hour, minute, 0)
            .context("invalid seed time")?;
        let local = self
            .config
            .utc_offset
            .from_local_datetime(&naive)
            .single()
            .context("ambiguous seed time")?;
        Ok(local.with_timezone(&Utc))
    }

    /// Demo data: two staff members, two clients with one animal each, two
    /// appointments in November 2024 and their ledger lines.
    pub async fn seed(&self) -> Result<()> {
        let admin = self
            .auth
            .register_user(RegisterUserRequest {
                name: "Dr. Carlos Silva".to_string(),
                email: ADMIN_EMAIL.to_string(),
                role: Role::Admin,
                password: DEMO_PASSWORD.to_string(),
            })
            .await?;
        let vet = self
            .auth
            .register_user(RegisterUserRequest {
                name: "Dra. Maria Santos".to_string(),
                email: "vet@kikao.vet".to_string(),
                role: Role::Veterinarian,
                password: DEMO_PASSWORD.to_string(),
            })
            .await?;

        let joao = self
            .clients
            .create_client(CreateClientRequest {
                full_name: "João Pedro Oliveira".to_string(),
                document: "123.456.789-00".to_string(),
                phone: "(38) 99999-1111".to_string(),
                email: "joao@email.com".to_string(),
                address: Address {
                    street: "Rua das Flores".to_string(),
                    number: "123".to_string(),
                    complement: None,
                    district: "Centro".to_string(),
                    city: "Montes Claros".to_string(),
                    state: "MG".to_string(),
                    postal_code: "39400-000".to_string(),
                },
                notes: Some("Cliente preferencial".to_string()),
            })
            .await?;
        let maria = self
            .clients
            .create_client(CreateClientRequest {
                full_name: "Maria Fernanda Costa".to_string(),
                document: "987.654.321-00".to_string(),
                phone: "(38) 98888-2222".to_string(),
                email: "maria@email.com".to_string(),
                address: Address {
                    street: "Av. Principal".to_string(),
                    number: "456".to_string(),
                    complement: Some("Apto 201".to_string()),
                    district: "São José".to_string(),
                    city: "Montes Claros".to_string(),
                    state: "MG".to_string(),
                    postal_code: "39401-000".to_string(),
                },
                notes: None,
            })
            .await?;

        let rex = self
            .animals
            .create_animal(CreateAnimalRequest {
                name: "Rex".to_string(),
                species: Species::Canine,
                breed: "Labrador".to_string(),
                sex: Sex::Male,
                birth_date: NaiveDate::from_ymd_opt(2020, 5, 15),
                estimated_age: None,
                weight_kg: 28.5,
                microchip: Some("123456789012345".to_string()),
                owner_id: joao.id,
            })
            .await?;
        let mimi = self
            .animals
            .create_animal(CreateAnimalRequest {
                name: "Mimi".to_string(),
                species: Species::Feline,
                breed: "Siamês".to_string(),
                sex: Sex::Female,
                birth_date: NaiveDate::from_ymd_opt(2021, 3, 20),
                estimated_age: None,
                weight_kg: 4.2,
                microchip: None,
                owner_id: maria.id,
            })
            .await?;

        let consult_day = NaiveDate::from_ymd_opt(2024, 11, 20).context("invalid seed date")?;
        let vaccine_day = NaiveDate::from_ymd_opt(2024, 11, 25).context("invalid seed date")?;

        let consult = self
            .booking
            .create_appointment(CreateAppointmentRequest {
                scheduled_at: self.at(consult_day, 10, 0)?,
                veterinarian_id: admin.id,
                animal_id: rex.id,
                reason: "Consulta de rotina".to_string(),
                clinical_notes: Some("Animal apresenta bom estado geral".to_string()),
                diagnosis: Some("Saudável".to_string()),
                prescription: None,
                total_amount: 150.0,
            })
            .await?;
        self.booking
            .set_status(consult.id, AppointmentStatus::Completed)
            .await?;

        self.booking
            .create_appointment(CreateAppointmentRequest {
                scheduled_at: self.at(vaccine_day, 14, 30)?,
                veterinarian_id: vet.id,
                animal_id: mimi.id,
                reason: "Vacinação".to_string(),
                clinical_notes: None,
                diagnosis: None,
                prescription: None,
                total_amount: 80.0,
            })
            .await?;

        let ledger = [
            (EntryKind::Revenue, 150.0, (2024, 11, 20), "Consulta - Rex", Category::Consultation, Some(consult.id)),
            (EntryKind::Expense, 500.0, (2024, 11, 15), "Compra de medicamentos", Category::Medication, None),
            (EntryKind::Revenue, 80.0, (2024, 11, 18), "Vacinação - Mimi", Category::Vaccine, None),
        ];
        for (kind, amount, (y, m, d), description, category, appointment_id) in ledger {
            self.finance
                .create_entry(CreateEntryRequest {
                    kind,
                    amount,
                    date: NaiveDate::from_ymd_opt(y, m, d).context("invalid seed date")?,
                    description: description.to_string(),
                    category,
                    appointment_id,
                })
                .await?;
        }

        info!("Seeded demo clinic data");
        Ok(())
    }
}
