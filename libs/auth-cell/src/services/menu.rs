use serde::{Deserialize, Serialize};

use shared_models::auth::Role;

/// Top-level areas of the console navigation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Dashboard,
    Clients,
    Animals,
    Appointments,
    Agenda,
    Finance,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Dashboard,
        Section::Clients,
        Section::Animals,
        Section::Appointments,
        Section::Agenda,
        Section::Finance,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Section::Dashboard => "/dashboard",
            Section::Clients => "/responsaveis",
            Section::Animals => "/animais",
            Section::Appointments => "/consultas",
            Section::Agenda => "/agenda",
            Section::Finance => "/financeiro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Clients => "Responsáveis",
            Section::Animals => "Animais",
            Section::Appointments => "Consultas",
            Section::Agenda => "Agenda",
            Section::Finance => "Financeiro",
        }
    }

    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Section::Finance => &[Role::Admin],
            _ => &[Role::Admin, Role::Veterinarian],
        }
    }
}

/// Sections shown in the navigation for `role`. Menu filtering only; it does
/// not guard the underlying services.
pub fn visible_sections(role: Role) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|section| section.allowed_roles().contains(&role))
        .collect()
}
