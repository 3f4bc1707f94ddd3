use serde::{Deserialize, Serialize};

/// Headline numbers for the home page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_clients: usize,
    pub total_animals: usize,
    pub appointments_today: usize,
    /// Appointments scheduled in the seven days up to now.
    pub appointments_last_week: usize,
    pub monthly_revenue: f64,
    /// Monthly revenue minus monthly expense.
    pub monthly_balance: f64,
}
