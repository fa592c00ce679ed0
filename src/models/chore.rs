use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Chore lifecycle: `pending` and `completed` are the only states, and the
/// only transition is the toggle between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ChoreStatus {
    Pending,
    Completed,
}

impl ChoreStatus {
    pub fn toggled(self) -> Self {
        match self {
            ChoreStatus::Pending => ChoreStatus::Completed,
            ChoreStatus::Completed => ChoreStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chore {
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<String>,
    pub status: ChoreStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChoreRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub use_fair_assignment: bool,
}

/// Status is deliberately absent: completion state only changes through the
/// toggle endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateChoreRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub assigned_to: Option<String>,
}
