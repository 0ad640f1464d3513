use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
    /// Filled when an invited user accepts; a project has a single invite slot.
    pub invited_user_id: Option<Uuid>,
    /// Email the outstanding invitation was addressed to, cleared on acceptance.
    pub pending_invite_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
