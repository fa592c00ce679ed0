use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A member of one group. Membership is the identity: joining a group
/// creates a member row, leaving removes it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: String,
    pub group_id: String,
    pub display_name: String,
    pub joined_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMemberRequest {
    pub display_name: String,
}
