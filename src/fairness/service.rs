use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::error::AppError;
use crate::fairness::scorer::{FairnessSnapshot, compute_fairness};
use crate::fairness::selector::select_assignee;
use crate::models::Member;
use crate::store::GroupStore;

/// Orchestrates the scorer and selector against live store data. Holds no
/// cache: every call re-reads the group's members and chores, so a snapshot
/// is always consistent with the latest mutation visible to the read path.
pub struct FairnessService {
    store: Arc<dyn GroupStore>,
}

impl FairnessService {
    pub fn new(store: Arc<dyn GroupStore>) -> Self {
        Self { store }
    }

    pub async fn snapshot(&self, group_id: &str) -> Result<FairnessSnapshot, AppError> {
        let members = self.store.load_members(group_id).await?;
        let chores = self.store.load_chores(group_id).await?;
        let snapshot = compute_fairness(&members, &chores, Utc::now());
        info!(
            "fairness snapshot for group {}: {} members, {} chores",
            group_id,
            members.len(),
            chores.len()
        );
        Ok(snapshot)
    }

    pub async fn recommend_assignee(&self, group_id: &str) -> Result<Member, AppError> {
        let members = self.store.load_members(group_id).await?;
        let chores = self.store.load_chores(group_id).await?;
        let snapshot = compute_fairness(&members, &chores, Utc::now());
        select_assignee(&snapshot, &members)
    }
}
