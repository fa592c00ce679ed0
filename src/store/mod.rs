use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{Chore, Member};

/// Read boundary between the fairness engine and chore/member persistence.
/// Both calls are queries; the engine never writes through this trait.
#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn load_members(&self, group_id: &str) -> Result<Vec<Member>, AppError>;
    async fn load_chores(&self, group_id: &str) -> Result<Vec<Chore>, AppError>;
}

pub struct SqliteGroupStore {
    db: SqlitePool,
}

impl SqliteGroupStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// An unknown group id must surface as `GroupNotFound`, not as an empty
    /// member list.
    async fn require_group(&self, group_id: &str) -> Result<(), AppError> {
        repository::find_group_by_id(&self.db, group_id)
            .await?
            .ok_or(AppError::GroupNotFound)?;
        Ok(())
    }
}

#[async_trait]
impl GroupStore for SqliteGroupStore {
    async fn load_members(&self, group_id: &str) -> Result<Vec<Member>, AppError> {
        self.require_group(group_id).await?;
        Ok(repository::fetch_members(&self.db, group_id).await?)
    }

    async fn load_chores(&self, group_id: &str) -> Result<Vec<Chore>, AppError> {
        self.require_group(group_id).await?;
        Ok(repository::fetch_chores(&self.db, group_id).await?)
    }
}

/// Store backed by plain maps, for tests and local experiments.
#[derive(Default)]
pub struct InMemoryGroupStore {
    groups: Mutex<HashMap<String, (Vec<Member>, Vec<Chore>)>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_group(&self, group_id: &str, members: Vec<Member>, chores: Vec<Chore>) {
        self.groups
            .lock()
            .await
            .insert(group_id.to_string(), (members, chores));
    }
}

#[async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn load_members(&self, group_id: &str) -> Result<Vec<Member>, AppError> {
        self.groups
            .lock()
            .await
            .get(group_id)
            .map(|(members, _)| members.clone())
            .ok_or(AppError::GroupNotFound)
    }

    async fn load_chores(&self, group_id: &str) -> Result<Vec<Chore>, AppError> {
        self.groups
            .lock()
            .await
            .get(group_id)
            .map(|(_, chores)| chores.clone())
            .ok_or(AppError::GroupNotFound)
    }
}
