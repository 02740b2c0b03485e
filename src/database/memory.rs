use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::Programmer;
use super::store::{ProgrammerStore, StoreError};

/// Process-local store used when no database is configured, and by tests.
/// Keeps programmers in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Programmer>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saves and deletes that reached the store
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProgrammerStore for MemoryStore {
    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Programmer>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|p| p.nickname.as_deref() == Some(nickname))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Programmer>, StoreError> {
        Ok(self.rows.read().await.clone())
    }

    async fn save(&self, mut programmer: Programmer) -> Result<Programmer, StoreError> {
        let mut rows = self.rows.write().await;

        match programmer.id {
            None => {
                let nickname = programmer
                    .nickname
                    .as_deref()
                    .ok_or_else(|| StoreError::InvalidRecord("nickname is required".to_string()))?;
                if rows.iter().any(|p| p.nickname.as_deref() == Some(nickname)) {
                    return Err(StoreError::Conflict {
                        field: "nickname",
                        message: format!("nickname '{}' already exists", nickname),
                    });
                }
                if programmer.owner_id.is_none() {
                    return Err(StoreError::InvalidRecord("owner is required".to_string()));
                }

                programmer.id = Some(Uuid::new_v4());
                rows.push(programmer.clone());
            }
            Some(id) => {
                let existing = rows
                    .iter_mut()
                    .find(|p| p.id == Some(id))
                    .ok_or(StoreError::Missing(id))?;

                // Identity columns stay as first written
                existing.avatar_number = programmer.avatar_number;
                existing.tag_line = programmer.tag_line.clone();
                programmer = existing.clone();
            }
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(programmer)
    }

    async fn delete(&self, programmer: &Programmer) -> Result<(), StoreError> {
        let Some(id) = programmer.id else {
            return Ok(());
        };

        let mut rows = self.rows.write().await;
        rows.retain(|p| p.id != Some(id));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
