use async_trait::async_trait;
use school_core::error::AppError;
use tokio::sync::RwLock;

use super::repository::{Entity, Filter, Repository};

/// Process-local collection. Unique only on `id`.
pub struct InMemoryRepository<T> {
    items: RwLock<Vec<T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn find(&self, filter: Filter) -> Result<Vec<T>, AppError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|item| filter.matches(*item))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: Filter) -> Result<u64, AppError> {
        let items = self.items.read().await;
        Ok(items.iter().filter(|item| filter.matches(*item)).count() as u64)
    }

    async fn insert(&self, entity: &T) -> Result<(), AppError> {
        let mut items = self.items.write().await;
        if items.iter().any(|item| item.id() == entity.id()) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "{} with id {} already exists",
                T::COLLECTION,
                entity.id()
            )));
        }
        items.push(entity.clone());
        Ok(())
    }

    async fn update(&self, entity: &T) -> Result<bool, AppError> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|item| item.id() == entity.id()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id() != id);
        Ok(items.len() != before)
    }
}
