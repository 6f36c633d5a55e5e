//! Storage capability shared by every collection.
//!
//! Handlers talk to `Arc<dyn Repository<T>>`; the strategy behind it is
//! MongoDB in deployments and an in-process vector in tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use school_core::error::AppError;

/// A document stored in its own collection, keyed by a string `id`.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// Conjunction of equality clauses on camelCase field names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::all().eq("id", id)
    }

    pub fn eq(mut self, field: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.clauses.push((field.to_string(), value));
        self
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    /// Evaluates the filter against the entity's serialized form.
    pub fn matches<T: Serialize>(&self, entity: &T) -> bool {
        if self.clauses.is_empty() {
            return true;
        }
        let Ok(doc) = serde_json::to_value(entity) else {
            return false;
        };
        self.clauses
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn find(&self, filter: Filter) -> Result<Vec<T>, AppError>;

    async fn find_one(&self, filter: Filter) -> Result<Option<T>, AppError> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    async fn get(&self, id: &str) -> Result<Option<T>, AppError> {
        self.find_one(Filter::by_id(id)).await
    }

    async fn count(&self, filter: Filter) -> Result<u64, AppError>;

    /// Fails with `Conflict` when a unique key is already taken.
    async fn insert(&self, entity: &T) -> Result<(), AppError>;

    /// Replaces the stored document with the same id. Returns false if none.
    async fn update(&self, entity: &T) -> Result<bool, AppError>;

    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}
