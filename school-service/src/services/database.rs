use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};
use school_core::error::AppError;

use super::repository::{Entity, Filter, Repository};
use crate::models::{
    AdmissionApplication, AdmissionEnquiry, AttendanceRecord, Batch, FeeInvoice, Homework,
    LandingConfig, Notice, Student, User,
};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for school-service");

        for collection in [
            User::COLLECTION,
            Student::COLLECTION,
            Batch::COLLECTION,
            FeeInvoice::COLLECTION,
            AdmissionEnquiry::COLLECTION,
            AdmissionApplication::COLLECTION,
            AttendanceRecord::COLLECTION,
            Notice::COLLECTION,
            Homework::COLLECTION,
            LandingConfig::COLLECTION,
        ] {
            self.create_index(collection, doc! { "id": 1 }, "id_unique", true)
                .await?;
        }

        self.create_index(User::COLLECTION, doc! { "email": 1 }, "email_unique", true)
            .await?;
        self.create_index(Batch::COLLECTION, doc! { "name": 1 }, "name_unique", true)
            .await?;
        self.create_index(
            AttendanceRecord::COLLECTION,
            doc! { "studentId": 1, "date": 1 },
            "student_date_unique",
            true,
        )
        .await?;
        self.create_index(
            FeeInvoice::COLLECTION,
            doc! { "studentId": 1 },
            "student_lookup",
            false,
        )
        .await?;
        self.create_index(
            Student::COLLECTION,
            doc! { "parentId": 1 },
            "parent_lookup",
            false,
        )
        .await?;

        Ok(())
    }

    async fn create_index(
        &self,
        collection: &str,
        keys: Document,
        name: &str,
        unique: bool,
    ) -> Result<(), AppError> {
        let index = IndexModel::builder()
            .keys(keys)
            .options(
                IndexOptions::builder()
                    .name(name.to_string())
                    .unique(unique)
                    .build(),
            )
            .build();

        self.db
            .collection::<Document>(collection)
            .create_index(index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create {} index on {}: {}", name, collection, e);
                AppError::from(e)
            })?;
        tracing::info!("Created index {}.{}", collection, name);
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

pub struct MongoRepository<T> {
    collection: Collection<T>,
}

impl<T: Entity> MongoRepository<T> {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.database().collection(T::COLLECTION),
        }
    }
}

fn to_document(filter: &Filter) -> Result<Document, AppError> {
    let mut document = Document::new();
    for (field, value) in filter.clauses() {
        document.insert(field.clone(), mongodb::bson::to_bson(value)?);
    }
    Ok(document)
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl<T: Entity> Repository<T> for MongoRepository<T> {
    async fn find(&self, filter: Filter) -> Result<Vec<T>, AppError> {
        let cursor = self.collection.find(to_document(&filter)?, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one(&self, filter: Filter) -> Result<Option<T>, AppError> {
        Ok(self
            .collection
            .find_one(to_document(&filter)?, None)
            .await?)
    }

    async fn count(&self, filter: Filter) -> Result<u64, AppError> {
        Ok(self
            .collection
            .count_documents(to_document(&filter)?, None)
            .await?)
    }

    async fn insert(&self, entity: &T) -> Result<(), AppError> {
        self.collection
            .insert_one(entity, None)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::Conflict(anyhow::anyhow!(
                        "Duplicate key in {}",
                        T::COLLECTION
                    ))
                } else {
                    AppError::from(e)
                }
            })?;
        Ok(())
    }

    async fn update(&self, entity: &T) -> Result<bool, AppError> {
        let result = self
            .collection
            .replace_one(doc! { "id": entity.id() }, entity, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = self.collection.delete_one(doc! { "id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }
}
