use std::sync::Arc;

use super::database::{MongoDb, MongoRepository};
use super::memory::InMemoryRepository;
use super::repository::Repository;
use crate::models::{
    AdmissionApplication, AdmissionEnquiry, AttendanceRecord, Batch, FeeInvoice, Homework,
    LandingConfig, Notice, Student, User,
};

/// One repository per collection.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn Repository<User>>,
    pub students: Arc<dyn Repository<Student>>,
    pub batches: Arc<dyn Repository<Batch>>,
    pub fees: Arc<dyn Repository<FeeInvoice>>,
    pub enquiries: Arc<dyn Repository<AdmissionEnquiry>>,
    pub applications: Arc<dyn Repository<AdmissionApplication>>,
    pub attendance: Arc<dyn Repository<AttendanceRecord>>,
    pub notices: Arc<dyn Repository<Notice>>,
    pub homework: Arc<dyn Repository<Homework>>,
    pub landing: Arc<dyn Repository<LandingConfig>>,
}

impl Store {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryRepository::new()),
            students: Arc::new(InMemoryRepository::new()),
            batches: Arc::new(InMemoryRepository::new()),
            fees: Arc::new(InMemoryRepository::new()),
            enquiries: Arc::new(InMemoryRepository::new()),
            applications: Arc::new(InMemoryRepository::new()),
            attendance: Arc::new(InMemoryRepository::new()),
            notices: Arc::new(InMemoryRepository::new()),
            homework: Arc::new(InMemoryRepository::new()),
            landing: Arc::new(InMemoryRepository::new()),
        }
    }

    pub fn mongo(db: &MongoDb) -> Self {
        Self {
            users: Arc::new(MongoRepository::new(db)),
            students: Arc::new(MongoRepository::new(db)),
            batches: Arc::new(MongoRepository::new(db)),
            fees: Arc::new(MongoRepository::new(db)),
            enquiries: Arc::new(MongoRepository::new(db)),
            applications: Arc::new(MongoRepository::new(db)),
            attendance: Arc::new(MongoRepository::new(db)),
            notices: Arc::new(MongoRepository::new(db)),
            homework: Arc::new(MongoRepository::new(db)),
            landing: Arc::new(MongoRepository::new(db)),
        }
    }
}
