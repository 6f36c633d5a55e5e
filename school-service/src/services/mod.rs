pub mod clock;
pub mod database;
pub mod enrollment;
pub mod fee_plans;
pub mod jwt;
pub mod memory;
pub mod metrics;
pub mod repository;
pub mod seed;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use database::{MongoDb, MongoRepository};
pub use jwt::{Claims, TokenService};
pub use memory::InMemoryRepository;
pub use metrics::{get_metrics, init_metrics, record_fee_payment};
pub use repository::{Entity, Filter, Repository};
pub use store::Store;
