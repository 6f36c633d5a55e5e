//! HTTP handlers, one module per resource.

pub mod admissions;
pub mod attendance;
pub mod auth;
pub mod batches;
pub mod dashboard;
pub mod fees;
pub mod health;
pub mod homework;
pub mod landing;
pub mod notices;
pub mod students;
pub mod users;
