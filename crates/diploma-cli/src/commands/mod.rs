pub mod client;
pub mod credential;
pub mod health;
pub mod institution;
pub mod notifications;
pub mod query;
pub mod student;
