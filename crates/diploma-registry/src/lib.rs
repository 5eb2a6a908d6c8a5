//! Diploma Registry: Credential lifecycle, sharing, query, and directory
//! engines over the entity stores.

pub mod directory;
pub mod lifecycle;
pub mod locks;
pub mod query;
pub mod registry;
pub mod sharing;

pub use directory::Directory;
pub use lifecycle::LifecycleEngine;
pub use locks::LockTable;
pub use query::{QueryEngine, SearchFilter};
pub use registry::Registry;
pub use sharing::SharingEngine;
