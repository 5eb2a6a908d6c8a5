//! Diploma Store: Key-value collections for the registry records.
//!
//! Every record type lives in its own collection keyed by its generated id.
//! Collections support insert, point lookup, and full enumeration in key
//! order; there are no secondary indexes and no cross-collection
//! transactions.

pub mod collection;
pub mod error;
pub mod memory;
pub mod rocks;

pub use collection::{Collection, Record, Stores};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryCollection;
pub use rocks::{RocksCollection, RocksStorage};
