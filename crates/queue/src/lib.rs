//! Durable holding area for submissions the classifier could not take.
//!
//! `OfflineQueue` keeps `PendingItem`s in a `Store` until a drain delivers
//! them. `FileStore` survives restarts; `MemoryStore` does not.

pub mod error;
pub mod file;
pub mod item;
pub mod memory;
pub mod offline;
pub mod store;

pub use error::StoreError;
pub use file::FileStore;
pub use item::PendingItem;
pub use memory::MemoryStore;
pub use offline::{DEFAULT_CAPACITY, DrainFailure, DrainReport, OfflineQueue};
pub use store::{Store, validate_key};
