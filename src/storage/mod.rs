//! The table store port: the persistence boundary every step writes
//! through, with file and in-memory backends.

pub mod backends;
pub mod error;
pub mod factory;
pub mod traits;

pub use backends::{FileStore, MemoryStore};
pub use error::{StorageError, StorageResult};
pub use factory::StorageFactory;
pub use traits::TableStore;
