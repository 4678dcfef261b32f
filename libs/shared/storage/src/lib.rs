pub mod document;
pub mod file_store;
pub mod memory_store;

pub use document::{load_typed, save_typed, DocumentStore, StorageError};
pub use file_store::JsonFileStore;
pub use memory_store::InMemoryStore;
