pub mod json_file;
pub mod memory;

use serde_json::Value;

use crate::errors::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Key holding the `{ income, expense, saving }` entry document.
pub const BUDGET_KEY: &str = "budgetData";
/// Key holding the category book.
pub const CATEGORIES_KEY: &str = "budgetCategories";

/// Abstraction over the key-value persistence the tracker writes whole
/// documents into. Every `set` overwrites the previous value.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: &Value) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
