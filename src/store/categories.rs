use std::sync::Arc;

use crate::{
    budget::{
        category::{Category, CategoryBook},
        entry::EntryType,
    },
    errors::StorageError,
    storage::{KeyValueStore, CATEGORIES_KEY},
};

/// Category book backed by the `budgetCategories` key.
///
/// Mutations are applied in memory first; a failed write is reported but not
/// rolled back, matching [`super::EntryStore`].
pub struct CategoryRegistry {
    backend: Arc<dyn KeyValueStore>,
    book: CategoryBook,
}

impl CategoryRegistry {
    /// Loads the stored book, falling back to the default categories.
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let book = match backend.get(CATEGORIES_KEY)? {
            Some(value) => serde_json::from_value(value)?,
            None => CategoryBook::default(),
        };
        Ok(Self { backend, book })
    }

    pub fn book(&self) -> &CategoryBook {
        &self.book
    }

    pub fn details(&self, kind: EntryType, reference: &str) -> Option<&Category> {
        self.book.details(kind, reference)
    }

    pub fn add(
        &mut self,
        kind: EntryType,
        name: impl Into<String>,
        icon: impl Into<String>,
    ) -> Result<u64, StorageError> {
        let id = self.book.add(kind, name, icon);
        self.save()?;
        Ok(id)
    }

    pub fn remove(&mut self, kind: EntryType, id: u64) -> Result<Option<Category>, StorageError> {
        let removed = self.book.remove(kind, id);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn replace(&mut self, book: CategoryBook) -> Result<(), StorageError> {
        self.book = book;
        self.save()
    }

    fn save(&self) -> Result<(), StorageError> {
        let value = serde_json::to_value(&self.book)?;
        self.backend.set(CATEGORIES_KEY, &value).map_err(|err| {
            tracing::warn!("categories kept in memory but not persisted: {}", err);
            err
        })
    }
}
