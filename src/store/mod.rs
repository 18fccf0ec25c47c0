//! Authoritative in-memory collection of entries, persisted through a
//! [`KeyValueStore`] after every committed mutation.

pub mod categories;
pub mod change;

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    budget::{
        entry::{Entry, EntryDraft, EntryId, EntryPatch, EntryType},
        savings::{normalize, resync_goal, GoalEdit, SavingsGoal},
    },
    clock::Clock,
    errors::{StorageError, ValidationError},
    storage::{KeyValueStore, BUDGET_KEY},
};

pub use categories::CategoryRegistry;
pub use change::{ChangeKind, ChangeListener, StoreChange};

/// Persisted `{ income, expense, saving }` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetDocument {
    #[serde(default)]
    pub income: Vec<Entry>,
    #[serde(default)]
    pub expense: Vec<Entry>,
    #[serde(default)]
    pub saving: Vec<Entry>,
}

impl BudgetDocument {
    pub fn bucket(&self, kind: EntryType) -> &[Entry] {
        match kind {
            EntryType::Income => &self.income,
            EntryType::Expense => &self.expense,
            EntryType::Saving => &self.saving,
        }
    }

    fn bucket_mut(&mut self, kind: EntryType) -> &mut Vec<Entry> {
        match kind {
            EntryType::Income => &mut self.income,
            EntryType::Expense => &mut self.expense,
            EntryType::Saving => &mut self.saving,
        }
    }

    pub fn push(&mut self, kind: EntryType, entry: Entry) {
        self.bucket_mut(kind).push(entry);
    }

    /// Locates an entry across all three buckets.
    pub fn position(&self, id: EntryId) -> Option<(EntryType, usize)> {
        EntryType::ALL.iter().find_map(|kind| {
            self.bucket(*kind)
                .iter()
                .position(|entry| entry.id == id)
                .map(|index| (*kind, index))
        })
    }

    pub fn len(&self) -> usize {
        self.income.len() + self.expense.len() + self.saving.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads a stored document, dropping entries that no longer validate
    /// instead of failing the whole load.
    pub fn from_value(value: Value) -> Result<Self, StorageError> {
        #[derive(Deserialize, Default)]
        struct RawDocument {
            #[serde(default)]
            income: Vec<Value>,
            #[serde(default)]
            expense: Vec<Value>,
            #[serde(default)]
            saving: Vec<Value>,
        }

        let raw: RawDocument = serde_json::from_value(value)?;
        let mut document = BudgetDocument::default();
        for (kind, values) in [
            (EntryType::Income, raw.income),
            (EntryType::Expense, raw.expense),
            (EntryType::Saving, raw.saving),
        ] {
            for value in values {
                match serde_json::from_value::<Entry>(value) {
                    Ok(entry) => document.bucket_mut(kind).push(entry),
                    Err(err) => tracing::warn!("skipping invalid {} entry: {}", kind, err),
                }
            }
        }
        Ok(document)
    }
}

pub struct EntryStore {
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    document: BudgetDocument,
    revision: u64,
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryStore")
            .field("entries", &self.document.len())
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EntryStore {
    /// Empty store; nothing is read from `backend` until the first write.
    pub fn new(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            document: BudgetDocument::default(),
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// Store seeded from whatever `backend` holds under `budgetData`.
    pub fn load(
        backend: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StorageError> {
        let document = match backend.get(BUDGET_KEY)? {
            Some(value) => BudgetDocument::from_value(value)?,
            None => BudgetDocument::default(),
        };
        tracing::debug!("loaded {} entries", document.len());
        let mut store = Self::new(backend, clock);
        store.document = document;
        Ok(store)
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn document(&self) -> &BudgetDocument {
        &self.document
    }

    pub fn all(&self, kind: EntryType) -> &[Entry] {
        self.document.bucket(kind)
    }

    pub fn get(&self, id: EntryId) -> Option<(EntryType, &Entry)> {
        let (kind, index) = self.document.position(id)?;
        Some((kind, &self.document.bucket(kind)[index]))
    }

    /// Bumped on every committed mutation; lets derived caches notice staleness.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, listener: Box<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    /// Validates `draft` (normalising it first when it is a savings goal) and
    /// appends the resulting entry to its bucket.
    pub fn add(
        &mut self,
        kind: EntryType,
        draft: EntryDraft,
    ) -> Result<StoreChange, ValidationError> {
        let entry = self.prepare(kind, draft).map_err(|err| {
            tracing::debug!("rejected new {} entry: {}", kind, err);
            err
        })?;
        let id = entry.id;
        self.document.bucket_mut(kind).push(entry);
        Ok(self.commit(ChangeKind::Added, Some(kind), Some(id)))
    }

    /// Turns a draft into a validated entry without inserting it. Savings
    /// drafts are normalised against the store's clock.
    pub fn prepare(&self, kind: EntryType, draft: EntryDraft) -> Result<Entry, ValidationError> {
        match kind {
            EntryType::Saving => {
                let goal = SavingsGoal::from_draft(&draft)?;
                normalize(&goal, self.clock.today())
            }
            EntryType::Income | EntryType::Expense => draft.into_entry(),
        }
    }

    /// Applies `patch` to the entry with `id`. Unknown ids and empty patches
    /// are no-ops and return `Ok(None)`; an invalid merged candidate leaves
    /// the stored entry untouched.
    pub fn update(
        &mut self,
        id: EntryId,
        patch: EntryPatch,
    ) -> Result<Option<StoreChange>, ValidationError> {
        let Some((kind, index)) = self.document.position(id) else {
            tracing::debug!("update ignored: no entry {}", id);
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(None);
        }
        let candidate = self
            .patched_candidate(kind, &self.document.bucket(kind)[index], &patch)
            .map_err(|err| {
                tracing::debug!("rejected update of {}: {}", id, err);
                err
            })?;
        self.document.bucket_mut(kind)[index] = candidate;
        Ok(Some(self.commit(ChangeKind::Updated, Some(kind), Some(id))))
    }

    fn patched_candidate(
        &self,
        kind: EntryType,
        current: &Entry,
        patch: &EntryPatch,
    ) -> Result<Entry, ValidationError> {
        if patch.total_amount.is_some() && kind != EntryType::Saving {
            return Err(ValidationError::TotalWithoutGoal);
        }
        for amount in [patch.amount, patch.total_amount].into_iter().flatten() {
            if !(amount.is_finite() && amount > 0.0) {
                return Err(ValidationError::NonPositiveAmount(amount));
            }
        }
        let mut candidate = patch.apply_to(current);
        if kind == EntryType::Saving {
            let edit = if patch.total_amount.is_some() {
                Some(GoalEdit::Total)
            } else if patch.amount.is_some() {
                Some(GoalEdit::Amount)
            } else if patch.touches_dates() {
                Some(GoalEdit::Dates)
            } else {
                None
            };
            if let Some(edit) = edit {
                resync_goal(&mut candidate, edit);
            }
        }
        candidate.validate()?;
        Ok(candidate)
    }

    /// Removes the entry with `id` from whichever bucket holds it. Unknown
    /// ids are a no-op.
    pub fn delete(&mut self, id: EntryId) -> Option<StoreChange> {
        let (kind, index) = self.document.position(id)?;
        self.document.bucket_mut(kind).remove(index);
        Some(self.commit(ChangeKind::Deleted, Some(kind), Some(id)))
    }

    /// Swaps in a whole new document, e.g. after an import.
    pub fn replace_all(&mut self, document: BudgetDocument) -> StoreChange {
        self.document = document;
        self.commit(ChangeKind::Replaced, None, None)
    }

    fn commit(
        &mut self,
        kind: ChangeKind,
        entry_type: Option<EntryType>,
        id: Option<EntryId>,
    ) -> StoreChange {
        self.revision += 1;
        let persistence_warning = match self.persist() {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!("change kept in memory but not persisted: {}", err);
                Some(format!("your change may not survive a reload: {err}"))
            }
        };
        let change = StoreChange {
            kind,
            entry_type,
            id,
            revision: self.revision,
            persistence_warning,
        };
        for listener in &self.listeners {
            listener.on_change(&change);
        }
        change
    }

    fn persist(&self) -> Result<(), StorageError> {
        let value = serde_json::to_value(&self.document)?;
        self.backend.set(BUDGET_KEY, &value)
    }
}
