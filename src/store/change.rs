use crate::budget::entry::{EntryId, EntryType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Updated,
    Deleted,
    /// Every bucket was swapped at once (import).
    Replaced,
}

/// Descriptor of one committed store mutation, returned to the caller and
/// broadcast to subscribed listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreChange {
    pub kind: ChangeKind,
    pub entry_type: Option<EntryType>,
    pub id: Option<EntryId>,
    pub revision: u64,
    /// Set when the mutation stayed in memory but could not be written out.
    pub persistence_warning: Option<String>,
}

impl StoreChange {
    pub fn persisted(&self) -> bool {
        self.persistence_warning.is_none()
    }
}

/// Observer notified after every committed mutation.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, change: &StoreChange);
}

impl<F> ChangeListener for F
where
    F: Fn(&StoreChange) + Send + Sync,
{
    fn on_change(&self, change: &StoreChange) {
        self(change)
    }
}
