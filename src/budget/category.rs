use serde::{Deserialize, Serialize};

use super::entry::EntryType;

/// Display metadata for a category id referenced by entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl Category {
    pub fn new(id: u64, name: impl Into<String>, icon: impl Into<String>, kind: EntryType) -> Self {
        Self {
            id,
            name: name.into(),
            icon: icon.into(),
            color: type_color(kind).to_string(),
        }
    }
}

/// Theme colour associated with each entry type.
pub fn type_color(kind: EntryType) -> &'static str {
    match kind {
        EntryType::Income => "var(--green-bright)",
        EntryType::Expense => "var(--pink-soft)",
        EntryType::Saving => "var(--orange-medium)",
    }
}

/// Categories grouped by entry type; persisted under `budgetCategories`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryBook {
    #[serde(default)]
    pub income: Vec<Category>,
    #[serde(default)]
    pub expense: Vec<Category>,
    #[serde(default)]
    pub saving: Vec<Category>,
}

impl Default for CategoryBook {
    fn default() -> Self {
        use EntryType::*;
        Self {
            income: vec![
                Category::new(1, "Salary", "fa-briefcase", Income),
                Category::new(2, "Dividends", "fa-chart-line", Income),
            ],
            expense: vec![
                Category::new(3, "Rent", "fa-key", Expense),
                Category::new(4, "Food", "fa-utensils", Expense),
                Category::new(5, "Entertainment", "fa-star", Expense),
            ],
            saving: vec![
                Category::new(6, "Gifts", "fa-gift", Saving),
                Category::new(7, "Investment", "fa-piggy-bank", Saving),
            ],
        }
    }
}

impl CategoryBook {
    pub fn empty() -> Self {
        Self {
            income: Vec::new(),
            expense: Vec::new(),
            saving: Vec::new(),
        }
    }

    pub fn of(&self, kind: EntryType) -> &[Category] {
        match kind {
            EntryType::Income => &self.income,
            EntryType::Expense => &self.expense,
            EntryType::Saving => &self.saving,
        }
    }

    fn of_mut(&mut self, kind: EntryType) -> &mut Vec<Category> {
        match kind {
            EntryType::Income => &mut self.income,
            EntryType::Expense => &mut self.expense,
            EntryType::Saving => &mut self.saving,
        }
    }

    fn next_id(&self) -> u64 {
        EntryType::ALL
            .iter()
            .flat_map(|kind| self.of(*kind))
            .map(|category| category.id)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Adds a category and returns its freshly assigned id.
    pub fn add(
        &mut self,
        kind: EntryType,
        name: impl Into<String>,
        icon: impl Into<String>,
    ) -> u64 {
        let id = self.next_id();
        self.of_mut(kind).push(Category::new(id, name, icon, kind));
        id
    }

    /// Removes a category; entries keep pointing at the dangling id.
    pub fn remove(&mut self, kind: EntryType, id: u64) -> Option<Category> {
        let list = self.of_mut(kind);
        let position = list.iter().position(|category| category.id == id)?;
        Some(list.remove(position))
    }

    /// Looks up the category an entry's textual reference points at.
    pub fn details(&self, kind: EntryType, reference: &str) -> Option<&Category> {
        let reference = reference.trim();
        self.of(kind)
            .iter()
            .find(|category| category.id.to_string() == reference)
    }

    pub fn find_by_name(&self, kind: EntryType, name: &str) -> Option<&Category> {
        self.of(kind).iter().find(|category| category.name == name)
    }

    /// Category name, or `fallback` when the reference dangles.
    pub fn display_name<'a>(
        &'a self,
        kind: EntryType,
        reference: &str,
        fallback: &'a str,
    ) -> &'a str {
        self.details(kind, reference)
            .map(|category| category.name.as_str())
            .unwrap_or(fallback)
    }
}
