//! Category filter for the competition list

use std::collections::BTreeSet;

use serde::Serialize;

use super::models::Category;

/// Selected categories. An empty selection means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryFilter {
    selected: BTreeSet<Category>,
}

impl CategoryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            selected: categories.into_iter().collect(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn selected(&self) -> impl Iterator<Item = Category> + '_ {
        self.selected.iter().copied()
    }

    pub fn allows(&self, category: Category) -> bool {
        self.selected.is_empty() || self.selected.contains(&category)
    }

    /// Toggle a chip. `None` is the "All" chip and clears the selection.
    ///
    /// Deselecting the last category falls back to "All".
    pub fn toggle(&mut self, category: Option<Category>) {
        match category {
            None => self.selected.clear(),
            Some(category) => {
                if !self.selected.remove(&category) {
                    self.selected.insert(category);
                }
            }
        }
    }
}
