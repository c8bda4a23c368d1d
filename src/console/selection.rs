use std::collections::BTreeSet;

/// Identifiers currently ticked in the list view. Owned by the console and
/// lent to the bulk coordinator and delete flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: BTreeSet<i64>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips one row. Returns whether the row is now selected.
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn select(&mut self, id: i64) {
        self.selected.insert(id);
    }

    /// Returns whether the row was selected.
    pub fn deselect(&mut self, id: i64) -> bool {
        self.selected.remove(&id)
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    /// True when there is at least one loaded row and every one is selected.
    pub fn is_all_selected<I>(&self, loaded: I) -> bool
    where
        I: IntoIterator<Item = i64>,
    {
        let mut any = false;
        for id in loaded {
            any = true;
            if !self.selected.contains(&id) {
                return false;
            }
        }
        any
    }

    /// Header checkbox: deselect everything if all loaded rows are already
    /// selected, otherwise select exactly the loaded rows.
    pub fn toggle_all<I>(&mut self, loaded: I)
    where
        I: IntoIterator<Item = i64>,
    {
        let loaded: BTreeSet<i64> = loaded.into_iter().collect();
        if self.is_all_selected(loaded.iter().copied()) {
            self.selected.clear();
        } else {
            self.selected = loaded;
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Ascending order.
    pub fn ids(&self) -> Vec<i64> {
        self.selected.iter().copied().collect()
    }
}

impl FromIterator<i64> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}
