//! Row selection

use std::collections::HashSet;

use roster_lib::model::RowId;

/// State of the header checkbox relative to the rendered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheck {
    None,
    /// Indeterminate.
    Some,
    All,
}

/// An edit to a [`Selection`], raised by the grid and applied by whoever
/// owns the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Add(RowId),
    Remove(RowId),
    /// Replace the set with exactly these ids.
    SelectAll(Vec<RowId>),
    Clear,
}

/// The set of selected row ids.
///
/// # Example
///
/// ```
/// use roster_grid::Selection;
/// use roster_lib::model::RowId;
///
/// let mut selection = Selection::new();
/// selection.toggle(&RowId::from(3));
/// assert!(selection.contains(&RowId::from(3)));
/// selection.toggle(&RowId::from(3));
/// assert!(selection.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<RowId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.ids.contains(id)
    }

    /// Flips one row. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &RowId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Replaces the selection with exactly `ids`.
    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a RowId>) {
        self.ids = ids.into_iter().cloned().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn apply(&mut self, change: &SelectionChange) {
        match change {
            SelectionChange::Add(id) => {
                self.ids.insert(id.clone());
            }
            SelectionChange::Remove(id) => {
                self.ids.remove(id);
            }
            SelectionChange::SelectAll(ids) => self.select_all(ids),
            SelectionChange::Clear => self.clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<RowId> {
        let mut ids: Vec<RowId> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Header checkbox state for the given rendered rows. Ids selected off
    /// screen make it indeterminate, unless nothing is rendered at all.
    pub fn header_check<'a>(&self, rendered: impl IntoIterator<Item = &'a RowId>) -> HeaderCheck {
        let mut total = 0;
        let mut selected = 0;
        for id in rendered {
            total += 1;
            if self.ids.contains(id) {
                selected += 1;
            }
        }
        if total == 0 {
            HeaderCheck::None
        } else if selected == total {
            HeaderCheck::All
        } else if selected > 0 || !self.ids.is_empty() {
            HeaderCheck::Some
        } else {
            HeaderCheck::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_check_states() {
        let rendered: Vec<RowId> = vec![1.into(), 4.into(), 7.into()];
        let mut selection = Selection::new();
        assert_eq!(selection.header_check(&rendered), HeaderCheck::None);
        selection.toggle(&RowId::from(4));
        assert_eq!(selection.header_check(&rendered), HeaderCheck::Some);
        selection.select_all(&rendered);
        assert_eq!(selection.header_check(&rendered), HeaderCheck::All);
        assert_eq!(selection.header_check(&Vec::new()), HeaderCheck::None);

        let filtered: Vec<RowId> = vec![1.into()];
        assert_eq!(selection.header_check(&filtered), HeaderCheck::All);
        selection.apply(&SelectionChange::Remove(1.into()));
        assert_eq!(selection.header_check(&filtered), HeaderCheck::Some);
    }

    #[test]
    fn test_apply_changes() {
        let mut selection = Selection::new();
        selection.apply(&SelectionChange::Add(2.into()));
        selection.apply(&SelectionChange::Add(2.into()));
        selection.apply(&SelectionChange::Add(5.into()));
        assert_eq!(selection.ids(), vec![RowId::from(2), RowId::from(5)]);

        selection.apply(&SelectionChange::SelectAll(vec![7.into()]));
        assert_eq!(selection.ids(), vec![RowId::from(7)]);

        selection.apply(&SelectionChange::Clear);
        assert!(selection.is_empty());
    }
}
