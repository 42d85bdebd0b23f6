//! Selection set for bulk actions.

use std::collections::BTreeSet;

use crate::ids::ItemId;

/// Ids of items marked for a bulk action.
///
/// The owner keeps it consistent with the unfiltered collection by calling
/// [`SelectionSet::retain_existing`] after every fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<ItemId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: &ItemId, selected: bool) {
        if selected {
            self.ids.insert(id.clone());
        } else {
            self.ids.remove(id);
        }
    }

    /// Select or deselect every id yielded by `ids`.
    pub fn set_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a ItemId>, selected: bool) {
        for id in ids {
            self.set(id, selected);
        }
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    /// Drop ids that are no longer present. Returns the number removed.
    pub fn retain_existing(&mut self, exists: impl Fn(&ItemId) -> bool) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| exists(id));
        before - self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.ids.iter()
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a ItemId;
    type IntoIter = std::collections::btree_set::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> ItemId {
        ItemId::new(value).unwrap()
    }

    #[test]
    fn retain_existing_prunes_stale_ids() {
        let mut selection = SelectionSet::new();
        selection.set_many([&id("a"), &id("b"), &id("c")], true);
        let removed = selection.retain_existing(|candidate| candidate.as_str() != "b");
        assert_eq!(removed, 1);
        assert!(!selection.contains(&id("b")));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn deselect_is_idempotent() {
        let mut selection = SelectionSet::new();
        selection.set(&id("a"), false);
        assert!(selection.is_empty());
        selection.set(&id("a"), true);
        selection.set(&id("a"), true);
        assert_eq!(selection.len(), 1);
    }
}
