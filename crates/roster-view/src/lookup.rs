//! Id lookups used to join foreign keys for display.

use std::collections::HashMap;

use roster_model::{CollectionItem, Employee, ItemId, PayGroup};

/// Items of one table indexed by id.
#[derive(Debug, Clone)]
pub struct Lookup<T> {
    by_id: HashMap<ItemId, T>,
}

impl<T: CollectionItem> Lookup<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let by_id = items
            .into_iter()
            .map(|item| (item.id().clone(), item))
            .collect();
        Self { by_id }
    }

    pub fn get(&self, id: &ItemId) -> Option<&T> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Lookup<PayGroup> {
    /// Display name of the employee's pay group.
    ///
    /// `None` when the employee has no pay group or the group no longer exists.
    pub fn pay_group_name(&self, employee: &Employee) -> Option<&str> {
        employee
            .pay_group_id
            .as_ref()
            .and_then(|id| self.get(id))
            .map(|group| group.name.as_str())
    }
}
