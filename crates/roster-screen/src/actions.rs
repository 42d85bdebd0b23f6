//! Collaborators the dispatcher hands row intents to.

use roster_model::ItemId;

/// Destination of a view or edit intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    View(ItemId),
    Edit(ItemId),
}

/// Routing is external to the list screen.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

impl<F: FnMut(Route)> Navigator for F {
    fn navigate(&mut self, route: Route) {
        self(route);
    }
}

/// Question shown before a destructive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    /// Number of rows the action affects.
    pub count: usize,
}

impl ConfirmRequest {
    pub fn delete_one(table: &str, id: &ItemId) -> Self {
        Self {
            title: "Delete record".to_string(),
            message: format!("Delete {table} row {id}? This cannot be undone."),
            count: 1,
        }
    }

    pub fn delete_many(table: &str, count: usize) -> Self {
        Self {
            title: "Delete selected records".to_string(),
            message: format!("Delete {count} selected {table} rows? This cannot be undone."),
            count,
        }
    }
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool;
}

impl<F: FnMut(&ConfirmRequest) -> bool> Confirm for F {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        self(request)
    }
}
