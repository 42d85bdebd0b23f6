//! List screens over roster collections.
//!
//! A [`ListScreen`] owns the collection fetched for one table, the filter
//! state and selection applied to it, and a small lifecycle:
//!
//! ```text
//! Loading -> Ready -> (Filtering <-> Ready) -> Mutating -> Loading -> Ready
//!        \-> Failed -> Loading (retry)
//! ```
//!
//! Row intents go through the dispatcher methods (`on_select`, `on_view`,
//! `on_delete`, ...). Navigation and confirmation are delegated to the
//! [`Navigator`] and [`Confirm`] collaborators; data access goes through a
//! [`roster_source::DataSource`] scoped by an explicit session.

pub mod actions;
pub mod error;
pub mod fetcher;
pub mod notify;
pub mod screen;
pub mod state;

pub use actions::{Confirm, ConfirmRequest, Navigator, Route};
pub use error::{Result, ScreenError};
pub use fetcher::{Fetcher, RequestToken};
pub use notify::{Level, Notification, Notifications};
pub use screen::{BulkDeleteReport, FetchOutcome, ListScreen, MutationOutcome};
pub use state::ScreenState;
