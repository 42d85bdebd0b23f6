//! Filter state and pure view computation for roster list screens.
//!
//! The list screen owns a fetched collection and a [`FilterState`]; every
//! render calls [`ViewPage::compute`] to derive the visible rows, the total
//! match count and the page count. Nothing in this crate performs I/O.

pub mod audit;
pub mod filter_state;
pub mod lookup;
pub mod view;

pub use audit::{AuditStats, AuditWindow};
pub use filter_state::FilterState;
pub use lookup::Lookup;
pub use view::{PageSelection, ViewPage, matched, matches_search, matches_status, page_count};
