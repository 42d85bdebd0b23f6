//! The collection item contract shared by every list screen.
//!
//! A list screen only needs three things from a record: a stable id, a
//! status to filter on, and the text fields a search term is matched
//! against. Everything else about the record is display data.

use std::borrow::Cow;
use std::fmt::Debug;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::ids::ItemId;

/// A record that can be listed, filtered, paginated and selected.
pub trait CollectionItem {
    /// Enumerated status used by the status filter.
    type Status: Copy + Eq + Debug;

    fn id(&self) -> &ItemId;

    fn status(&self) -> Self::Status;

    /// Fields a search term is matched against, in display order.
    fn searchable_fields(&self) -> Vec<Cow<'_, str>>;

    /// Value used by an explicit sort control, `None` if the field is not sortable.
    fn sort_value(&self, field: &str) -> Option<SortValue> {
        let _ = field;
        None
    }
}

/// A collection item stored in a named remote table.
pub trait Record: CollectionItem + Clone + Serialize + DeserializeOwned {
    /// Table name in the remote data source.
    const TABLE: &'static str;

    /// Check the fields a create form requires before submission.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Comparable value extracted from an item for sorting.
///
/// Text is compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Number(i64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_lowercase())
    }
}
