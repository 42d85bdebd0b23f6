//! Filtered and paginated view over a fetched collection.
//!
//! Everything here is a pure function of the collection and the filter
//! state. Rows keep the order they arrived in from the data source unless
//! a sort control is set; sorting is stable so ties keep fetch order.

use std::cmp::Ordering;

use roster_model::{CollectionItem, ItemId, SelectionSet, SortDirection, SortSpec, StatusFilter};

use crate::filter_state::FilterState;

/// Case-insensitive substring match against the item's searchable fields.
///
/// A blank term matches everything.
pub fn matches_search<T: CollectionItem>(item: &T, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.searchable_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches_status<T: CollectionItem>(item: &T, filter: StatusFilter<T::Status>) -> bool {
    filter.matches(item.status())
}

/// Items passing the search and status filters, sorted if a sort is set.
pub fn matched<'a, T: CollectionItem>(items: &'a [T], state: &FilterState<T::Status>) -> Vec<&'a T> {
    let term = state.search_term();
    let status = state.status();
    let mut rows: Vec<&T> = items
        .iter()
        .filter(|item| matches_search(*item, term) && matches_status(*item, status))
        .collect();
    if let Some(sort) = state.sort() {
        sort_rows(&mut rows, sort);
    }
    rows
}

/// Stable sort by the sort field. Items without a value for the field go last
/// regardless of direction.
pub fn sort_rows<T: CollectionItem>(rows: &mut [&T], sort: &SortSpec) {
    rows.sort_by(|a, b| {
        match (a.sort_value(&sort.field), b.sort_value(&sort.field)) {
            (Some(a), Some(b)) => match sort.direction {
                SortDirection::Ascending => a.cmp(&b),
                SortDirection::Descending => b.cmp(&a),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Number of pages needed for `total` rows; never less than one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// One rendered page of a list screen.
#[derive(Debug, Clone)]
pub struct ViewPage<'a, T> {
    /// Rows on the current page, in display order.
    pub rows: Vec<&'a T>,
    /// Number of rows matching the filters across all pages.
    pub total: usize,
    pub page_count: usize,
    /// Effective 1-based page after clamping.
    pub page: usize,
    pub page_size: usize,
}

/// Header checkbox state of the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    None,
    Partial,
    All,
}

impl<'a, T: CollectionItem> ViewPage<'a, T> {
    /// Compute the visible page for `items` under `state`.
    ///
    /// A page beyond the last one is clamped to the last page, so a
    /// non-empty result never renders an empty page.
    pub fn compute(items: &'a [T], state: &FilterState<T::Status>) -> Self {
        let matched = matched(items, state);
        Self::from_matched(matched, state.page(), state.page_size().get())
    }

    pub fn from_matched(matched: Vec<&'a T>, page: usize, page_size: usize) -> Self {
        let total = matched.len();
        let page_count = page_count(total, page_size);
        let page = page.clamp(1, page_count);
        let start = (page - 1) * page_size;
        let rows = matched.into_iter().skip(start).take(page_size).collect();
        Self {
            rows,
            total,
            page_count,
            page,
            page_size,
        }
    }

    pub fn start_index(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    /// 1-based index of the first visible row, 0 when nothing matched.
    pub fn first_row(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.start_index() + 1
        }
    }

    /// 1-based index of the last visible row, 0 when nothing matched.
    pub fn last_row(&self) -> usize {
        self.start_index() + self.rows.len()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn visible_ids(&self) -> impl Iterator<Item = &'a ItemId> + '_ {
        self.rows.iter().map(|&item| item.id())
    }

    /// Select or deselect exactly the rows on this page.
    ///
    /// Rows on other pages and rows hidden by the filters keep their state.
    pub fn set_page_selection(&self, selection: &mut SelectionSet, selected: bool) {
        selection.set_many(self.visible_ids(), selected);
    }

    pub fn page_selection(&self, selection: &SelectionSet) -> PageSelection {
        let selected = self
            .visible_ids()
            .filter(|id| selection.contains(id))
            .count();
        match selected {
            0 => PageSelection::None,
            n if n == self.rows.len() => PageSelection::All,
            _ => PageSelection::Partial,
        }
    }
}
