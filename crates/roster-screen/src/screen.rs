//! A list screen over one record type.

use std::collections::HashSet;

use roster_model::{CollectionItem, ItemId, PageSize, Record, SelectionSet, SortSpec, StatusFilter};
use roster_source::{
    DataSource, OrderBy, Session, SourceError, delete_record, fetch_records, insert_record,
    update_record,
};
use roster_view::{FilterState, PageSelection, ViewPage, matched, page_count};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::actions::{Confirm, ConfirmRequest, Navigator, Route};
use crate::error::{Result, ScreenError};
use crate::fetcher::{Fetcher, RequestToken};
use crate::notify::{Notification, Notifications};
use crate::state::ScreenState;

/// Result of applying a fetch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The collection was replaced. `pruned` selected ids no longer exist.
    Applied { rows: usize, pruned: usize },
    /// A newer fetch was issued after this one; the response was dropped.
    Stale,
    /// The fetch failed and the screen is showing its retry affordance.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Cancelled,
    Failed,
}

/// Per-row results of a bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub deleted: Vec<ItemId>,
    /// Ids that could not be deleted, with the message shown to the user.
    pub failed: Vec<(ItemId, String)>,
}

impl BulkDeleteReport {
    pub fn requested(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }
}

/// Owns the fetched collection of one table together with its filter
/// state, selection and lifecycle.
///
/// The screen is driven by a single task; every async action takes
/// `&mut self` and completes before the next one starts.
pub struct ListScreen<T: Record> {
    items: Vec<T>,
    filters: FilterState<T::Status>,
    selection: SelectionSet,
    state: ScreenState,
    fetcher: Fetcher,
    order: Option<OrderBy>,
    notifications: Notifications,
}

impl<T: Record> Default for ListScreen<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> ListScreen<T> {
    /// A freshly mounted screen, waiting for its first fetch.
    pub fn new() -> Self {
        Self::with_filters(FilterState::new())
    }

    pub fn with_filters(filters: FilterState<T::Status>) -> Self {
        Self {
            items: Vec::new(),
            filters,
            selection: SelectionSet::new(),
            state: ScreenState::Loading,
            fetcher: Fetcher::new(),
            order: None,
            notifications: Notifications::default(),
        }
    }

    /// Ask the data source to return rows in this order.
    pub fn with_order(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// The unfiltered collection in fetch order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn filters(&self) -> &FilterState<T::Status> {
        &self.filters
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn view(&self) -> ViewPage<'_, T> {
        ViewPage::compute(&self.items, &self.filters)
    }

    pub fn page_selection(&self) -> PageSelection {
        self.view().page_selection(&self.selection)
    }

    pub fn get(&self, id: &ItemId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn require(&self, id: &ItemId) -> Result<()> {
        match self.get(id) {
            Some(_) => Ok(()),
            None => Err(ScreenError::UnknownItem(id.clone())),
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.state.is_busy() {
            return Err(ScreenError::Busy {
                state: self.state.name(),
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: ScreenState) -> Result<()> {
        if !self.state.can_transition_to(&next) {
            warn!(table = T::TABLE, from = %self.state, to = %next, "illegal screen transition");
            return Err(ScreenError::IllegalTransition {
                from: self.state.name(),
                to: next.name(),
            });
        }
        debug!(table = T::TABLE, from = %self.state, to = %next, "screen transition");
        self.state = next;
        Ok(())
    }

    /// Remove rows deleted by this screen from the cached collection.
    fn forget(&mut self, deleted: &[ItemId]) {
        let gone: HashSet<&ItemId> = deleted.iter().collect();
        self.items.retain(|item| !gone.contains(item.id()));
        let page_count = self.matched_page_count();
        self.filters.clamp_page(page_count);
    }

    fn matched_page_count(&self) -> usize {
        let total = matched(&self.items, &self.filters).len();
        page_count(total, self.filters.page_size().get())
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Enter `Loading` and issue a token for the fetch about to start.
    pub fn begin_fetch(&mut self) -> Result<RequestToken> {
        if self.state != ScreenState::Loading {
            self.transition(ScreenState::Loading)?;
        }
        let token = self.fetcher.issue();
        debug!(table = T::TABLE, token = %token, "fetch started");
        Ok(token)
    }

    /// Apply the response for `token`, unless a newer fetch superseded it.
    ///
    /// An auth failure is returned to the caller, who owns the redirect to
    /// login. Other failures leave the screen in `Failed`.
    pub fn finish_fetch(
        &mut self,
        token: RequestToken,
        result: std::result::Result<Vec<T>, SourceError>,
    ) -> Result<FetchOutcome> {
        if !self.fetcher.accept(token) {
            debug!(table = T::TABLE, token = %token, "discarding stale response");
            return Ok(FetchOutcome::Stale);
        }
        match result {
            Ok(items) => {
                self.items = items;
                let existing: HashSet<&ItemId> = self.items.iter().map(CollectionItem::id).collect();
                let pruned = self.selection.retain_existing(|id| existing.contains(id));
                let page_count = self.matched_page_count();
                self.filters.clamp_page(page_count);
                self.transition(ScreenState::Ready)?;
                debug!(table = T::TABLE, rows = self.items.len(), pruned, "collection replaced");
                Ok(FetchOutcome::Applied {
                    rows: self.items.len(),
                    pruned,
                })
            }
            Err(err) => {
                warn!(table = T::TABLE, error = %err, "fetch failed");
                self.transition(ScreenState::Failed {
                    message: err.user_message(),
                    retryable: err.is_retryable(),
                })?;
                self.notifications.push(Notification::error(err.user_message()));
                if err.is_auth() {
                    return Err(err.into());
                }
                Ok(FetchOutcome::Failed)
            }
        }
    }

    /// Fetch the whole table for the session's tenant and apply it.
    ///
    /// Used on first mount, for manual refresh and as the retry action of
    /// a failed screen.
    pub async fn refresh<S>(&mut self, session: &Session, source: &S) -> Result<FetchOutcome>
    where
        S: DataSource,
    {
        let token = self.begin_fetch()?;
        let result = match session.scope() {
            Ok(scope) => fetch_records::<T, S>(source, scope, self.order.as_ref()).await,
            Err(err) => Err(err),
        };
        self.finish_fetch(token, result)
    }

    // =========================================================================
    // Filters
    // =========================================================================

    fn apply_filter(&mut self, change: impl FnOnce(&mut FilterState<T::Status>)) {
        if self.state.is_ready() {
            debug!(table = T::TABLE, "filtering");
            self.state = ScreenState::Filtering;
            change(&mut self.filters);
            self.state = ScreenState::Ready;
        } else {
            change(&mut self.filters);
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.apply_filter(|filters| filters.set_search_term(term));
    }

    pub fn set_status_filter(&mut self, status: StatusFilter<T::Status>) {
        self.apply_filter(|filters| filters.set_status_filter(status));
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.apply_filter(|filters| filters.set_page_size(page_size));
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.apply_filter(|filters| filters.set_sort(sort));
    }

    /// Move to `page`, clamped to the pages the current filters produce.
    pub fn set_page(&mut self, page: usize) -> bool {
        let page_count = self.matched_page_count();
        self.filters.set_page(page, page_count)
    }

    // =========================================================================
    // Row actions
    // =========================================================================

    /// Select or deselect one row. Selecting an id that is not in the
    /// collection is ignored. Returns whether the selection changed.
    pub fn on_select(&mut self, id: &ItemId, selected: bool) -> Result<bool> {
        self.ensure_idle()?;
        if selected && self.get(id).is_none() {
            debug!(table = T::TABLE, id = %id, "ignoring selection of unknown row");
            return Ok(false);
        }
        let changed = self.selection.contains(id) != selected;
        self.selection.set(id, selected);
        Ok(changed)
    }

    /// Select or deselect the rows on the current page only.
    pub fn on_select_all(&mut self, selected: bool) -> Result<()> {
        self.ensure_idle()?;
        let page = ViewPage::compute(&self.items, &self.filters);
        page.set_page_selection(&mut self.selection, selected);
        Ok(())
    }

    pub fn on_view<N: Navigator + ?Sized>(&mut self, id: &ItemId, navigator: &mut N) -> Result<()> {
        self.ensure_idle()?;
        self.require(id)?;
        navigator.navigate(Route::View(id.clone()));
        Ok(())
    }

    pub fn on_edit<N: Navigator + ?Sized>(&mut self, id: &ItemId, navigator: &mut N) -> Result<()> {
        self.ensure_idle()?;
        self.require(id)?;
        navigator.navigate(Route::Edit(id.clone()));
        Ok(())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Delete one row after the user confirms, then re-fetch.
    pub async fn on_delete<S, C>(
        &mut self,
        id: &ItemId,
        confirm: &mut C,
        session: &Session,
        source: &S,
    ) -> Result<MutationOutcome>
    where
        S: DataSource,
        C: Confirm + ?Sized,
    {
        self.ensure_idle()?;
        self.require(id)?;
        if !confirm.confirm(&ConfirmRequest::delete_one(T::TABLE, id)) {
            debug!(table = T::TABLE, id = %id, "delete cancelled");
            return Ok(MutationOutcome::Cancelled);
        }
        let scope = session.scope()?;
        self.transition(ScreenState::Mutating)?;
        let result = delete_record::<T, S>(source, scope, id)
            .await
            .map(|()| format!("Deleted {id}"));
        self.complete_mutation(session, source, result).await
    }

    /// Delete every selected row with one confirmation and one re-fetch.
    ///
    /// Returns `None` when nothing was selected or the user cancelled.
    pub async fn on_delete_selected<S, C>(
        &mut self,
        confirm: &mut C,
        session: &Session,
        source: &S,
    ) -> Result<Option<BulkDeleteReport>>
    where
        S: DataSource,
        C: Confirm + ?Sized,
    {
        self.ensure_idle()?;
        let ids: Vec<ItemId> = self.selection.iter().cloned().collect();
        if ids.is_empty() {
            self.notifications.push(Notification::info("No rows selected"));
            return Ok(None);
        }
        if !confirm.confirm(&ConfirmRequest::delete_many(T::TABLE, ids.len())) {
            debug!(table = T::TABLE, count = ids.len(), "bulk delete cancelled");
            return Ok(None);
        }
        let scope = session.scope()?;
        self.transition(ScreenState::Mutating)?;

        let mut report = BulkDeleteReport::default();
        for id in ids {
            match delete_record::<T, S>(source, scope, &id).await {
                Ok(()) => {
                    self.selection.set(&id, false);
                    report.deleted.push(id);
                }
                Err(err) if err.is_auth() => {
                    warn!(table = T::TABLE, error = %err, "bulk delete interrupted");
                    // No re-fetch without a session; drop what is known to be gone.
                    self.forget(&report.deleted);
                    self.transition(ScreenState::Ready)?;
                    self.notifications.push(Notification::error(err.user_message()));
                    return Err(err.into());
                }
                Err(err) => {
                    warn!(table = T::TABLE, id = %id, error = %err, "delete failed");
                    report.failed.push((id, err.user_message()));
                }
            }
        }

        let summary = if report.failed.is_empty() {
            Notification::success(format!("Deleted {} rows", report.deleted.len()))
        } else {
            Notification::error(format!(
                "Deleted {} of {} rows; {} failed",
                report.deleted.len(),
                report.requested(),
                report.failed.len()
            ))
        };
        info!(
            table = T::TABLE,
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "bulk delete finished"
        );
        self.notifications.push(summary);
        self.refresh(session, source).await?;
        Ok(Some(report))
    }

    /// Validate and insert a new record, then re-fetch.
    pub async fn on_create<S>(&mut self, record: &T, session: &Session, source: &S) -> Result<MutationOutcome>
    where
        S: DataSource,
    {
        self.ensure_idle()?;
        if let Err(err) = record.validate() {
            self.notifications.push(Notification::error(err.to_string()));
            return Err(err.into());
        }
        let scope = session.scope()?;
        self.transition(ScreenState::Mutating)?;
        let result = insert_record(source, scope, record)
            .await
            .map(|stored| format!("Created {}", stored.id()));
        self.complete_mutation(session, source, result).await
    }

    /// Merge `patch` into an existing row, then re-fetch.
    pub async fn on_update<S>(
        &mut self,
        id: &ItemId,
        patch: Value,
        session: &Session,
        source: &S,
    ) -> Result<MutationOutcome>
    where
        S: DataSource,
    {
        self.ensure_idle()?;
        self.require(id)?;
        let scope = session.scope()?;
        self.transition(ScreenState::Mutating)?;
        let result = update_record::<T, S>(source, scope, id, patch)
            .await
            .map(|stored| format!("Updated {}", stored.id()));
        self.complete_mutation(session, source, result).await
    }

    async fn complete_mutation<S>(
        &mut self,
        session: &Session,
        source: &S,
        result: std::result::Result<String, SourceError>,
    ) -> Result<MutationOutcome>
    where
        S: DataSource,
    {
        match result {
            Ok(message) => {
                info!(table = T::TABLE, "{message}");
                self.notifications.push(Notification::success(message));
                self.refresh(session, source).await?;
                Ok(MutationOutcome::Applied)
            }
            Err(err) => {
                warn!(table = T::TABLE, error = %err, "mutation failed");
                self.transition(ScreenState::Ready)?;
                self.notifications.push(Notification::error(err.user_message()));
                if err.is_auth() {
                    return Err(err.into());
                }
                Ok(MutationOutcome::Failed)
            }
        }
    }
}
