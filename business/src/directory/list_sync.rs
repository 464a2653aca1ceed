//! Paginated user list kept in sync with the directory.
//!
//! [`UserListController`] owns the page window the UI renders. Every fetch is tagged
//! with a request sequence number; only the response to the most recently issued
//! request is applied, so a slow answer for an old page can never overwrite a newer
//! one. Failed fetches leave the previous window in place.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use log::{debug, error, info};

use crate::notify::Notifier;

use super::api::{ApiError, DirectoryClient};
use super::types::{UserPage, UserRecord};

pub const FETCH_FAILED: &str = "Failed to fetch users";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Last applied fetch failed; the previous window, if any, is still shown.
    Failed(String),
}

impl ListStatus {
    /// True while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Reason of the last failed fetch.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What happened to a fetch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response replaced the page window.
    Applied,
    /// A newer request was issued meanwhile; this response was dropped.
    Superseded,
    /// The requested window equals the current one; nothing was fetched.
    Unchanged,
}

/// One server page as last materialized by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub items: Vec<UserRecord>,
    pub fetched_at: DateTime<Utc>,
}

/// "Showing {first} to {last} of {total} users".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub first: u64,
    pub last: u64,
    pub total: u64,
}

impl std::fmt::Display for PageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} users",
            self.first, self.last, self.total
        )
    }
}

impl PageWindow {
    fn from_page(page: u32, page_size: u32, response: UserPage, fetched_at: DateTime<Utc>) -> Self {
        let total_pages = response
            .total_pages
            .unwrap_or_else(|| pages_for(response.total_count, page_size));
        Self {
            page,
            page_size,
            total_count: response.total_count,
            total_pages,
            items: response.items,
            fetched_at,
        }
    }

    /// Range of the current page; all zero for an empty page.
    pub fn summary(&self) -> PageSummary {
        if self.total_count == 0 || self.items.is_empty() {
            return PageSummary {
                first: 0,
                last: 0,
                total: self.total_count,
            };
        }
        let offset = u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size);
        let last = (offset + u64::from(self.page_size)).min(self.total_count);
        PageSummary {
            first: offset + 1,
            last: last.max(offset + 1),
            total: self.total_count,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

fn pages_for(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    u32::try_from(total.div_ceil(size)).unwrap_or(u32::MAX)
}

/// Users from `items` whose first name, last name or email contains `term`,
/// ignoring case. An empty term keeps everything.
pub fn filter_users<'a>(items: &'a [UserRecord], term: &str) -> Vec<&'a UserRecord> {
    let needle = term.to_lowercase();
    items
        .iter()
        .filter(|user| needle.is_empty() || user.matches_lowercase(&needle))
        .collect()
}

/// Read-only copy of the controller state for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub status: ListStatus,
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub window: Option<PageWindow>,
}

impl ListSnapshot {
    pub fn visible_users(&self) -> Vec<UserRecord> {
        self.window
            .as_ref()
            .map(|w| filter_users(&w.items, &self.search).into_iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug)]
struct ListState {
    status: ListStatus,
    page: u32,
    page_size: u32,
    search: String,
    window: Option<PageWindow>,
    /// Sequence number of the most recently issued fetch.
    latest_request: u64,
}

#[derive(Debug)]
pub struct UserListController {
    client: DirectoryClient,
    notifier: Notifier,
    state: Mutex<ListState>,
}

impl UserListController {
    pub fn new(client: DirectoryClient, notifier: Notifier, page_size: u32) -> Self {
        Self {
            client,
            notifier,
            state: Mutex::new(ListState {
                status: ListStatus::Idle,
                page: 1,
                page_size: page_size.max(1),
                search: String::new(),
                window: None,
                latest_request: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the current `(page, page_size)` again.
    ///
    /// Issuing a new request while one is in flight is allowed; whichever was issued
    /// last is the only one whose response is applied.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ApiError> {
        let (seq, page, page_size) = {
            let mut state = self.lock();
            state.latest_request += 1;
            state.status = ListStatus::Loading;
            (state.latest_request, state.page, state.page_size)
        };
        debug!("list: request #{seq} for page {page} (size {page_size})");

        let result = self.client.list_users(page, page_size).await;

        let mut state = self.lock();
        if seq != state.latest_request {
            debug!(
                "list: dropping response #{seq}, #{} is newer",
                state.latest_request
            );
            return Ok(RefreshOutcome::Superseded);
        }

        match result {
            Ok(response) => {
                info!(
                    "list: page {page} loaded with {} of {} users",
                    response.items.len(),
                    response.total_count
                );
                state.window = Some(PageWindow::from_page(page, page_size, response, Utc::now()));
                state.status = ListStatus::Loaded;
                Ok(RefreshOutcome::Applied)
            }
            Err(err) => {
                error!("list: {err}");
                state.status = ListStatus::Failed(err.message().to_owned());
                drop(state);
                self.notifier.error(FETCH_FAILED);
                Err(err)
            }
        }
    }

    pub async fn set_page(&self, page: u32) -> Result<RefreshOutcome, ApiError> {
        let page_size = self.lock().page_size;
        self.set_window(page, page_size).await
    }

    pub async fn set_page_size(&self, page_size: u32) -> Result<RefreshOutcome, ApiError> {
        let page = self.lock().page;
        self.set_window(page, page_size).await
    }

    /// Move to `(page, page_size)` and fetch it, unless that is already the target.
    pub async fn set_window(&self, page: u32, page_size: u32) -> Result<RefreshOutcome, ApiError> {
        let (page, page_size) = (page.max(1), page_size.max(1));
        {
            let mut state = self.lock();
            let loaded = !matches!(state.status, ListStatus::Idle);
            if loaded && state.page == page && state.page_size == page_size {
                return Ok(RefreshOutcome::Unchanged);
            }
            state.page = page;
            state.page_size = page_size;
        }
        self.refresh().await
    }

    pub async fn next_page(&self) -> Result<RefreshOutcome, ApiError> {
        let (page, total_pages) = {
            let state = self.lock();
            (state.page, state.window.as_ref().map(|w| w.total_pages))
        };
        match total_pages {
            Some(total) if page < total => self.set_page(page + 1).await,
            _ => Ok(RefreshOutcome::Unchanged),
        }
    }

    pub async fn previous_page(&self) -> Result<RefreshOutcome, ApiError> {
        let page = self.lock().page;
        if page <= 1 {
            return Ok(RefreshOutcome::Unchanged);
        }
        self.set_page(page - 1).await
    }

    /// Change the local search term. Never touches the network.
    pub fn set_search(&self, term: impl Into<String>) {
        self.lock().search = term.into();
    }

    /// The local search term, as typed.
    pub fn search(&self) -> String {
        self.lock().search.clone()
    }

    /// Status of the last applied fetch.
    pub fn status(&self) -> ListStatus {
        self.lock().status.clone()
    }

    /// Page of the most recent request, which may still be in flight.
    pub fn page(&self) -> u32 {
        self.lock().page
    }

    /// Page size of the most recent request.
    pub fn page_size(&self) -> u32 {
        self.lock().page_size
    }

    /// Last page the directory confirmed, `None` before the first successful fetch.
    pub fn window(&self) -> Option<PageWindow> {
        self.lock().window.clone()
    }

    /// Current page items that match the search term.
    pub fn visible_users(&self) -> Vec<UserRecord> {
        let state = self.lock();
        state
            .window
            .as_ref()
            .map(|w| {
                filter_users(&w.items, &state.search)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Look a user up in the loaded page, ignoring the search term.
    pub fn find_user(&self, id: u64) -> Option<UserRecord> {
        self.lock()
            .window
            .as_ref()
            .and_then(|w| w.items.iter().find(|u| u.id == id).cloned())
    }

    /// Everything a renderer needs, read under one lock.
    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.lock();
        ListSnapshot {
            status: state.status.clone(),
            page: state.page,
            page_size: state.page_size,
            search: state.search.clone(),
            window: state.window.clone(),
        }
    }
}
