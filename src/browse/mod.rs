//! Paginated browsing of public events with an event-type filter and free-text search.
//!
//! State lives behind a `watch` channel so a UI (or the CLI) can follow loads as they happen.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::client::ApiClient;
use crate::api::events::PublicEventsParams;
use crate::types::{EventType, PublicEvent};

/// Backend page size for the public listing.
pub const PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseState {
    pub event_types: Vec<EventType>,
    pub event_types_loading: bool,
    pub event_types_error: Option<String>,

    pub selected_event_type_id: Option<i64>,
    pub search_query: String,

    pub events: Vec<PublicEvent>,
    pub events_total: u64,
    pub events_loading: bool,
    pub events_error: Option<String>,
    pub page: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            event_types: Vec::new(),
            event_types_loading: false,
            event_types_error: None,
            selected_event_type_id: None,
            search_query: String::new(),
            events: Vec::new(),
            events_total: 0,
            events_loading: false,
            events_error: None,
            page: 1,
            has_next: false,
            has_previous: false,
        }
    }
}

impl BrowseState {
    pub fn has_active_filters(&self) -> bool {
        !self.search_query.trim().is_empty() || self.selected_event_type_id.is_some()
    }

    fn params_for(&self, page: u32) -> PublicEventsParams {
        let search = self.search_query.trim();
        PublicEventsParams {
            page: Some(page),
            event_type: self.selected_event_type_id,
            search: (!search.is_empty()).then(|| search.to_string()),
        }
    }
}

pub struct PublicEventsBrowser {
    client: Arc<ApiClient>,
    state: watch::Sender<BrowseState>,
}

impl PublicEventsBrowser {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(BrowseState::default());
        Self { client, state }
    }

    /// Start with filters already applied, without loading anything.
    pub fn with_filters(client: Arc<ApiClient>, event_type: Option<i64>, search_query: impl Into<String>) -> Self {
        let (state, _) = watch::channel(BrowseState {
            selected_event_type_id: event_type,
            search_query: search_query.into(),
            ..BrowseState::default()
        });
        Self { client, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<BrowseState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> BrowseState {
        self.state.borrow().clone()
    }

    pub fn has_active_filters(&self) -> bool {
        self.state.borrow().has_active_filters()
    }

    /// First page of event types for the filter bar. Failure leaves an empty list.
    pub async fn load_event_types(&self) {
        self.state.send_modify(|s| {
            s.event_types_loading = true;
            s.event_types_error = None;
        });

        let result = self.client.event_types().list(Some(1)).await;

        self.state.send_modify(|s| {
            match result {
                Ok(page) => s.event_types = page.results,
                Err(e) => {
                    warn!("Failed to load event types: {}", e);
                    s.event_types_error = Some(e.to_string());
                    s.event_types.clear();
                }
            }
            s.event_types_loading = false;
        });
    }

    /// Fetch `page` with the current filters. `append` extends the list instead of replacing it
    /// and keeps what is already shown when the request fails.
    pub async fn load_events(&self, page: u32, append: bool) {
        let params = self.state.borrow().params_for(page);
        self.state.send_modify(|s| {
            s.events_loading = true;
            s.events_error = None;
        });

        debug!("Loading public events page {} (append: {})", page, append);
        let result = self.client.events().public_events(&params).await;

        self.state.send_modify(|s| {
            match result {
                Ok(data) => {
                    s.events_total = data.count;
                    s.has_next = data.has_next();
                    s.has_previous = data.has_previous();
                    s.page = page;
                    if append {
                        s.events.extend(data.results);
                    } else {
                        s.events = data.results;
                    }
                }
                Err(e) => {
                    warn!("Failed to load public events: {}", e);
                    s.events_error = Some(e.to_string());
                    if !append {
                        s.events.clear();
                    }
                }
            }
            s.events_loading = false;
        });
    }

    /// Append the following page, if the last response said there is one.
    ///
    /// Returns `true` only when a page was fetched and appended.
    pub async fn load_next_page(&self) -> bool {
        let (has_next, page) = {
            let s = self.state.borrow();
            (s.has_next, s.page)
        };
        if !has_next {
            return false;
        }
        self.load_events(page + 1, true).await;
        self.state.borrow().events_error.is_none()
    }

    pub async fn filter_by_event_type(&self, type_id: Option<i64>) {
        let changed = self.state.send_if_modified(|s| {
            if s.selected_event_type_id == type_id {
                return false;
            }
            s.selected_event_type_id = type_id;
            true
        });
        if changed {
            self.load_events(1, false).await;
        }
    }

    pub async fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        let changed = self.state.send_if_modified(|s| {
            if s.search_query == query {
                return false;
            }
            s.search_query = query;
            true
        });
        if changed {
            self.load_events(1, false).await;
        }
    }

    pub async fn clear_filters(&self) {
        let changed = self.state.send_if_modified(|s| {
            if s.selected_event_type_id.is_none() && s.search_query.is_empty() {
                return false;
            }
            s.selected_event_type_id = None;
            s.search_query.clear();
            true
        });
        if changed {
            self.load_events(1, false).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = BrowseState::default();
        assert_eq!(state.page, 1);
        assert!(state.events.is_empty());
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_active_filters_ignore_blank_search() {
        let mut state = BrowseState {
            search_query: "   ".into(),
            ..Default::default()
        };
        assert!(!state.has_active_filters());

        state.selected_event_type_id = Some(3);
        assert!(state.has_active_filters());
    }

    #[test]
    fn test_params_trim_search_and_skip_unset_type() {
        let state = BrowseState {
            search_query: "  harusi ".into(),
            ..Default::default()
        };
        let params = state.params_for(2);
        assert_eq!(params.page, Some(2));
        assert_eq!(params.event_type, None);
        assert_eq!(params.search.as_deref(), Some("harusi"));

        let state = BrowseState {
            search_query: " ".into(),
            selected_event_type_id: Some(5),
            ..Default::default()
        };
        let params = state.params_for(1);
        assert_eq!(params.event_type, Some(5));
        assert_eq!(params.search, None);
    }
}
