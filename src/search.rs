use futures::{stream::FuturesUnordered, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use crate::{
    client::{MovieClient, SearchFetch},
    types::{movie_route, SearchResultPage, SearchResultSummary, SearchSessionState},
};

/// The API never serves more than this many pages per query
pub const MAX_PAGES: u32 = 100;

/// One outstanding page request, tagged with the epoch it was issued under
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PageTicket {
    pub epoch: u64,
    pub query: String,
    pub page: u32,
}

#[derive(Debug)]
enum PageSlot {
    Pending,
    Loaded(Arc<SearchResultPage>),
    Failed,
}

/// Merges the pages of one query into a single result list
#[derive(Debug)]
pub struct SearchAggregator {
    query: String,
    epoch: u64,
    page_count: u32,
    pages: BTreeMap<u32, PageSlot>,
    total_results: Option<u64>,
    last_error: Option<String>,
}

impl Default for SearchAggregator {
    fn default() -> Self {
        SearchAggregator::new()
    }
}

impl SearchAggregator {
    pub fn new() -> SearchAggregator {
        SearchAggregator {
            query: String::new(),
            epoch: 0,
            page_count: 1,
            pages: BTreeMap::new(),
            total_results: None,
            last_error: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn total_results(&self) -> Option<u64> {
        self.total_results
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn submit(&mut self, query: &str) -> Vec<PageTicket> {
        self.epoch += 1;
        self.query = query.to_string();
        self.page_count = 1;
        self.pages.clear();
        self.total_results = None;
        self.last_error = None;

        self.resize(1)
    }

    /// Tickets for the pages up to `page_count` not yet loaded or requested
    pub fn resize(&mut self, page_count: u32) -> Vec<PageTicket> {
        if self.query.is_empty() {
            return Vec::new();
        }

        let page_count = page_count.clamp(1, MAX_PAGES);
        self.pages.retain(|page, _| *page <= page_count);
        self.page_count = page_count;

        let mut tickets = Vec::new();
        for page in 1..=page_count {
            if self.pages.contains_key(&page) {
                continue;
            }
            self.pages.insert(page, PageSlot::Pending);
            tickets.push(PageTicket {
                epoch: self.epoch,
                query: self.query.clone(),
                page,
            });
        }
        tickets
    }

    pub fn load_more(&mut self) -> Option<PageTicket> {
        if !self.can_load_more() {
            return None;
        }
        self.resize(self.page_count + 1).pop()
    }

    /// Stores the result for `ticket`. Returns false when the result was discarded.
    pub fn apply(&mut self, ticket: &PageTicket, result: SearchFetch) -> bool {
        if ticket.epoch != self.epoch {
            debug!(
                "Discarding page {} of {:?} from epoch {}, current epoch is {}",
                ticket.page, ticket.query, ticket.epoch, self.epoch
            );
            return false;
        }

        let slot = match self.pages.get_mut(&ticket.page) {
            Some(slot @ PageSlot::Pending) => slot,
            _ => {
                debug!(
                    "Discarding page {} of {:?}, no longer wanted",
                    ticket.page, ticket.query
                );
                return false;
            }
        };

        *slot = match result {
            Ok(page) if page.ok => {
                self.total_results = Some(page.total_count);
                PageSlot::Loaded(page)
            }
            Ok(page) => {
                let message = page
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "search failed".to_string());
                warn!("Page {} of {:?} failed: {message}", ticket.page, ticket.query);
                self.last_error = Some(message);
                PageSlot::Failed
            }
            Err(e) => {
                warn!("Page {} of {:?} failed: {e}", ticket.page, ticket.query);
                self.last_error = Some(e.to_string());
                PageSlot::Failed
            }
        };
        true
    }

    pub fn items(&self) -> impl Iterator<Item = &SearchResultSummary> {
        self.pages
            .values()
            .filter_map(|slot| match slot {
                PageSlot::Loaded(page) => Some(page.items.iter()),
                _ => None,
            })
            .flatten()
    }

    pub fn is_loading_initial(&self) -> bool {
        !self.query.is_empty()
            && self.last_error.is_none()
            && self
                .pages
                .values()
                .all(|slot| matches!(slot, PageSlot::Pending))
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_initial()
            || matches!(self.pages.get(&self.page_count), Some(PageSlot::Pending))
    }

    pub fn is_exhausted(&self) -> bool {
        match self.total_results {
            Some(total) => self.items().count() as u64 >= total,
            None => false,
        }
    }

    pub fn can_load_more(&self) -> bool {
        !self.query.is_empty()
            && self.page_count < MAX_PAGES
            && !self.is_loading_more()
            && !self.is_exhausted()
    }
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct SearchItemView {
    #[serde(flatten)]
    pub summary: SearchResultSummary,
    pub href: String,
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct SearchView {
    pub query: String,
    pub page_count: u32,
    pub items: Vec<SearchItemView>,
    pub total_results: Option<u64>,
    pub loading_initial: bool,
    pub loading_more: bool,
    pub can_load_more: bool,
    pub error: Option<String>,
}

struct Inner {
    query_text: String,
    aggregator: SearchAggregator,
}

type SharedInner = Arc<Mutex<Inner>>;

/// Controller behind the search page
#[derive(Clone)]
pub struct SearchScreen {
    client: Arc<MovieClient>,
    inner: SharedInner,
}

impl SearchScreen {
    pub fn new(client: Arc<MovieClient>) -> SearchScreen {
        let inner = Inner {
            query_text: String::new(),
            aggregator: SearchAggregator::new(),
        };

        SearchScreen {
            client,
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    pub fn set_query_text(&self, text: &str) {
        let mut inner = self.inner.lock().expect("Poisoned lock");
        inner.query_text = text.to_string();
    }

    /// Commits the typed text as the search query and loads its first page
    pub async fn submit(&self) {
        let tickets = {
            let mut inner = self.inner.lock().expect("Poisoned lock");
            let previous = inner.aggregator.query().to_string();
            let query = inner.query_text.clone();
            if previous != query {
                self.client.invalidate_search(&previous);
            }
            let tickets = inner.aggregator.submit(&query);
            debug!("Submitted {query:?} as epoch {}", inner.aggregator.epoch());
            tickets
        };

        self.run(tickets).await;
    }

    /// Shows pages 1 to `page_count`, fetching the missing ones concurrently
    pub async fn show_pages(&self, page_count: u32) {
        let tickets = self
            .inner
            .lock()
            .expect("Poisoned lock")
            .aggregator
            .resize(page_count);

        self.run(tickets).await;
    }

    /// Returns false without doing anything while the last page is still loading
    pub async fn load_more(&self) -> bool {
        let ticket = self
            .inner
            .lock()
            .expect("Poisoned lock")
            .aggregator
            .load_more();

        match ticket {
            Some(ticket) => {
                self.run(vec![ticket]).await;
                true
            }
            None => false,
        }
    }

    /// Route to navigate to when the result at `index` is picked
    pub fn select(&self, index: usize) -> Option<String> {
        let inner = self.inner.lock().expect("Poisoned lock");
        let item = inner.aggregator.items().nth(index)?;
        Some(movie_route(&item.imdb_id))
    }

    pub fn session_state(&self) -> SearchSessionState {
        let inner = self.inner.lock().expect("Poisoned lock");
        SearchSessionState {
            query_text: inner.query_text.clone(),
            submitted_query: inner.aggregator.query().to_string(),
            page_count: inner.aggregator.page_count(),
        }
    }

    pub fn view(&self) -> SearchView {
        let inner = self.inner.lock().expect("Poisoned lock");
        let aggregator = &inner.aggregator;

        let items = aggregator
            .items()
            .map(|summary| SearchItemView {
                summary: summary.clone(),
                href: movie_route(&summary.imdb_id),
            })
            .collect();

        SearchView {
            query: aggregator.query().to_string(),
            page_count: aggregator.page_count(),
            items,
            total_results: aggregator.total_results(),
            loading_initial: aggregator.is_loading_initial(),
            loading_more: aggregator.is_loading_more(),
            can_load_more: aggregator.can_load_more(),
            error: aggregator.last_error().map(str::to_string),
        }
    }

    async fn run(&self, tickets: Vec<PageTicket>) {
        let mut requests = tickets
            .into_iter()
            .map(|ticket| {
                let request = self.client.search(&ticket.query, ticket.page);
                async move { (ticket, request.await) }
            })
            .collect::<FuturesUnordered<_>>();

        while let Some((ticket, result)) = requests.next().await {
            let mut inner = self.inner.lock().expect("Poisoned lock");
            inner.aggregator.apply(&ticket, result);
        }
    }
}
