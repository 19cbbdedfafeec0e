//! Paginated result sessions
//!
//! A session walks one result set page by page. Pages are numbered from 1 in
//! fetch order and cached, so asking for an already fetched page never hits
//! the network. The end of a result set is signalled only by a response that
//! carries no continuation cursor.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Result, TubeError};
use crate::parser::{continuation_token, visitor_data, ContinuationPolicy};
use crate::types::Page;

/// Produces one raw response document per call
///
/// `None` means the fetch failed. The session turns that into an empty
/// placeholder page and leaves its own state alone, so the same page can be
/// requested again.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, continuation: Option<&str>, visitor_data: Option<&str>)
    -> Option<Value>;
}

/// Turns one response document into the items of one page
pub trait PageParser<T>: Send + Sync {
    fn parse(&self, document: &Value) -> Vec<T>;
}

impl<T, F> PageParser<T> for F
where
    F: Fn(&Value) -> Vec<T> + Send + Sync,
{
    fn parse(&self, document: &Value) -> Vec<T> {
        self(document)
    }
}

/// How a session gets and reads its pages
pub struct PageStrategy<T> {
    pub fetcher: Arc<dyn PageFetcher>,
    pub parser: Arc<dyn PageParser<T>>,
    pub continuation: ContinuationPolicy,
}

impl<T> PageStrategy<T> {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        parser: impl PageParser<T> + 'static,
        continuation: ContinuationPolicy,
    ) -> Self {
        Self {
            fetcher,
            parser: Arc::new(parser),
            continuation,
        }
    }
}

/// One paginated result set
///
/// Fetch methods take `&mut self`: a session serves one caller at a time.
/// Dropping a pending `fetch_next` or `fetch_page` future cancels it; state
/// is only updated after a response arrives, so pages stored before the
/// cancellation stay available.
pub struct PaginatedResults<T> {
    strategy: PageStrategy<T>,
    pages: BTreeMap<usize, Arc<Page<T>>>,
    current: usize,
    continuation: Option<String>,
    visitor_data: Option<String>,
    all_fetched: bool,
}

impl<T> PaginatedResults<T> {
    /// Creates a session with nothing fetched yet
    pub fn new(strategy: PageStrategy<T>) -> Self {
        Self {
            strategy,
            pages: BTreeMap::new(),
            current: 0,
            continuation: None,
            visitor_data: None,
            all_fetched: false,
        }
    }

    /// Creates a session and fetches its first page
    pub async fn start(strategy: PageStrategy<T>) -> Self {
        let mut session = Self::new(strategy);
        session.fetch_next().await;
        session
    }

    /// Number of the last stored page; 0 before the first successful fetch
    pub fn current_page(&self) -> usize {
        self.current
    }

    /// True once a response came back without a continuation cursor
    pub fn is_all_fetched(&self) -> bool {
        self.all_fetched
    }

    /// A cached page, without fetching
    pub fn page(&self, number: usize) -> Option<Arc<Page<T>>> {
        self.pages.get(&number).cloned()
    }

    /// All cached pages in page order
    pub fn pages(&self) -> impl Iterator<Item = &Arc<Page<T>>> {
        self.pages.values()
    }

    /// All cached items in page order
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.values().flat_map(|page| page.items())
    }

    pub fn continuation(&self) -> Option<&str> {
        self.continuation.as_deref()
    }

    pub fn visitor_data(&self) -> Option<&str> {
        self.visitor_data.as_deref()
    }

    fn latest(&self) -> Arc<Page<T>> {
        self.page(self.current)
            .unwrap_or_else(|| Arc::new(Page::empty(self.current)))
    }

    /// Fetches the page after the current one
    ///
    /// Once everything is fetched this returns the current page again. A
    /// failed fetch returns an empty page numbered `current + 1` that is not
    /// stored.
    pub async fn fetch_next(&mut self) -> Arc<Page<T>> {
        if self.all_fetched {
            return self.latest();
        }

        let next = self.current + 1;
        let Some(document) = self
            .strategy
            .fetcher
            .fetch(self.continuation.as_deref(), self.visitor_data.as_deref())
            .await
        else {
            tracing::debug!(page = next, "fetch returned no document");
            return Arc::new(Page::empty(next));
        };

        self.continuation = continuation_token(&document, &self.strategy.continuation);
        if self.continuation.is_none() {
            self.all_fetched = true;
        }
        if let Some(visitor) = visitor_data(&document) {
            self.visitor_data = Some(visitor);
        }

        self.current = next;
        let page = Arc::new(Page::new(next, self.strategy.parser.parse(&document)));
        tracing::debug!(
            page = next,
            items = page.len(),
            has_continuation = self.continuation.is_some(),
            "fetched page"
        );
        self.pages.insert(next, Arc::clone(&page));
        page
    }

    /// Returns page `number`, fetching forward as needed
    ///
    /// Cached pages come back without a fetch. When the result set ends
    /// before `number`, or a second fetch during this call fails to advance,
    /// the most recent page is returned instead.
    ///
    /// # Errors
    /// - `InvalidPage` if `number` is 0
    pub async fn fetch_page(&mut self, number: usize) -> Result<Arc<Page<T>>> {
        if number < 1 {
            return Err(TubeError::InvalidPage(number));
        }
        if let Some(page) = self.page(number) {
            return Ok(page);
        }
        if self.all_fetched {
            return Ok(self.latest());
        }

        // At most one fetch per missing page plus one more failed attempt
        let mut stalls = 0;
        let mut last = self.latest();
        while self.current < number && !self.all_fetched {
            let before = self.current;
            last = self.fetch_next().await;
            if self.current == before {
                stalls += 1;
                if stalls >= 2 {
                    tracing::debug!(page = number, current = self.current, "pagination stalled");
                    break;
                }
            }
        }

        Ok(self.page(number).or_else(|| self.page(self.current)).unwrap_or(last))
    }
}
