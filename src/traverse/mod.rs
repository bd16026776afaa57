use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, info_span};
use url::Url;

use crate::api::types::Page;
use crate::api::ApiClient;
use crate::errors::{ProbeError, Result};

// =========================== Page visitor ====================================

/// Per-page hook for the traversal. Implementations accumulate whatever they
/// need across pages behind interior mutability; the walker only borrows.
#[async_trait]
pub trait PageVisitor: Send + Sync {
    async fn visit_page(&self, page_number: u64, page: &Page<Value>) -> Result<()>;

    async fn on_page_error(&self, page_number: u64, error: String) -> Result<()> {
        error!(page = page_number, %error, "error visiting page");
        Ok(())
    }
}

/// Visitor that does nothing; traversal then only produces stats.
pub struct NullVisitor;

#[async_trait]
impl PageVisitor for NullVisitor {
    async fn visit_page(&self, _page_number: u64, _page: &Page<Value>) -> Result<()> {
        Ok(())
    }
}

// =========================== Walker ==========================================

/// Forward traversal of a `next`-link pagination chain.
///
/// The chain is required to be finite and acyclic: a `next` URL seen twice
/// aborts with a pagination error rather than looping, and `max_pages` bounds
/// runaway chains that never repeat a URL.
pub struct PageWalker<'a> {
    client: &'a ApiClient,
    max_pages: u64,
}

impl<'a> PageWalker<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            max_pages: 100,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u64) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Walk from `start` (which is visited and counted) to exhaustion of the
    /// `next` chain, invoking `visitor` on every page in order.
    pub async fn walk(&self, start: &Page<Value>, visitor: &dyn PageVisitor) -> Result<TraversalStats> {
        let span = info_span!("traverse.pages", claimed_count = start.count);
        let _g = span.enter();

        let mut stats = TraversalStats::new();
        let mut page_number = 1u64;

        visitor.visit_page(page_number, start).await?;
        stats.add_page(start.results.len());

        let mut next = start.next.clone();
        let mut visited: HashSet<String> = HashSet::new();

        while let Some(url) = next {
            if !visited.insert(url.clone()) {
                return Err(ProbeError::Pagination(format!(
                    "pagination cycle detected at {url}"
                )));
            }
            if page_number >= self.max_pages {
                return Err(ProbeError::Pagination(format!(
                    "next chain exceeded {} pages, giving up at {url}",
                    self.max_pages
                )));
            }
            page_number += 1;

            let page = self.client.page_at(&url).await?;
            debug!(page = page_number, items = page.results.len(), "fetched page");

            visitor.visit_page(page_number, &page).await?;
            stats.add_page(page.results.len());
            next = page.next.clone();
        }

        info!(
            pages = stats.pages,
            items = stats.items,
            "traversal complete"
        );
        Ok(stats)
    }
}

// =========================== Stats ===========================================

#[derive(Debug, Clone)]
pub struct TraversalStats {
    pub pages: u64,
    pub items: u64,
}

impl TraversalStats {
    pub fn new() -> Self {
        Self { pages: 0, items: 0 }
    }

    fn add_page(&mut self, items: usize) {
        self.pages += 1;
        self.items += items as u64;
    }
}

impl Default for TraversalStats {
    fn default() -> Self {
        Self::new()
    }
}

// =========================== Link helpers ====================================

/// Parse the `page` query parameter out of a pagination link.
pub fn page_number(link: &str) -> Option<u32> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
