//! Common page traversal structures for paginated AWS listings.
//!
//! This module doesn't contain anything special beyond a pseudo-iterator
//! to walk over the pages of a listing call in a more idiomatic manner.
use async_trait::async_trait;

use std::collections::VecDeque;

use crate::types::UtilResult;

/// A single page of a listing, with the token to fetch the next one.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// Trait to represent a listing call that returns results in pages.
///
/// Implementors only need to know how to fetch a page for a token; the
/// `PageWalker` deals with buffering and termination.
#[async_trait]
pub trait Paginated: Send + Sync {
    /// The type of item contained in each page.
    type Item: Send;

    /// Fetches the page for the provided continuation token.
    ///
    /// A `None` token refers to the first page.
    async fn page(&self, token: Option<String>) -> UtilResult<Page<Self::Item>>;
}

/// Pseudo `Iterator` structure to walk over items in a `Paginated` listing.
///
/// As this is a fallible iteration, a `for` style loop cannot be used
/// easily. Instead, this pattern must be used:
///
/// ```rust,ignore
/// let mut walker = PageWalker::new(&listing);
///
/// while let Some(item) = walker.next().await? {
///     // do something...
/// }
/// ```
pub struct PageWalker<'a, P: Paginated> {
    source: &'a P,
    token: Option<String>,
    buffer: VecDeque<P::Item>,
    finished: bool,
}

impl<'a, P: Paginated> PageWalker<'a, P> {
    /// Construct a new `PageWalker` over a listing.
    pub fn new(source: &'a P) -> Self {
        Self {
            source,
            token: None,
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    /// Attempts to fetch the next item in the listing.
    ///
    /// Calling this method does not guarantee a call will be made to AWS;
    /// there may already be buffered data to be returned immediately.
    pub async fn next(&mut self) -> UtilResult<Option<P::Item>> {
        loop {
            // always check the buffer first
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }

            // if done, no fetch
            if self.finished {
                return Ok(None);
            }

            // fetch the page and store the next identifier
            let page = self.source.page(self.token.take()).await?;

            self.buffer.extend(page.items);
            self.token = page.next;

            // check for last page (empty tokens count as the end too)
            if self.token.as_deref().map_or(true, str::is_empty) {
                self.finished = true;
            }
        }
    }

    /// Walks every remaining page, returning all items in listing order.
    ///
    /// If any page fails, the items already fetched are dropped along with
    /// the walker and only the error is returned.
    pub async fn collect(mut self) -> UtilResult<Vec<P::Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }
}
