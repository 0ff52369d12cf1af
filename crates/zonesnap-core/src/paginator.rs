//! Cursor-following enumeration of paged provider listings
//!
//! Every provider listing returns a page, a truncation flag, and a cursor
//! for the next page. [`paginate`] follows the chain with a plain loop and
//! concatenates the pages in request order.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::hash::Hash;

use tracing::debug;

use crate::error::{Error, Result};

/// One page of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T, C> {
    pub items: Vec<T>,
    pub is_truncated: bool,
    /// Cursor of the next page, present when `is_truncated`
    pub next: Option<C>,
}

impl<T, C> Page<T, C> {
    /// A final page
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            is_truncated: false,
            next: None,
        }
    }

    /// A page followed by another one at `next`
    pub fn truncated(items: Vec<T>, next: C) -> Self {
        Self {
            items,
            is_truncated: true,
            next: Some(next),
        }
    }
}

/// Fetch every page of a listing and return all items in page order
///
/// `fetch` is called with `None` for the first page and with the previous
/// page's cursor afterwards. Nothing is retained between calls, so a failed
/// enumeration is simply restarted from scratch.
///
/// # Errors
///
/// - Any error returned by `fetch`
/// - `Error::Pagination` if a truncated page has no cursor, or a cursor
///   repeats one already requested
pub async fn paginate<T, C, F, Fut>(what: &str, mut fetch: F) -> Result<Vec<T>>
where
    C: Clone + Eq + Hash + fmt::Debug,
    F: FnMut(Option<C>) -> Fut,
    Fut: Future<Output = Result<Page<T, C>>>,
{
    let mut items = Vec::new();
    let mut requested: HashSet<C> = HashSet::new();
    let mut cursor: Option<C> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(cursor.take()).await?;
        pages += 1;

        debug!(
            "Fetched {} page {}: {} item(s), truncated: {}",
            what,
            pages,
            page.items.len(),
            page.is_truncated
        );

        items.extend(page.items);

        if !page.is_truncated {
            break;
        }

        let next = page.next.ok_or_else(|| {
            Error::pagination(format!(
                "{} page {} is truncated but has no next cursor",
                what, pages
            ))
        })?;

        if !requested.insert(next.clone()) {
            return Err(Error::pagination(format!(
                "{} cursor {:?} was returned twice (after page {})",
                what, next, pages
            )));
        }

        cursor = Some(next);
    }

    Ok(items)
}
