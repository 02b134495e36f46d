use std::future::Future;

use crate::error::RemoteError;
use crate::types::Page;

/// When a traversal stops asking for more pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Follow markers until a page comes back without one.
    Exhaustive,
    /// Like `Exhaustive`, but a page with no items also ends the traversal
    /// even if it carries a marker.
    StopOnEmptyPage,
}

/// Fetch every page from `fetch` and concatenate the items in page order.
///
/// `fetch` receives the marker from the previous page (`None` first). Any
/// page failure aborts the traversal; pages gathered so far are dropped.
pub async fn collect_pages<T, F, Fut>(
    policy: Pagination,
    mut fetch: F,
) -> Result<Vec<T>, RemoteError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, RemoteError>>,
{
    let mut items = Vec::new();
    let mut marker = None;
    loop {
        let page = fetch(marker.take()).await?;
        if page.items.is_empty() && policy == Pagination::StopOnEmptyPage {
            return Ok(items);
        }
        items.extend(page.items);
        match page.next_marker {
            Some(next) => marker = Some(next),
            None => return Ok(items),
        }
    }
}
