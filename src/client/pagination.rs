//! Pagination helper for API listings
//!
//! Every list operation the reconciler consumes is drained to completion
//! before any diff is computed: partial results are never acted upon. The
//! page sequence is forward-only and restartable per call.

use std::future::Future;

use crate::error::Result;

/// Items requested per page. Matches the API maximum to minimize calls.
pub const PAGE_SIZE: usize = 100;

/// Fetch every page of a listing and materialize the full result set.
///
/// `fetch_page` is invoked with 1-based page numbers until it returns a
/// short (or empty) page. Any page-level error aborts the drain and
/// propagates to the caller.
pub async fn drain<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut all = Vec::new();
    let mut page = 1;

    loop {
        let batch = fetch_page(page).await?;
        let fetched = batch.len();
        all.extend(batch);

        if fetched < PAGE_SIZE {
            return Ok(all);
        }
        page += 1;
    }
}
