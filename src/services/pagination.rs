//! Bounded aggregation over paged table query results.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::{PriceError, Result};
use crate::models::price::{PriceRecord, PriceRow};
use crate::services::price_mapper::flatten;

/// Per-request cancellation signal carried through every table call.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

/// Sending half of a [`Cancellation`]. Dropping it does not cancel.
///
/// Handlers hold one per request but nothing fires it yet; it is the hook
/// for wiring client disconnects or deadlines into in-flight scans.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl Cancellation {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// A signal that never fires, for callers with no request to tie to.
    pub fn never() -> Self {
        cancellation().1
    }
}

pub fn cancellation() -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, Cancellation { rx })
}

/// A lazy cursor over pages of rows, in the order the store delivers them.
#[async_trait]
pub trait PageSource: Send {
    /// Next page, or `None` once the results are exhausted.
    async fn next_page(&mut self, cancel: &Cancellation) -> Result<Option<Vec<PriceRow>>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedPrices {
    pub records: Vec<PriceRecord>,
    pub pages_read: usize,
    /// Stopped because `max_pages` was reached; more rows may exist.
    pub reached_page_limit: bool,
}

/// Pull pages until exhausted or `max_pages` have been read, flattening each
/// row into price records in page order.
pub async fn collect_price_pages(
    pages: &mut (dyn PageSource + '_),
    max_pages: usize,
    cancel: &Cancellation,
) -> Result<CollectedPrices> {
    let mut collected = CollectedPrices::default();

    loop {
        if cancel.is_cancelled() {
            return Err(PriceError::Cancelled);
        }

        let Some(page) = pages.next_page(cancel).await? else {
            break;
        };

        collected.pages_read += 1;
        for row in &page {
            collected.records.extend(flatten(row));
        }

        if collected.pages_read >= max_pages {
            tracing::info!("Maximum pages reached {}.", collected.pages_read);
            collected.reached_page_limit = true;
            break;
        }
    }

    tracing::info!(
        "Retrieved {} price records from {} pages.",
        collected.records.len(),
        collected.pages_read
    );

    Ok(collected)
}
