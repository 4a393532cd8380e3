use crate::error::{ClientError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use tracing::debug;

/// Pages drained from one endpoint before the safeguard trips.
pub const DEFAULT_PAGE_LIMIT: usize = 1000;

/// One batch out of a cursor-paginated endpoint. An absent (or empty)
/// cursor is the only termination signal the protocol gives us.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub cursor: Option<String>,
}

/// Drives a cursor-paginated endpoint to exhaustion.
///
/// The paginator is configured, not subclassed: callers hand it the call to
/// repeat and a selector that knows where that endpoint family nests its
/// payload. Items come back in page order, within-page order untouched.
#[derive(Debug, Clone)]
pub struct Paginator {
    page_limit: Option<usize>,
}

impl Paginator {
    pub fn new() -> Self {
        Self {
            page_limit: Some(DEFAULT_PAGE_LIMIT),
        }
    }

    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// Removes the page-count safeguard. An endpoint that never returns an
    /// empty cursor will then loop until cancelled.
    pub fn unbounded(mut self) -> Self {
        self.page_limit = None;
        self
    }

    /// Repeatedly invokes `call` with the current cursor (initially `None`)
    /// and extracts each batch with `select`, until the endpoint stops
    /// returning a cursor.
    ///
    /// Any failure propagates immediately and the partial accumulator is
    /// dropped; collection is all-or-nothing from the caller's view.
    pub async fn collect_all<T, C, Fut, S>(&self, mut call: C, select: S) -> Result<Vec<T>>
    where
        C: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Value>>,
        S: Fn(Value) -> Result<Page<T>>,
    {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            if let Some(limit) = self.page_limit
                && pages >= limit
            {
                return Err(ClientError::PageLimitExceeded(limit));
            }

            let response = call(cursor.take()).await?;
            let page = select(response)?;
            pages += 1;
            debug!(page = pages, batch = page.items.len(), "collected page");

            items.extend(page.items);

            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(items)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

/// Selector for the common response shape: the batch is an array under
/// `field`, the continuation token under `cursor`. A response that doesn't
/// carry `field` as an array is a configuration error, not a retry case.
pub fn select_field<T: DeserializeOwned>(
    field: &'static str,
) -> impl Fn(Value) -> Result<Page<T>> {
    move |mut value: Value| {
        let raw = match value.get_mut(field) {
            Some(array @ Value::Array(_)) => array.take(),
            _ => return Err(ClientError::UnsupportedShape(field)),
        };
        let items: Vec<T> =
            serde_json::from_value(raw).map_err(|_| ClientError::UnsupportedShape(field))?;
        let cursor = value
            .get("cursor")
            .and_then(Value::as_str)
            .map(str::to_owned);
        Ok(Page { items, cursor })
    }
}
