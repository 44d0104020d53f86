//! Per-category window registry.
//!
//! Each category's store sits behind its own mutex, so requests for different
//! categories never contend. Locks are only held for the in-memory merge or
//! snapshot, never across an upstream fetch.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::category::Category;
use crate::error::{FetchError, WindowError, WindowResult};
use crate::fetch::Fetcher;
use crate::window::{Average, WindowStore, WindowValue};
use crate::Number;

/// Answer for one window-update request. All four fields are always present,
/// including when the upstream fetch degraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowResponse<T = Number> {
    #[serde(rename = "windowPrevState")]
    pub prev_state: Vec<T>,
    #[serde(rename = "windowCurrState")]
    pub curr_state: Vec<T>,
    /// Raw upstream batch; empty when the fetch timed out or was rejected.
    pub numbers: Vec<T>,
    #[serde(rename = "avg")]
    pub average: Average,
}

/// Read-only view of a category's window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowView<T = Number> {
    pub category: Category,
    pub capacity: usize,
    pub window: Vec<T>,
    #[serde(rename = "avg")]
    pub average: Average,
    pub last_updated: Option<DateTime<Utc>>,
}

pub struct WindowRegistry<T = Number> {
    stores: HashMap<Category, Mutex<WindowStore<T>>>,
    capacity: usize,
}

impl<T: WindowValue> WindowRegistry<T> {
    /// Create one empty store per category.
    pub fn new(capacity: usize) -> WindowResult<Self> {
        let mut stores = HashMap::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            stores.insert(category, Mutex::new(WindowStore::new(capacity)?));
        }
        Ok(Self { stores, capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self, category: Category) -> WindowResult<MutexGuard<'_, WindowStore<T>>> {
        self.stores
            .get(&category)
            .ok_or_else(|| WindowError::Internal(format!("no window for category {}", category)))?
            .lock()
            .map_err(|_| WindowError::Internal(format!("window lock poisoned for {}", category)))
    }

    /// Apply a fetch result to the category's window.
    ///
    /// - `Ok(batch)`: merge and echo the raw batch back as `numbers`.
    /// - recoverable error: leave the window alone, `numbers` is empty.
    /// - any other error: returned as [`WindowError::Fetch`], window untouched.
    pub fn handle_category(
        &self,
        category: Category,
        fetched: Result<Vec<T>, FetchError>,
    ) -> WindowResult<WindowResponse<T>> {
        match fetched {
            Ok(batch) => {
                let result = self.lock(category)?.merge(&batch);
                debug!(
                    category = %category,
                    fetched = batch.len(),
                    evicted = result.evicted.len(),
                    window = result.curr_state.len(),
                    "merged upstream batch"
                );
                Ok(WindowResponse {
                    prev_state: result.prev_state,
                    curr_state: result.curr_state,
                    numbers: batch,
                    average: result.average,
                })
            }
            Err(e) if e.is_recoverable() => {
                warn!(category = %category, error = %e, "serving unchanged window");
                let store = self.lock(category)?;
                let snapshot = store.snapshot();
                Ok(WindowResponse {
                    prev_state: snapshot.clone(),
                    curr_state: snapshot,
                    numbers: Vec::new(),
                    average: store.average(),
                })
            }
            Err(e) => {
                error!(category = %category, error = %e, "upstream fetch failed");
                Err(WindowError::Fetch(e))
            }
        }
    }

    /// Fetch a batch for `category` and apply it.
    ///
    /// The fetch runs before any window lock is taken.
    pub async fn refresh<F>(&self, category: Category, fetcher: &F) -> WindowResult<WindowResponse<T>>
    where
        F: Fetcher<T> + ?Sized,
    {
        let fetched = fetcher.fetch(category).await;
        self.handle_category(category, fetched)
    }

    pub fn inspect(&self, category: Category) -> WindowResult<WindowView<T>> {
        let store = self.lock(category)?;
        Ok(WindowView {
            category,
            capacity: store.capacity(),
            window: store.snapshot(),
            average: store.average(),
            last_updated: store.last_updated(),
        })
    }
}
