//! Session-lifetime cache of per-item seasonal datasets.
//!
//! Each identifier is fetched at most once while a request is in flight:
//! concurrent callers join the same shared future. Successful results are
//! kept for the rest of the session; failures are dropped so the next call
//! retries.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;

use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::api::{DishId, SeasonalDataset};
use crate::error::ApiError;

/// Where cache misses are loaded from.
pub trait DetailSource {
    fn fetch_detail(&self, id: &DishId) -> LocalBoxFuture<'static, Result<SeasonalDataset, ApiError>>;
}

pub type DetailResult = Result<Arc<SeasonalDataset>, ApiError>;

type SharedFetch = Shared<LocalBoxFuture<'static, DetailResult>>;

enum Entry {
    /// `generation` distinguishes this fetch from a later retry of the same id.
    Pending { generation: u64, fetch: SharedFetch },
    Ready(Arc<SeasonalDataset>),
}

struct Inner<S> {
    source: S,
    entries: HashMap<DishId, Entry>,
    next_generation: u64,
}

/// Memoizing, request de-duplicating store keyed by [`DishId`].
///
/// Cloning yields another handle to the same store.
pub struct DetailCache<S> {
    inner: Rc<RefCell<Inner<S>>>,
}

impl<S> Clone for DetailCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

enum Lookup {
    Hit(Arc<SeasonalDataset>),
    Wait { generation: u64, fetch: SharedFetch },
}

impl<S: DetailSource + 'static> DetailCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                source,
                entries: HashMap::new(),
                next_generation: 0,
            })),
        }
    }

    /// Return the dataset for `id`, fetching it if it is not cached yet.
    ///
    /// The lookup happens synchronously when this is called, so two calls
    /// made back to back share one request even before either is polled.
    pub fn get_or_fetch(&self, id: DishId) -> impl Future<Output = DetailResult> + 'static {
        let lookup = self.lookup(&id);
        let inner = Rc::clone(&self.inner);

        async move {
            let (generation, fetch) = match lookup {
                Lookup::Hit(dataset) => return Ok(dataset),
                Lookup::Wait { generation, fetch } => (generation, fetch),
            };

            let outcome = fetch.await;

            let mut state = inner.borrow_mut();
            let current = matches!(
                state.entries.get(&id),
                Some(Entry::Pending { generation: g, .. }) if *g == generation
            );
            if current {
                match &outcome {
                    Ok(dataset) => {
                        info!("Cached seasonal detail for dish {}", id);
                        state.entries.insert(id, Entry::Ready(Arc::clone(dataset)));
                    }
                    Err(e) => {
                        warn!("Detail fetch for dish {} failed: {}", id, e);
                        state.entries.remove(&id);
                    }
                }
            }
            outcome
        }
    }

    fn lookup(&self, id: &DishId) -> Lookup {
        let mut guard = self.inner.borrow_mut();
        let state = &mut *guard;

        match state.entries.get(id) {
            Some(Entry::Ready(dataset)) => {
                debug!("Detail cache hit for dish {}", id);
                Lookup::Hit(Arc::clone(dataset))
            }
            Some(Entry::Pending { generation, fetch }) => {
                debug!("Joining in-flight detail fetch for dish {}", id);
                Lookup::Wait {
                    generation: *generation,
                    fetch: fetch.clone(),
                }
            }
            None => {
                let generation = state.next_generation;
                state.next_generation += 1;
                debug!("Detail cache miss for dish {}", id);

                let fetch = state
                    .source
                    .fetch_detail(id)
                    .map(|result| result.map(Arc::new))
                    .boxed_local()
                    .shared();
                state.entries.insert(
                    id.clone(),
                    Entry::Pending {
                        generation,
                        fetch: fetch.clone(),
                    },
                );
                Lookup::Wait { generation, fetch }
            }
        }
    }
}

impl<S> DetailCache<S> {
    /// The resolved dataset for `id`, if any. Never touches the network.
    pub fn peek(&self, id: &DishId) -> Option<Arc<SeasonalDataset>> {
        match self.inner.borrow().entries.get(id) {
            Some(Entry::Ready(dataset)) => Some(Arc::clone(dataset)),
            _ => None,
        }
    }

    pub fn is_pending(&self, id: &DishId) -> bool {
        matches!(self.inner.borrow().entries.get(id), Some(Entry::Pending { .. }))
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.inner
            .borrow()
            .entries
            .values()
            .filter(|e| matches!(e, Entry::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
