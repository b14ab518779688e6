use futures::{
    future::{BoxFuture, Shared},
    FutureExt,
};
use tracing::debug;

use std::{
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

pub type FetchResult<T, E> = Result<T, Arc<E>>;

#[derive(Debug)]
struct Resolved<T, E> {
    at: Instant,
    result: FetchResult<T, E>,
}

impl<T: Clone, E> Clone for Resolved<T, E> {
    fn clone(&self) -> Self {
        Resolved {
            at: self.at,
            result: self.result.clone(),
        }
    }
}

type SharedRequest<T, E> = Shared<BoxFuture<'static, Resolved<T, E>>>;

/// In memory memoization of requests, keyed by request signature
pub struct RequestCache<K, T, E> {
    ttl: Duration,
    entries: Mutex<HashMap<K, SharedRequest<T, E>>>,
}

impl<K, T, E> RequestCache<K, T, E>
where
    K: Eq + Hash + Clone + Debug,
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> RequestCache<K, T, E> {
        RequestCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_fetch<F>(&self, key: K, fetch: F) -> BoxFuture<'static, FetchResult<T, E>>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T, E>>,
    {
        let mut entries = self.entries.lock().expect("Poisoned lock");

        if let Some(request) = entries.get(&key) {
            if self.reusable(request) {
                debug!("Cache hit for {key:?}");
                return unwrap_resolved(request.clone());
            }
        }

        debug!("Cache miss for {key:?}");
        entries.retain(|_, request| self.reusable(request));
        let request = fetch()
            .map(|result| Resolved {
                at: Instant::now(),
                result: result.map_err(Arc::new),
            })
            .boxed()
            .shared();
        entries.insert(key, request.clone());

        unwrap_resolved(request)
    }

    /// Waiters on a dropped request still receive its result
    pub fn invalidate<P>(&self, pred: P)
    where
        P: Fn(&K) -> bool,
    {
        let mut entries = self.entries.lock().expect("Poisoned lock");
        entries.retain(|key, _| !pred(key));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("Poisoned lock").len()
    }

    // In flight requests are always reusable, resolved ones only while fresh and successful
    fn reusable(&self, request: &SharedRequest<T, E>) -> bool {
        match request.peek() {
            None => true,
            Some(resolved) => resolved.result.is_ok() && resolved.at.elapsed() < self.ttl,
        }
    }
}

fn unwrap_resolved<T, E>(request: SharedRequest<T, E>) -> BoxFuture<'static, FetchResult<T, E>>
where
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    request.map(|resolved| resolved.result).boxed()
}
