//! Debounce combinator
//!
//! The lookup-as-you-type searches (customer PAN/Aadhar, chassis number)
//! fire once per keystroke. This combinator delays each invocation by a
//! fixed window and drops any invocation that was superseded by a newer
//! one with the same key, so only the last-fired request's result is ever
//! applied. Keys are per session, so one user's typing never cancels
//! another's search.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use uuid::Uuid;

/// Default debounce window used by the search endpoints
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct Debouncer {
    delay: Duration,
    generations: Arc<RwLock<HashMap<Uuid, Arc<AtomicU64>>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generations: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn generation(&self, key: Uuid) -> Arc<AtomicU64> {
        let mut generations = self.generations.write().await;
        generations
            .entry(key)
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone()
    }

    /// Run `task` after the debounce window unless a newer invocation with
    /// the same `key` arrives in the meantime. Returns `None` when
    /// superseded, either before the task ran or while it was in flight
    /// (stale result dropped).
    pub async fn debounce<F, Fut, T>(&self, key: Uuid, task: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let generation = self.generation(key).await;
        let my_generation = generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.delay).await;
        if generation.load(Ordering::SeqCst) != my_generation {
            return None;
        }

        let result = task().await;
        if generation.load(Ordering::SeqCst) != my_generation {
            return None;
        }

        Some(result)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_single_invocation_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let result = debouncer.debounce(Uuid::new_v4(), || async { 42 }).await;
        assert_eq!(result, Some(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_invocation_supersedes_older() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let user = Uuid::new_v4();

        let first = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.debounce(user, || async { "first" }).await })
        };
        // Let the first invocation register its generation before the second
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.debounce(user, || async { "second" }).await })
        };

        assert_eq!(first.await.unwrap(), None);
        assert_eq!(second.await.unwrap(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_sessions_do_not_supersede_each_other() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();

        let a = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.debounce(user_a, || async { "a" }).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let b = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.debounce(user_b, || async { "b" }).await })
        };

        // Both sessions receive their own result
        assert_eq!(a.await.unwrap(), Some("a"));
        assert_eq!(b.await.unwrap(), Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_invocations_both_apply() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let user = Uuid::new_v4();
        assert_eq!(debouncer.debounce(user, || async { 1 }).await, Some(1));
        assert_eq!(debouncer.debounce(user, || async { 2 }).await, Some(2));
    }
}
