//! Debounced brand lookup
//!
//! Every input change cancels the pending lookup and schedules a new one
//! after a quiet period. Each request is tagged with a sequence number and
//! its outcome is only published while that number is still the latest, so
//! a slow response for an old query can never replace a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::client::BrandResolver;
use super::types::{BrandCandidate, ResolverError};

/// Single-slot gate remembering the most recently issued request
#[derive(Debug, Default)]
pub struct LatestRequest {
    latest: AtomicU64,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request number, superseding every earlier one
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Debounce settings
#[derive(Debug, Clone)]
pub struct DebounceConfig {
    pub delay: Duration,
    /// Trimmed queries shorter than this never reach the resolver
    pub min_query_len: usize,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(400),
            min_query_len: 2,
        }
    }
}

/// Result of one lookup, published only while it is current
#[derive(Debug)]
pub struct LookupOutcome {
    pub seq: u64,
    pub query: String,
    pub result: Result<Vec<BrandCandidate>, ResolverError>,
}

/// Debounced lookups for one input field
pub struct DebouncedLookup {
    resolver: Arc<dyn BrandResolver>,
    config: DebounceConfig,
    latest: Arc<LatestRequest>,
    pending: Mutex<Option<JoinHandle<()>>>,
    tx: mpsc::UnboundedSender<LookupOutcome>,
}

impl DebouncedLookup {
    /// Create a lookup and the receiver its outcomes are published on
    pub fn new(
        resolver: Arc<dyn BrandResolver>,
        config: DebounceConfig,
    ) -> (Self, mpsc::UnboundedReceiver<LookupOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let lookup = Self {
            resolver,
            config,
            latest: Arc::new(LatestRequest::new()),
            pending: Mutex::new(None),
            tx,
        };
        (lookup, rx)
    }

    /// Handle an input change; returns the request's sequence number.
    ///
    /// Must be called from within a tokio runtime. Short queries publish an
    /// empty result immediately instead of calling the resolver.
    pub fn on_input(&self, text: &str) -> u64 {
        let seq = self.latest.issue();
        self.abort_pending();

        let query = text.trim().to_string();
        if query.chars().count() < self.config.min_query_len {
            let _ = self.tx.send(LookupOutcome {
                seq,
                query,
                result: Ok(Vec::new()),
            });
            return seq;
        }

        let resolver = Arc::clone(&self.resolver);
        let latest = Arc::clone(&self.latest);
        let tx = self.tx.clone();
        let delay = self.config.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !latest.is_current(seq) {
                return;
            }

            let result = resolver.search(&query).await;
            if !latest.is_current(seq) {
                tracing::debug!(seq, query = %query, "Discarding stale brand lookup");
                return;
            }
            if let Err(e) = &result {
                tracing::warn!(seq, query = %query, error = %e, "Brand lookup failed");
            }
            let _ = tx.send(LookupOutcome { seq, query, result });
        });

        *self.pending.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
        seq
    }

    /// Cancel any pending lookup; in-flight results will be discarded
    pub fn cancel(&self) {
        self.latest.issue();
        self.abort_pending();
    }

    /// Sequence number of the latest request
    pub fn current(&self) -> u64 {
        self.latest.current()
    }

    fn abort_pending(&self) {
        if let Some(handle) = self.pending.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }
}

impl Drop for DebouncedLookup {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::MockBrandResolver;

    fn candidate(domain: &str) -> BrandCandidate {
        BrandCandidate {
            name: Some(domain.to_string()),
            domain: domain.to_string(),
            icon: None,
            claimed: false,
            brand_id: format!("id-{}", domain),
        }
    }

    fn fast_config() -> DebounceConfig {
        DebounceConfig {
            delay: Duration::from_millis(40),
            min_query_len: 2,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<LookupOutcome>) -> Vec<LookupOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }

    #[test]
    fn test_latest_request_supersedes() {
        let latest = LatestRequest::new();
        let first = latest.issue();
        assert!(latest.is_current(first));
        let second = latest.issue();
        assert!(!latest.is_current(first));
        assert!(latest.is_current(second));
        assert_eq!(latest.current(), second);
    }

    #[test]
    fn test_default_config() {
        let config = DebounceConfig::default();
        assert_eq!(config.delay, Duration::from_millis(400));
        assert_eq!(config.min_query_len, 2);
    }

    #[tokio::test]
    async fn test_rapid_input_issues_single_call() {
        let mock = Arc::new(MockBrandResolver::new().with_response("sup", vec![candidate("supabase.com")]));
        let (lookup, mut rx) = DebouncedLookup::new(mock.clone(), fast_config());

        lookup.on_input("s");
        tokio::time::sleep(Duration::from_millis(5)).await;
        lookup.on_input("su");
        tokio::time::sleep(Duration::from_millis(5)).await;
        let last = lookup.on_input("sup");

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(mock.calls(), vec!["sup"]);
        let outcomes = drain(&mut rx);
        let resolved: Vec<&LookupOutcome> = outcomes.iter().filter(|o| o.query == "sup").collect();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].seq, last);
        assert_eq!(resolved[0].result.as_ref().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_short_query_never_reaches_resolver() {
        let mock = Arc::new(MockBrandResolver::new());
        let (lookup, mut rx) = DebouncedLookup::new(mock.clone(), fast_config());

        lookup.on_input(" a ");
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(mock.call_count(), 0);
        let outcomes = drain(&mut rx);
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].result.as_ref().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let mock = Arc::new(
            MockBrandResolver::new()
                .with_response("sup", vec![candidate("old.com")])
                .with_response("supa", vec![candidate("supabase.com")])
                .with_delay(Duration::from_millis(80)),
        );
        let (lookup, mut rx) = DebouncedLookup::new(mock.clone(), fast_config());

        lookup.on_input("sup");
        // Let the first lookup reach the resolver, then supersede it
        tokio::time::sleep(Duration::from_millis(60)).await;
        lookup.on_input("supa");
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(mock.calls(), vec!["sup", "supa"]);
        let outcomes = drain(&mut rx);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].query, "supa");
        assert_eq!(outcomes[0].result.as_ref().unwrap()[0].domain, "supabase.com");
    }

    #[tokio::test]
    async fn test_failure_is_published() {
        let mock = Arc::new(MockBrandResolver::new().with_failure("broken", 500, "boom"));
        let (lookup, mut rx) = DebouncedLookup::new(mock, fast_config());

        lookup.on_input("broken");
        tokio::time::sleep(Duration::from_millis(150)).await;

        let outcomes = drain(&mut rx);
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0].result, Err(ResolverError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_lookup() {
        let mock = Arc::new(MockBrandResolver::new());
        let (lookup, mut rx) = DebouncedLookup::new(mock.clone(), fast_config());

        lookup.on_input("react");
        lookup.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(mock.call_count(), 0);
        assert!(drain(&mut rx).is_empty());
    }
}
