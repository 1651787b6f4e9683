//! Tracer trait for observing fetch lifecycles.
//!
//! The runner reports every dispatch, applied completion, and discarded stale
//! result to a [`FetchTracer`]. The default [`NoopTracer`] provides zero-cost
//! when observation is not needed.
//!
//! The consumer surface only ever sees the collapsed error flag; the tracer
//! is where the two failure kinds (logical vs. transport) remain
//! distinguishable.
//!
//! # Example
//!
//! ```ignore
//! use query_runner::{FetchSeq, FetchTracer, QueryRequest, QueryRunner};
//!
//! struct LogTracer;
//!
//! impl FetchTracer for LogTracer {
//!     fn on_dispatch(&self, seq: FetchSeq, request: &QueryRequest) {
//!         eprintln!("fetch #{} -> {}", seq.0, request.document());
//!     }
//! }
//!
//! let runner = QueryRunner::builder(request, transport)
//!     .tracer(LogTracer)
//!     .build();
//! ```

use serde::{Deserialize, Serialize};

use crate::error::FetchFailure;
use crate::query::QueryRequest;

/// Identifier of one dispatched fetch.
///
/// Sequence numbers increase monotonically per runner, starting at 1. The
/// latest dispatched number is the only one whose completion is allowed to
/// reach state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FetchSeq(pub u64);

/// Observer for fetch lifecycle events.
///
/// All methods have default empty implementations, so you only need to
/// override the events you're interested in.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; completions can arrive on any
/// runtime thread.
pub trait FetchTracer: Send + Sync + 'static {
    /// Called when a fetch is dispatched.
    #[inline]
    fn on_dispatch(&self, _seq: FetchSeq, _request: &QueryRequest) {}

    /// Called when the current fetch resolves and its payload is applied.
    #[inline]
    fn on_resolve(&self, _seq: FetchSeq) {}

    /// Called when the current fetch fails and the failure is applied.
    #[inline]
    fn on_failure(&self, _seq: FetchSeq, _failure: &FetchFailure) {}

    /// Called when a superseded fetch completes and its result is discarded.
    #[inline]
    fn on_stale_discard(&self, _seq: FetchSeq, _latest: FetchSeq) {}

    /// Called once when the runner is disposed.
    #[inline]
    fn on_dispose(&self) {}
}

/// Tracer that discards all events.
///
/// This is the default for [`QueryRunner`](crate::QueryRunner).
pub struct NoopTracer;

impl FetchTracer for NoopTracer {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingTracer {
        dispatches: AtomicUsize,
        resolves: AtomicUsize,
    }

    impl CountingTracer {
        fn new() -> Self {
            Self {
                dispatches: AtomicUsize::new(0),
                resolves: AtomicUsize::new(0),
            }
        }
    }

    impl FetchTracer for CountingTracer {
        fn on_dispatch(&self, _seq: FetchSeq, _request: &QueryRequest) {
            self.dispatches.fetch_add(1, Ordering::Relaxed);
        }

        fn on_resolve(&self, _seq: FetchSeq) {
            self.resolves.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_counting_tracer() {
        let tracer = CountingTracer::new();
        let request = QueryRequest::new("{ ping }");

        tracer.on_dispatch(FetchSeq(1), &request);
        tracer.on_dispatch(FetchSeq(2), &request);
        tracer.on_resolve(FetchSeq(2));

        assert_eq!(tracer.dispatches.load(Ordering::Relaxed), 2);
        assert_eq!(tracer.resolves.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_seq_ordering() {
        assert!(FetchSeq(1) < FetchSeq(2));
        assert_eq!(FetchSeq(3), FetchSeq(3));
    }

    #[test]
    fn test_tracer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoopTracer>();
        assert_send_sync::<Arc<CountingTracer>>();
    }
}
