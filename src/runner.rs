//! The query runner: dispatch, completion reconciliation, disposal.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::FetchFailure;
use crate::query::QueryRequest;
use crate::state::{reduce, QueryEvent, QueryState};
use crate::tracer::{FetchSeq, FetchTracer, NoopTracer};
use crate::transport::{QueryResponse, Transport, TransportError};

/// Mutable record guarded by the runner's mutex.
///
/// The latest sequence number lives next to the state triple so the staleness
/// check and the state write form one critical section; a completion can
/// never interleave with a newer dispatch between the two.
struct Slot<T> {
    state: QueryState<T>,
    latest: u64,
    started: bool,
    disposed: bool,
}

struct Inner<T> {
    request: QueryRequest,
    transport: Arc<dyn Transport<T>>,
    tracer: Arc<dyn FetchTracer>,
    slot: Mutex<Slot<T>>,
}

impl<T> Inner<T> {
    /// Reconcile one completed round trip back into state.
    ///
    /// The completion is applied only if its sequence number still equals the
    /// latest dispatched one and the runner has not been disposed; otherwise
    /// it is discarded without touching state.
    fn complete(&self, seq: FetchSeq, result: Result<QueryResponse<T>, TransportError>) {
        let outcome = match result {
            Ok(response) if response.is_ok() => Ok(Arc::new(response.data)),
            Ok(response) => Err(FetchFailure::Query {
                errors: response.errors,
            }),
            Err(err) => Err(FetchFailure::Transport(err)),
        };

        let mut slot = self.slot.lock();
        if slot.disposed {
            return;
        }
        if slot.latest != seq.0 {
            let latest = FetchSeq(slot.latest);
            drop(slot);
            self.tracer.on_stale_discard(seq, latest);
            return;
        }
        let event = match &outcome {
            Ok(data) => QueryEvent::Resolved(Arc::clone(data)),
            Err(_) => QueryEvent::Failed,
        };
        slot.state = reduce(&slot.state, event);
        drop(slot);

        match outcome {
            Ok(_) => self.tracer.on_resolve(seq),
            Err(failure) => self.tracer.on_failure(seq, &failure),
        }
    }
}

/// Drives the lifecycle of a single query execution slot.
///
/// A runner owns one immutable [`QueryRequest`] and fetches it through an
/// injected [`Transport`]. The consumer reads the `(data, loading, error)`
/// triple via [`state`](QueryRunner::state) and re-dispatches via
/// [`run`](QueryRunner::run) / [`refetch`](QueryRunner::refetch).
///
/// Construction performs no fetch; the host decides when to trigger the
/// first one, normally by calling [`start`](QueryRunner::start) when the
/// owning view mounts and [`dispose`](QueryRunner::dispose) when it unmounts.
///
/// Cheap to clone - clones share the same slot.
///
/// # Example
///
/// ```ignore
/// use query_runner::{QueryRequest, QueryRunner};
///
/// let runner = QueryRunner::new(QueryRequest::new("{ listings { id title } }"), transport);
/// runner.start();
///
/// // later, after a mutation elsewhere:
/// runner.refetch();
///
/// let state = runner.state();
/// if state.has_error() {
///     // previous data (if any) is still readable next to the error flag
/// }
/// ```
pub struct QueryRunner<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for QueryRunner<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + Sync + 'static> QueryRunner<T> {
    /// Create a runner with the default settings.
    pub fn new(request: QueryRequest, transport: Arc<dyn Transport<T>>) -> Self {
        Self::builder(request, transport).build()
    }

    /// Create a builder for customizing the runner.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let runner = QueryRunner::builder(request, transport)
    ///     .tracer(MyTracer::new())
    ///     .build();
    /// ```
    pub fn builder(request: QueryRequest, transport: Arc<dyn Transport<T>>) -> QueryRunnerBuilder<T> {
        QueryRunnerBuilder::new(request, transport)
    }

    /// Read-only snapshot of the current `(data, loading, error)` triple.
    pub fn state(&self) -> QueryState<T> {
        self.inner.slot.lock().state.clone()
    }

    /// The request this runner fetches.
    pub fn request(&self) -> &QueryRequest {
        &self.inner.request
    }

    /// Dispatch a fetch.
    ///
    /// Synchronously flips the state to loading (existing data and error are
    /// preserved), then schedules exactly one task on the ambient tokio
    /// runtime to perform the round trip. Callable at any time, including
    /// while an earlier dispatch is still in flight: only the latest
    /// dispatch's completion is applied, and completions of superseded
    /// dispatches are discarded regardless of arrival order.
    ///
    /// Failures are never retried automatically.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime (the contract of
    /// `tokio::spawn`).
    pub fn run(&self) {
        self.dispatch(false);
    }

    /// Re-dispatch the query.
    ///
    /// Identical to [`run`](Self::run); the separate name records caller
    /// intent (explicit re-invocation rather than initial fetch).
    pub fn refetch(&self) {
        self.dispatch(false);
    }

    /// Dispatch the initial fetch.
    ///
    /// The first call behaves like [`run`](Self::run); every later call is a
    /// no-op. Hosts call this at mount time.
    pub fn start(&self) {
        self.dispatch(true);
    }

    /// Permanently shut the runner down.
    ///
    /// In-flight completions and any later dispatch become no-ops; the state
    /// can never change again. Hosts call this at unmount time.
    pub fn dispose(&self) {
        let newly_disposed = {
            let mut slot = self.inner.slot.lock();
            !std::mem::replace(&mut slot.disposed, true)
        };
        if newly_disposed {
            self.inner.tracer.on_dispose();
        }
    }

    /// True once [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.inner.slot.lock().disposed
    }

    fn dispatch(&self, initial_only: bool) {
        let seq = {
            let mut slot = self.inner.slot.lock();
            if slot.disposed || (initial_only && slot.started) {
                return;
            }
            slot.latest += 1;
            slot.started = true;
            slot.state = reduce(&slot.state, QueryEvent::Dispatched);
            FetchSeq(slot.latest)
        };
        self.inner.tracer.on_dispatch(seq, &self.inner.request);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = inner.transport.fetch(&inner.request).await;
            inner.complete(seq, result);
        });
    }
}

/// Builder for [`QueryRunner`].
pub struct QueryRunnerBuilder<T> {
    request: QueryRequest,
    transport: Arc<dyn Transport<T>>,
    tracer: Arc<dyn FetchTracer>,
}

impl<T: Send + Sync + 'static> QueryRunnerBuilder<T> {
    fn new(request: QueryRequest, transport: Arc<dyn Transport<T>>) -> Self {
        Self {
            request,
            transport,
            tracer: Arc::new(NoopTracer),
        }
    }

    /// Observe fetch lifecycle events with `tracer`.
    pub fn tracer(mut self, tracer: impl FetchTracer) -> Self {
        self.tracer = Arc::new(tracer);
        self
    }

    /// Observe fetch lifecycle events with an already-shared tracer.
    pub fn shared_tracer(mut self, tracer: Arc<dyn FetchTracer>) -> Self {
        self.tracer = tracer;
        self
    }

    /// Build the runner. No fetch is dispatched.
    pub fn build(self) -> QueryRunner<T> {
        QueryRunner {
            inner: Arc::new(Inner {
                request: self.request,
                transport: self.transport,
                tracer: self.tracer,
                slot: Mutex::new(Slot {
                    state: QueryState::initial(),
                    latest: 0,
                    started: false,
                    disposed: false,
                }),
            }),
        }
    }
}
