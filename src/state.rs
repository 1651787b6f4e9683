//! Query state snapshot and its transition function.

use std::fmt;
use std::sync::Arc;

/// Snapshot of a single query slot: the `(data, loading, error)` triple.
///
/// `data` holds the last successfully fetched payload and survives later
/// failures, so a consumer can keep stale content visible next to an error
/// indicator instead of blanking the view. `loading` spans exactly the
/// interval between a dispatch and its applied completion, and `error`
/// reflects the most recently applied completion.
///
/// The payload is shared via `Arc` because a snapshot is cloned out to the
/// consumer on every read.
pub struct QueryState<T> {
    data: Option<Arc<T>>,
    loading: bool,
    error: bool,
}

impl<T> QueryState<T> {
    /// The state of a freshly constructed runner.
    pub(crate) fn initial() -> Self {
        Self {
            data: None,
            loading: false,
            error: false,
        }
    }

    /// The last successfully fetched payload, if any.
    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    /// The payload with its shared ownership, for consumers that hold on to it.
    pub fn shared_data(&self) -> Option<Arc<T>> {
        self.data.clone()
    }

    /// True while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True if the most recently completed fetch failed.
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// The observational label over the triple.
    ///
    /// This is derived, not stored; the actual record is always the
    /// `(data, loading, error)` triple.
    pub fn phase(&self) -> QueryPhase {
        if self.loading {
            QueryPhase::Loading
        } else if self.error {
            QueryPhase::Failed
        } else if self.data.is_some() {
            QueryPhase::Succeeded
        } else {
            QueryPhase::Idle
        }
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for QueryState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryState")
            .field("data", &self.data)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish()
    }
}

/// Observational lifecycle label derived from a [`QueryState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryPhase {
    /// No fetch has been dispatched yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The most recent completion was a success.
    Succeeded,
    /// The most recent completion was a failure.
    Failed,
}

/// A lifecycle event as seen by the reducer.
pub(crate) enum QueryEvent<T> {
    /// A fetch was dispatched.
    Dispatched,
    /// The current fetch resolved with a payload and an empty error list.
    Resolved(Arc<T>),
    /// The current fetch failed, logically or in transport.
    Failed,
}

/// Pure transition function over the state triple.
///
/// Kept free of the runner so every transition is testable without a
/// transport:
///
/// - `Dispatched` sets `loading`, preserving `data` and `error`
/// - `Resolved` installs the payload and clears both flags
/// - `Failed` sets `error` and leaves `data` untouched
pub(crate) fn reduce<T>(state: &QueryState<T>, event: QueryEvent<T>) -> QueryState<T> {
    match event {
        QueryEvent::Dispatched => QueryState {
            data: state.data.clone(),
            loading: true,
            error: state.error,
        },
        QueryEvent::Resolved(data) => QueryState {
            data: Some(data),
            loading: false,
            error: false,
        },
        QueryEvent::Failed => QueryState {
            data: state.data.clone(),
            loading: false,
            error: true,
        },
    }
}
