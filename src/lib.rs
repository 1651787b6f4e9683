//! Query-Runner: an asynchronous query state machine for UI data fetching.
//!
//! A [`QueryRunner`] owns one query execution slot: it issues a request
//! through an injected [`Transport`], tracks the fetch lifecycle
//! (idle -> loading -> success/failure) as a `(data, loading, error)` triple,
//! and supports explicit re-invocation while staying safe against
//! overlapping fetches.
//!
//! # Key Features
//!
//! - **Narrow transport seam**: the runner consumes the [`Transport`] trait
//!   and never performs network work itself
//! - **Last-dispatch-wins**: every dispatch is sequence-numbered; only the
//!   latest dispatch's completion reaches state, stale completions are
//!   discarded at application time
//! - **Stale data stays visible**: a failure sets the error flag without
//!   clearing previously fetched data, so consumers can render stale content
//!   next to an error indicator
//! - **Explicit lifecycle**: hosts call [`start`](QueryRunner::start) and
//!   [`dispose`](QueryRunner::dispose) at well-defined points instead of
//!   relying on implicit framework hooks
//! - **Observability**: a [`FetchTracer`] sees dispatches, completions,
//!   failure kinds, and discarded stale results
//!
//! # Example
//!
//! ```ignore
//! use query_runner::{QueryRequest, QueryRunner};
//!
//! let runner = QueryRunner::new(
//!     QueryRequest::new("{ listings { id title } }"),
//!     transport,
//! );
//! runner.start();
//!
//! // from the view, on every render:
//! let state = runner.state();
//! match state.data() {
//!     Some(listings) => render(listings, state.has_error()),
//!     None if state.is_loading() => render_spinner(),
//!     None => render_empty(state.has_error()),
//! }
//! ```

mod error;
mod query;
mod runner;
mod state;
pub mod tracer;
mod transport;

pub use error::FetchFailure;
pub use query::QueryRequest;
pub use runner::{QueryRunner, QueryRunnerBuilder};
pub use state::{QueryPhase, QueryState};
pub use tracer::{FetchSeq, FetchTracer, NoopTracer};
pub use transport::{QueryResponse, ResponseError, Transport, TransportError};
