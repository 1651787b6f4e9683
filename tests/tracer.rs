//! Tracer observation tests: the failure kinds stay distinguishable to
//! observers even though the consumer surface only sees the error flag.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use query_runner::{
    FetchFailure, FetchSeq, FetchTracer, QueryRequest, QueryResponse, QueryRunner, ResponseError,
    Transport, TransportError,
};

type Payload = Vec<String>;

fn request() -> QueryRequest {
    QueryRequest::new("{ bookings { id } }")
}

struct ScriptedTransport {
    script: Mutex<VecDeque<Result<QueryResponse<Payload>, TransportError>>>,
}

impl ScriptedTransport {
    fn new(
        script: impl IntoIterator<Item = Result<QueryResponse<Payload>, TransportError>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
        })
    }
}

#[async_trait]
impl Transport<Payload> for ScriptedTransport {
    async fn fetch(
        &self,
        _request: &QueryRequest,
    ) -> Result<QueryResponse<Payload>, TransportError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport script exhausted")
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Ev {
    Dispatch { seq: u64, document: String },
    Resolve(u64),
    QueryFailure { seq: u64, messages: Vec<String> },
    TransportFailure { seq: u64 },
}

#[derive(Default)]
struct RecordingTracer {
    events: Mutex<Vec<Ev>>,
}

impl RecordingTracer {
    fn events(&self) -> Vec<Ev> {
        self.events.lock().unwrap().clone()
    }
}

impl FetchTracer for RecordingTracer {
    fn on_dispatch(&self, seq: FetchSeq, request: &QueryRequest) {
        self.events.lock().unwrap().push(Ev::Dispatch {
            seq: seq.0,
            document: request.document().to_string(),
        });
    }

    fn on_resolve(&self, seq: FetchSeq) {
        self.events.lock().unwrap().push(Ev::Resolve(seq.0));
    }

    fn on_failure(&self, seq: FetchSeq, failure: &FetchFailure) {
        let ev = match failure.response_errors() {
            Some(errors) => Ev::QueryFailure {
                seq: seq.0,
                messages: errors.iter().map(|e| e.message.clone()).collect(),
            },
            None => Ev::TransportFailure { seq: seq.0 },
        };
        self.events.lock().unwrap().push(ev);
    }
}

fn traced_runner(
    transport: Arc<ScriptedTransport>,
) -> (QueryRunner<Payload>, Arc<RecordingTracer>) {
    let tracer = Arc::new(RecordingTracer::default());
    let runner = QueryRunner::builder(request(), transport)
        .shared_tracer(tracer.clone())
        .build();
    (runner, tracer)
}

async fn settled(runner: &QueryRunner<Payload>) {
    for _ in 0..500 {
        if !runner.state().is_loading() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("runner never settled");
}

#[tokio::test]
async fn test_successful_fetch_emits_dispatch_then_resolve() {
    let transport = ScriptedTransport::new([Ok(QueryResponse::ok(vec!["b1".to_string()]))]);
    let (runner, tracer) = traced_runner(transport);

    runner.run();
    settled(&runner).await;

    assert_eq!(
        tracer.events(),
        vec![
            Ev::Dispatch {
                seq: 1,
                document: "{ bookings { id } }".to_string(),
            },
            Ev::Resolve(1),
        ]
    );
}

#[tokio::test]
async fn test_response_errors_surface_as_query_failure() {
    let transport = ScriptedTransport::new([Ok(QueryResponse::with_errors(
        Vec::new(),
        vec![
            ResponseError::new("booking not found"),
            ResponseError::new("viewer not authorized"),
        ],
    ))]);
    let (runner, tracer) = traced_runner(transport);

    runner.run();
    settled(&runner).await;

    assert_eq!(
        tracer.events().last(),
        Some(&Ev::QueryFailure {
            seq: 1,
            messages: vec![
                "booking not found".to_string(),
                "viewer not authorized".to_string(),
            ],
        })
    );
}

#[tokio::test]
async fn test_round_trip_failure_surfaces_as_transport_failure() {
    let transport = ScriptedTransport::new([Err(anyhow::anyhow!("dns lookup failed").into())]);
    let (runner, tracer) = traced_runner(transport);

    runner.run();
    settled(&runner).await;

    assert_eq!(
        tracer.events().last(),
        Some(&Ev::TransportFailure { seq: 1 })
    );
}

#[tokio::test]
async fn test_sequence_numbers_increase_across_refetches() {
    let transport = ScriptedTransport::new([
        Ok(QueryResponse::ok(vec!["a".to_string()])),
        Err(anyhow::anyhow!("flaky network").into()),
        Ok(QueryResponse::ok(vec!["b".to_string()])),
    ]);
    let (runner, tracer) = traced_runner(transport);

    runner.start();
    settled(&runner).await;
    runner.refetch();
    settled(&runner).await;
    runner.refetch();
    settled(&runner).await;

    let seqs: Vec<u64> = tracer
        .events()
        .iter()
        .filter_map(|ev| match ev {
            Ev::Dispatch { seq, .. } => Some(*seq),
            _ => None,
        })
        .collect();
    assert_eq!(seqs, vec![1, 2, 3]);

    assert_eq!(
        tracer.events().last(),
        Some(&Ev::Resolve(3)),
    );
}
