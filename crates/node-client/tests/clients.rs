//! Node client behaviour against in-process mock nodes.
//!
//! Every mock binds `127.0.0.1:0`, counts the connections it accepts and
//! answers with whatever the test's closure produces.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use data_loader::{Movie, MovieCatalog};
use node_client::{DispatchError, MasterClient, MasterClientError, RetryPolicy, WorkerClient, WorkerPool};
use protocol::{codec, AggregatedResponse, EnrichedMovie, SimilarityResult, Task};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ============================================================================
// Test Fixtures
// ============================================================================

struct MockNode {
    addr: String,
    hits: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl MockNode {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockNode {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start a node that reads one task per connection and replies with `respond(task)`
async fn spawn_node<F>(respond: F) -> MockNode
where
    F: Fn(&Task) -> Vec<u8> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock node");
    let addr = listener.local_addr().unwrap().to_string();
    let hits = Arc::new(AtomicUsize::new(0));
    let respond = Arc::new(respond);

    let counter = hits.clone();
    let handle = tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                continue;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let respond = respond.clone();
            tokio::spawn(async move {
                let task: Task = codec::read_message(&mut stream, Duration::from_secs(5))
                    .await
                    .expect("mock node failed to read task");
                let body = respond(&task);
                let _ = stream.write_all(&body).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    MockNode { addr, hits, handle }
}

/// A worker that scores every candidate as `id / 1000`
async fn spawn_worker() -> MockNode {
    spawn_node(|task| {
        let results: Vec<SimilarityResult> = task
            .movies
            .iter()
            .map(|m| SimilarityResult::new(m.id, f64::from(m.id) / 1000.0))
            .collect();
        codec::encode(&results).unwrap()
    })
    .await
}

/// A worker that accepts connections and never answers
async fn spawn_silent_worker() -> MockNode {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            held.push(stream);
        }
    });

    MockNode { addr, hits, handle }
}

/// An address nothing listens on
async fn dead_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        connect_timeout: Duration::from_millis(500),
        read_timeout: Duration::from_millis(300),
        max_attempts: 3,
        retry_delay: Duration::from_millis(25),
    }
}

fn sample_task() -> Task {
    Task::new(
        Movie::new(1, "Target"),
        vec![Movie::new(10, "Ten"), Movie::new(20, "Twenty"), Movie::new(30, "Thirty")],
    )
}

// ============================================================================
// WorkerClient
// ============================================================================

#[tokio::test]
async fn test_dispatch_returns_worker_results() {
    let worker = spawn_worker().await;
    let client = WorkerClient::new(fast_policy());

    let results = client.dispatch(&worker.addr, &sample_task()).await.unwrap();

    let ids: Vec<_> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![10, 20, 30]);
    assert!((results[1].similarity - 0.02).abs() < 1e-12);
    assert_eq!(worker.hits(), 1);
}

#[tokio::test]
async fn test_dispatch_with_empty_range() {
    let worker = spawn_worker().await;
    let client = WorkerClient::new(fast_policy());

    let task = Task::new(Movie::new(1, "Target"), vec![]);
    let results = client.dispatch(&worker.addr, &task).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(worker.hits(), 1, "empty ranges are still dispatched");
}

#[tokio::test]
async fn test_dispatch_unreachable_after_all_attempts() {
    let addr = dead_addr().await;
    let client = WorkerClient::new(fast_policy());

    let start = Instant::now();
    let err = client.dispatch(&addr, &sample_task()).await.unwrap_err();

    match &err {
        DispatchError::Unreachable { node, attempts, .. } => {
            assert_eq!(node, &addr);
            assert_eq!(*attempts, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_reassignable());
    // Two pauses between three attempts
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn test_dispatch_read_deadline_is_transport_failure() {
    let worker = spawn_silent_worker().await;
    let client = WorkerClient::new(fast_policy());

    let err = client.dispatch(&worker.addr, &sample_task()).await.unwrap_err();

    assert!(matches!(err, DispatchError::Transport { .. }), "got {err}");
    assert!(err.is_reassignable());
    assert_eq!(worker.hits(), 1, "no in-place retry after a successful connect");
}

#[tokio::test]
async fn test_dispatch_malformed_response_is_hard_error() {
    let worker = spawn_node(|_| b"{\"not\": \"a result list\"}".to_vec()).await;
    let client = WorkerClient::new(fast_policy());

    let err = client.dispatch(&worker.addr, &sample_task()).await.unwrap_err();

    assert!(matches!(err, DispatchError::Protocol { .. }), "got {err}");
    assert!(!err.is_reassignable());
}

// ============================================================================
// WorkerPool::reassign
// ============================================================================

#[tokio::test]
async fn test_reassign_stops_at_first_healthy_worker() {
    let failed = dead_addr().await;
    let first = spawn_worker().await;
    let second = spawn_worker().await;
    let pool = WorkerPool::new(
        vec![failed.clone(), first.addr.clone(), second.addr.clone()],
        fast_policy(),
    );

    let reassigned = pool.reassign(&sample_task(), &failed).await.unwrap();

    assert_eq!(reassigned.node, first.addr);
    assert_eq!(reassigned.results.len(), 3);
    assert_eq!(first.hits(), 1);
    assert_eq!(second.hits(), 0, "range must be sent to exactly one fallback");
}

#[tokio::test]
async fn test_reassign_never_picks_the_failed_node() {
    // The "failed" node is actually healthy: it must still be skipped
    let failed = spawn_worker().await;
    let other = spawn_worker().await;
    let pool = WorkerPool::new(vec![failed.addr.clone(), other.addr.clone()], fast_policy());

    let reassigned = pool.reassign(&sample_task(), &failed.addr).await.unwrap();

    assert_eq!(reassigned.node, other.addr);
    assert_eq!(failed.hits(), 0);
}

#[tokio::test]
async fn test_reassign_moves_past_unusable_fallbacks() {
    let failed = dead_addr().await;
    let also_dead = dead_addr().await;
    let garbage = spawn_node(|_| b"garbage".to_vec()).await;
    let healthy = spawn_worker().await;
    let pool = WorkerPool::new(
        vec![failed.clone(), also_dead, garbage.addr.clone(), healthy.addr.clone()],
        fast_policy(),
    );

    let reassigned = pool.reassign(&sample_task(), &failed).await.unwrap();

    assert_eq!(reassigned.node, healthy.addr);
    assert_eq!(garbage.hits(), 1);
}

#[tokio::test]
async fn test_reassign_exhausted_names_original_node() {
    let failed = dead_addr().await;
    let other = dead_addr().await;
    let pool = WorkerPool::new(vec![failed.clone(), other], fast_policy());

    let err = pool.reassign(&sample_task(), &failed).await.unwrap_err();

    match err {
        DispatchError::Exhausted { failed: named } => assert_eq!(named, failed),
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// MasterClient
// ============================================================================

fn small_catalog() -> MovieCatalog {
    MovieCatalog::from_movies(vec![
        Movie::new(1, "Heat"),
        Movie::new(2, "Collateral"),
        Movie::new(3, "Thief"),
    ])
    .unwrap()
}

#[tokio::test]
async fn test_unknown_title_fails_before_dispatch() {
    let master = spawn_worker().await;
    let client = MasterClient::new(master.addr.clone());

    let err = client
        .recommend_by_title(&small_catalog(), "Casablanca")
        .await
        .unwrap_err();

    assert!(matches!(err, MasterClientError::TitleNotFound(ref t) if t == "Casablanca"));
    assert_eq!(master.hits(), 0);
}

#[tokio::test]
async fn test_recommend_sends_whole_catalog() {
    let master = spawn_node(|task| {
        let ranked = task
            .movies
            .iter()
            .filter(|m| m.id != task.target_movie.id)
            .map(|m| EnrichedMovie::from_movie(m, 0.5))
            .collect();
        codec::encode(&AggregatedResponse::success(task.target_movie.title.clone(), ranked)).unwrap()
    })
    .await;
    let client = MasterClient::new(master.addr.clone());

    let response = client.recommend_by_title(&small_catalog(), "heat").await.unwrap();

    assert_eq!(response.target_movie, "Heat");
    let ids: Vec<_> = response.movie_response.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn test_empty_answer_is_no_recommendations() {
    let master = spawn_node(|task| {
        codec::encode(&AggregatedResponse::success(task.target_movie.title.clone(), vec![])).unwrap()
    })
    .await;
    let client = MasterClient::new(master.addr.clone());

    let err = client.recommend_by_title(&small_catalog(), "Thief").await.unwrap_err();

    assert!(matches!(err, MasterClientError::NoRecommendations));
    assert_eq!(err.to_string(), "no recommendations found");
}

#[tokio::test]
async fn test_remote_error_is_surfaced() {
    let master = spawn_node(|_| codec::encode(&AggregatedResponse::failure("failed to decode request")).unwrap()).await;
    let client = MasterClient::new(master.addr.clone());

    let err = client.recommend_by_title(&small_catalog(), "Heat").await.unwrap_err();

    assert!(matches!(err, MasterClientError::Remote(ref msg) if msg == "failed to decode request"));
}

#[tokio::test]
async fn test_master_unreachable() {
    let client = MasterClient::new(dead_addr().await);

    let err = client.recommend_by_title(&small_catalog(), "Heat").await.unwrap_err();
    assert!(matches!(err, MasterClientError::Unreachable { .. }));
}
