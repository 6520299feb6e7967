//! In-process stand-in for the spreadsheet endpoint, used by tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::get, Router};

use crate::config::DEFAULT_PAYLOAD_LIMIT;

#[derive(Clone)]
pub struct MockRemote {
    body: Arc<Mutex<Option<String>>>,
    posts: Arc<AtomicUsize>,
    failures_left: Arc<AtomicUsize>,
    limit: usize,
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PAYLOAD_LIMIT)
    }
}

impl MockRemote {
    /// Bodies longer than `limit` characters are rejected like an overfull cell.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            body: Arc::new(Mutex::new(None)),
            posts: Arc::new(AtomicUsize::new(0)),
            failures_left: Arc::new(AtomicUsize::new(0)),
            limit,
        }
    }

    pub fn set_body(&self, body: &str) {
        *self.body.lock().unwrap() = Some(body.to_string());
    }

    pub fn body(&self) -> Option<String> {
        self.body.lock().unwrap().clone()
    }

    pub fn post_count(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }

    pub fn fail_next_posts(&self, n: usize) {
        self.failures_left.store(n, Ordering::SeqCst);
    }

    /// Serve on an ephemeral port and return the endpoint URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/exec", get(serve_get).post(serve_post))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/exec", addr)
    }
}

async fn serve_get(State(mock): State<MockRemote>) -> (StatusCode, String) {
    match mock.body() {
        Some(body) => (StatusCode::OK, body),
        None => (StatusCode::OK, "{}".to_string()),
    }
}

async fn serve_post(State(mock): State<MockRemote>, body: String) -> StatusCode {
    mock.posts.fetch_add(1, Ordering::SeqCst);

    let failing = mock
        .failures_left
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    if body.chars().count() > mock.limit {
        return StatusCode::PAYLOAD_TOO_LARGE;
    }

    mock.set_body(&body);
    StatusCode::OK
}
