//! In-process stand-in for the Crawlbyte task endpoint

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio::sync::Notify;

pub const VALID_KEY: &str = "cb_test_valid";

/// How the mock answers an authenticated request
#[derive(Clone)]
pub enum Reply {
    /// 201 with a fresh id, echoing the task type
    Created,
    /// Like `Created`, but only after the gate is notified
    Gated(Arc<Notify>),
    /// Fixed status and JSON body
    Json(StatusCode, Value),
    /// Fixed status and plain-text body
    Text(StatusCode, &'static str),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
    pub body: Value,
}

struct MockState {
    reply: Reply,
    next_id: AtomicU64,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockService {
    pub base_url: String,
    state: Arc<MockState>,
    // Keeps the server alive for blocking tests
    _runtime: Option<Runtime>,
}

impl MockService {
    /// Start on the current Tokio runtime
    pub async fn start(reply: Reply) -> Self {
        let state = new_state(reply);
        let base_url = serve(state.clone()).await;

        Self {
            base_url,
            state,
            _runtime: None,
        }
    }

    /// Start on a dedicated runtime, for callers outside any async context
    pub fn start_in_background(reply: Reply) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();

        let state = new_state(reply);
        let base_url = runtime.block_on(serve(state.clone()));

        Self {
            base_url,
            state,
            _runtime: Some(runtime),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

fn new_state(reply: Reply) -> Arc<MockState> {
    Arc::new(MockState {
        reply,
        next_id: AtomicU64::new(1),
        requests: Mutex::new(Vec::new()),
    })
}

async fn serve(state: Arc<MockState>) -> String {
    let app = Router::new()
        .route("/api/tasks", post(create_task))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

async fn create_task(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header_value(header::AUTHORIZATION);

    state.requests.lock().unwrap().push(RecordedRequest {
        authorization: authorization.clone(),
        user_agent: header_value(header::USER_AGENT),
        body: body.clone(),
    });

    let expected = format!("Bearer {}", VALID_KEY);
    if authorization.as_deref() != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid API key"})),
        )
            .into_response();
    }

    match &state.reply {
        Reply::Created => created(&state, &body),
        Reply::Gated(gate) => {
            gate.notified().await;
            created(&state, &body)
        }
        Reply::Json(status, value) => (*status, Json(value.clone())).into_response(),
        Reply::Text(status, text) => (*status, *text).into_response(),
    }
}

fn created(state: &MockState, body: &Value) -> Response {
    let n = state.next_id.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::CREATED,
        Json(json!({
            "id": format!("tsk_{:04}", n),
            "type": body["type"],
            "status": "queued",
        })),
    )
        .into_response()
}

/// Address that refuses connections
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

/// Raw HTTP/1.1 response with a JSON body
pub fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}

/// Plain TCP server that answers each connection with the next canned
/// response and then closes the socket, without announcing `Connection: close`.
pub fn spawn_closing_server(responses: Vec<String>) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        for response in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            read_request(&mut stream);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{}/api", addr)
}

fn read_request(stream: &mut std::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + body_len {
            return;
        }
    }
}
