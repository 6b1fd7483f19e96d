//! Local stub of the Megaverse API for CLI tests.
//!
//! An axum router on an ephemeral port, served from a background thread with
//! its own tokio runtime. Every request is recorded before it is answered.

#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener};
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread;

use axum::Router;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Request path as sent, percent-encoding intact.
    pub path: String,
    pub body: String,
}

type Responder = dyn Fn(&Recorded) -> (u16, String) + Send + Sync;

#[derive(Clone)]
struct StubState {
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    pub fn start<F>(responder: F) -> Self
    where
        F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
    {
        // Bound here so the port accepts connections before the runtime is up.
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().expect("stub addr");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            responder: Arc::new(responder),
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(handle).with_state(state);

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("stub runtime");
            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("adopt stub listener");
                axum::serve(listener, app).await.expect("serve stub");
            });
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("lock").clone()
    }
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let recorded = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        body,
    };
    let (status, payload) = (state.responder)(&recorded);
    state.requests.lock().expect("lock").push(recorded);

    let status = StatusCode::from_u16(status).expect("valid stub status");
    (status, [(header::CONTENT_TYPE, "application/json")], payload).into_response()
}

/// Command for the megaverse binary with proxies and inherited config cleared.
pub fn megaverse_cmd(base_url: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_megaverse"));
    for var in [
        "CANDIDATE_ID",
        "HTTP_PROXY",
        "http_proxy",
        "HTTPS_PROXY",
        "https_proxy",
        "ALL_PROXY",
        "all_proxy",
        "MEGAVERSE_MIN_INTERVAL_MS",
        "MEGAVERSE_MAX_RETRIES",
        "MEGAVERSE_RETRY_BASE_MS",
        "MEGAVERSE_TIMEOUT_SECS",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("API_BASE_URL", base_url)
        .env("NO_PROXY", "127.0.0.1,localhost")
        .env("MEGAVERSE_MIN_INTERVAL_MS", "0")
        .env("MEGAVERSE_RETRY_BASE_MS", "1");
    cmd
}
