use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use axum::Router;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, Version, header};
use axum::response::IntoResponse;

#[derive(Debug, Clone)]
pub struct StubResponse {
    status: u16,
    body: String,
}

impl StubResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request_line: String,
    pub body: String,
}

#[derive(Clone)]
struct StubState {
    pending: Arc<Mutex<Vec<(Option<&'static str>, StubResponse)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Backend double: every request takes the first canned response whose path matches.
pub struct StubServer {
    port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start(responses: Vec<StubResponse>) -> Self {
        Self::start_routed(responses.into_iter().map(|r| (None, r)).collect())
    }

    /// Responses keyed by path; a `None` key matches any path.
    pub fn start_routed(responses: Vec<(Option<&'static str>, StubResponse)>) -> Self {
        let state = StubState {
            pending: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = Arc::clone(&state.requests);
        let app = Router::new().fallback(respond).with_state(state);

        let (port_tx, port_rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("stub runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind stub server");
                let port = listener.local_addr().expect("stub address").port();
                port_tx.send(port).expect("report stub port");
                axum::serve(listener, app).await.expect("serve stub");
            });
        });
        let port = port_rx.recv().expect("stub server started");

        Self { port, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/api/", self.port)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn respond(
    State(state): State<StubState>,
    method: Method,
    version: Version,
    uri: Uri,
    body: String,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    let response = {
        let mut pending = state.pending.lock().unwrap();
        let index = pending
            .iter()
            .position(|(route, _)| route.is_none_or(|route| route == path));
        index.map(|index| pending.remove(index).1)
    }
    .unwrap_or_else(|| StubResponse::new(404, r#"{"detail": "Not found."}"#));

    state.requests.lock().unwrap().push(RecordedRequest {
        request_line: format!("{method} {path} {version:?}"),
        body,
    });

    let status = StatusCode::from_u16(response.status).unwrap();
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
}
