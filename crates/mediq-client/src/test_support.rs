//! Scripted in-process backend for contract tests.
//!
//! A `tiny_http` server on `127.0.0.1:0` answers from per-route queues and
//! records every request it sees. Each queue pops until its last response,
//! which then repeats.

use std::collections::{HashMap, VecDeque};
use std::io::Read;
use std::net::TcpListener;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use mediq_config::BackendConfig;
use serde_json::Value;

/// One scripted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl MockResponse {
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type".into(), "application/json".into())],
        }
    }

    #[must_use]
    pub const fn empty(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type".into(), "text/plain".into())],
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn not_found() -> Self {
        Self::json(404, &serde_json::json!({ "detail": "Not Found" }))
    }
}

/// A request as the mock backend received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON, `Value::Null` when empty or invalid.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

type Routes = HashMap<(String, String), VecDeque<MockResponse>>;

/// In-process HTTP backend. Shuts down on drop.
pub struct MockBackend {
    server: Arc<tiny_http::Server>,
    port: u16,
    routes: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    worker: Option<JoinHandle<()>>,
}

impl MockBackend {
    /// Bind to a random local port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind.
    #[must_use]
    pub fn start() -> Self {
        let server = Arc::new(
            tiny_http::Server::http("127.0.0.1:0").expect("mock backend should bind"),
        );
        let port = server
            .server_addr()
            .to_ip()
            .map(|a| a.port())
            .expect("mock backend should listen on an IP address");

        let routes: Arc<Mutex<Routes>> = Arc::default();
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();

        let worker = {
            let server = Arc::clone(&server);
            let routes = Arc::clone(&routes);
            let requests = Arc::clone(&requests);
            std::thread::spawn(move || serve(&server, &routes, &requests))
        };

        Self {
            server,
            port,
            routes,
            requests,
            worker: Some(worker),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Backend settings pointing at this server.
    #[must_use]
    pub fn config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.base_url(),
            timeout_secs: 5,
            ..BackendConfig::default()
        }
    }

    /// Queue `response` for `method path` (path without query string).
    pub fn on(&self, method: &str, path: &str, response: MockResponse) -> &Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method.to_ascii_uppercase(), path.to_string()))
            .or_default()
            .push_back(response);
        self
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests to `method path` only.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
            .collect()
    }

    /// A URL nothing listens on, for network-failure tests.
    ///
    /// # Panics
    ///
    /// Panics if no ephemeral port can be reserved.
    #[must_use]
    pub fn unreachable_config() -> BackendConfig {
        let listener = TcpListener::bind("127.0.0.1:0").expect("reserve a port");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);
        BackendConfig {
            base_url: format!("http://127.0.0.1:{port}"),
            timeout_secs: 2,
            ..BackendConfig::default()
        }
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn serve(
    server: &tiny_http::Server,
    routes: &Mutex<Routes>,
    requests: &Mutex<Vec<RecordedRequest>>,
) {
    while let Ok(mut request) = server.recv() {
        let mut body = String::new();
        let _ = request.as_reader().read_to_string(&mut body);

        let url = request.url().to_string();
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (url, None),
        };
        let method = request.method().as_str().to_ascii_uppercase();
        let headers = request
            .headers()
            .iter()
            .map(|h| (h.field.as_str().to_string(), h.value.as_str().to_string()))
            .collect();

        let scripted = {
            let mut routes = routes.lock().unwrap_or_else(PoisonError::into_inner);
            routes
                .get_mut(&(method.clone(), path.clone()))
                .and_then(|queue| {
                    if queue.len() > 1 {
                        queue.pop_front()
                    } else {
                        queue.front().cloned()
                    }
                })
        };

        requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                method,
                path,
                query,
                headers,
                body,
            });

        let scripted = scripted.unwrap_or_else(MockResponse::not_found);
        let mut response =
            tiny_http::Response::from_string(scripted.body).with_status_code(scripted.status);
        for (name, value) in &scripted.headers {
            if let Ok(header) = tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                response.add_header(header);
            }
        }
        let _ = request.respond(response);
    }
}
