//! Scripted local upstream for integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, DurationRound, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tiny_http::{Header, Response, Server};

use metcast::core::util::format_http_date;

pub const FORECAST_JSON: &str = include_str!("../fixtures/locationforecast.json");

/// Current time truncated to whole seconds (HTTP dates carry no fractions)
pub fn now_secs() -> DateTime<Utc> {
    Utc::now()
        .duration_trunc(Duration::seconds(1))
        .expect("truncate to seconds")
}

/// One canned response
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Reply {
    pub fn ok(body: &str, expires: DateTime<Utc>, last_modified: DateTime<Utc>) -> Self {
        Self {
            status: 200,
            headers: freshness_headers(expires, last_modified),
            body: body.to_string(),
        }
    }

    pub fn not_modified(expires: DateTime<Utc>, last_modified: DateTime<Utc>) -> Self {
        Self {
            status: 304,
            headers: freshness_headers(expires, last_modified),
            body: String::new(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self
    }
}

fn freshness_headers(expires: DateTime<Utc>, last_modified: DateTime<Utc>) -> Vec<(String, String)> {
    vec![
        ("Expires".to_string(), format_http_date(&expires)),
        ("Last-Modified".to_string(), format_http_date(&last_modified)),
    ]
}

/// A request as seen by the upstream
#[derive(Debug, Clone)]
pub struct Recorded {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP server answering with queued replies (500 once the queue is empty)
pub struct MockUpstream {
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
    pub base_url: String,
}

impl MockUpstream {
    pub fn start() -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind mock upstream"));
        let port = server
            .server_addr()
            .to_ip()
            .expect("mock upstream listens on tcp")
            .port();

        let replies: Arc<Mutex<VecDeque<Reply>>> = Arc::default();
        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();

        let handle = {
            let server = server.clone();
            let replies = replies.clone();
            let requests = requests.clone();
            std::thread::spawn(move || {
                for request in server.incoming_requests() {
                    requests.lock().unwrap().push(Recorded {
                        url: request.url().to_string(),
                        headers: request
                            .headers()
                            .iter()
                            .map(|h| (h.field.as_str().as_str().to_string(), h.value.as_str().to_string()))
                            .collect(),
                    });

                    let reply = replies
                        .lock()
                        .unwrap()
                        .pop_front()
                        .unwrap_or_else(|| Reply::status(500));

                    let mut response = Response::from_string(reply.body).with_status_code(reply.status);
                    for (name, value) in &reply.headers {
                        response.add_header(
                            Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("valid header"),
                        );
                    }
                    let _ = request.respond(response);
                }
            })
        };

        Self {
            server,
            handle: Some(handle),
            replies,
            requests,
            base_url: format!("http://127.0.0.1:{}/complete", port),
        }
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("at least one request")
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
