//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::{json, Value};

use bike_rental::http::{HttpRequest, HttpResponse, Transport, TransportError};
use bike_rental::storage::{shared, AuthTokens, MemoryTokenStore, SharedTokenStore};
use bike_rental::{initialize, Config, Runtime};

pub const BASE_URL: &str = "https://api.test/api/v1/";

/// Transport that answers from a script and records every request.
#[derive(Default)]
pub struct MockTransport {
    replies: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Queues a JSON response.
    pub fn reply(&self, status: u16, body: Value) -> &Self {
        self.reply_raw(status, &body.to_string())
    }

    pub fn reply_raw(&self, status: u16, body: &str) -> &Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            status_text: status_text(status).to_string(),
            body: body.to_string(),
        }));
        self
    }

    /// Queues a failure with no response at all.
    pub fn fail(&self) -> &Self {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError("connection refused".to_string())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn remaining_replies(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError(format!("unscripted request to {}", request.url))))
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

pub fn bike(id: u64, name: &str, bike_type: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "brand": "Trek",
        "bike_type": bike_type,
        "status": "available",
        "price_per_hour": "10.00",
        "image": format!("/media/bikes/{id}.jpg"),
    })
}

/// A paginated listing body.
pub fn listing(bikes: Vec<Value>, count: u64) -> Value {
    json!({ "results": bikes, "count": count })
}

pub fn logged_in_store() -> SharedTokenStore {
    shared(MemoryTokenStore::with_tokens(&AuthTokens::new("access-1", "refresh-1")))
}

pub fn logged_out_store() -> SharedTokenStore {
    shared(MemoryTokenStore::default())
}

pub fn test_config() -> Config {
    Config {
        api_url: BASE_URL.to_string(),
        ..Config::default()
    }
}

pub fn runtime(transport: &Rc<MockTransport>, store: SharedTokenStore) -> Runtime {
    initialize(&test_config(), transport.clone(), store)
}

/// The value of query parameter `key` in a request URL.
pub fn query_param(url: &str, key: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    bike_rental::domain::query::parse_query_string(query)
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}
