//! Recording mock transport.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use ac_mediator::QueryParams;
use ac_mediator::error::TransportError;
use ac_mediator::transport::{AuthParams, Transport};

/// One request seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Endpoint URL.
    pub endpoint: String,
    /// Query parameters.
    pub params: QueryParams,
    /// Injected auth data.
    pub auth: AuthParams,
}

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A JSON body.
    Json(Value),
    /// A non-success status.
    Status(u16, String),
    /// A timeout.
    Timeout,
}

/// Transport returning a canned reply and recording every request.
#[derive(Debug)]
pub struct MockTransport {
    reply: MockReply,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    /// Answers every request with `body`.
    pub fn json(body: Value) -> Self {
        Self::new(MockReply::Json(body))
    }

    /// Creates a transport with the given reply.
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests recorded so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The only recorded request. Panics unless exactly one was sent.
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_request(
        &self,
        endpoint: &str,
        params: &QueryParams,
        auth: &AuthParams,
    ) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            endpoint: endpoint.to_string(),
            params: params.clone(),
            auth: auth.clone(),
        });

        match &self.reply {
            MockReply::Json(body) => Ok(body.clone()),
            MockReply::Status(status, message) => Err(TransportError::Status {
                endpoint: endpoint.to_string(),
                status: *status,
                message: message.clone(),
            }),
            MockReply::Timeout => Err(TransportError::Timeout {
                endpoint: endpoint.to_string(),
                timeout_ms: 30_000,
            }),
        }
    }
}
