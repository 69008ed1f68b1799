//! Mock transport for testing
//!
//! Queue responses with `queue_*()` before dispatching. Each `execute()`
//! consumes one queued outcome and records the request it was given.
//! `queue_gated()` holds its response until the returned gate is opened,
//! which keeps a request in flight for as long as a test needs.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, oneshot};

use super::transport::{ApiRequest, RawResponse, Transport};
use crate::error::RequestError;

struct Scripted {
    outcome: Result<RawResponse, RequestError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Opens a gated response
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response with the given status
    pub async fn queue_json(&self, status: u16, body: Value) {
        self.queue(Ok(RawResponse::new(status, body.to_string())))
            .await;
    }

    /// Queue a response with a raw body (e.g. malformed JSON)
    pub async fn queue_raw(&self, status: u16, body: &str) {
        self.queue(Ok(RawResponse::new(status, body))).await;
    }

    /// Queue a transport failure
    pub async fn queue_transport_error(&self, message: &str) {
        self.queue(Err(RequestError::Transport(message.to_string())))
            .await;
    }

    /// Queue a JSON response that is held until the gate opens
    pub async fn queue_gated(&self, status: u16, body: Value) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.responses.lock().await.push_back(Scripted {
            outcome: Ok(RawResponse::new(status, body.to_string())),
            gate: Some(rx),
        });
        Gate(tx)
    }

    async fn queue(&self, outcome: Result<RawResponse, RequestError>) {
        self.responses
            .lock()
            .await
            .push_back(Scripted { outcome, gate: None });
    }

    /// Requests seen so far, in order
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub async fn has_queued_responses(&self) -> bool {
        !self.responses.lock().await.is_empty()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, RequestError> {
        self.requests.lock().await.push(request);

        let scripted = self.responses.lock().await.pop_front().ok_or_else(|| {
            RequestError::Transport("No queued response in MockTransport".to_string())
        })?;

        if let Some(gate) = scripted.gate {
            // A dropped gate behaves like a dropped connection
            gate.await
                .map_err(|_| RequestError::Transport("connection closed".to_string()))?;
        }

        scripted.outcome
    }
}
