use async_trait::async_trait;
use bytes::Bytes;
use credsign_core::{Error, HttpSend, Result};
use http::{HeaderMap, StatusCode, Uri};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// HttpSend that answers every request with a scripted response and counts calls.
#[derive(Debug, Clone)]
pub struct MockHttpSend {
    state: Arc<Mutex<MockState>>,
    calls: Arc<AtomicUsize>,
    delay: Duration,
}

#[derive(Debug)]
struct MockState {
    status: StatusCode,
    body: String,
    transport_error: bool,
    requests: Vec<(Uri, HeaderMap)>,
}

impl MockHttpSend {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                status,
                body: body.into(),
                transport_error: false,
                requests: Vec::new(),
            })),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
        }
    }

    /// Hold every response back for `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replace the scripted response.
    pub fn respond(&self, status: StatusCode, body: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.status = status;
        state.body = body.into();
        state.transport_error = false;
    }

    /// Fail every following request before any response arrives.
    pub fn fail_transport(&self) {
        self.state.lock().unwrap().transport_error = true;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(Uri, HeaderMap)> {
        self.state.lock().unwrap().requests.last().cloned()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (status, body, transport_error) = {
            let mut state = self.state.lock().unwrap();
            state
                .requests
                .push((req.uri().clone(), req.headers().clone()));
            (state.status, state.body.clone(), state.transport_error)
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if transport_error {
            return Err(Error::refresh_transport("connection reset by peer"));
        }

        let mut resp = http::Response::new(Bytes::from(body));
        *resp.status_mut() = status;
        Ok(resp)
    }
}
