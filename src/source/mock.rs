//! In-memory [`Transport`] for tests.

use std::collections::HashMap;
use std::time::Duration;

use futures::FutureExt;
use parking_lot::Mutex;

use super::{FetchFuture, RawResponse, Transport};
use crate::error::FetchError;

/// What the mock does when an endpoint is requested.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond 200 with this body.
    Body(String),
    /// Fail as if the connection were refused.
    Refuse,
}

/// Canned replies keyed by endpoint, with an optional per-endpoint delay.
#[derive(Default)]
pub struct MockTransport {
    replies: HashMap<String, (Reply, Duration)>,
    requested: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, endpoint: &str, reply: Reply) -> Self {
        self.replies
            .insert(endpoint.to_string(), (reply, Duration::ZERO));
        self
    }

    pub fn reply_after(mut self, endpoint: &str, reply: Reply, delay: Duration) -> Self {
        self.replies.insert(endpoint.to_string(), (reply, delay));
        self
    }

    /// Endpoints requested so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }
}

impl Transport for MockTransport {
    fn get(&self, endpoint: &str) -> FetchFuture {
        self.requested.lock().push(endpoint.to_string());
        let entry = self.replies.get(endpoint).cloned();

        async move {
            match entry {
                Some((reply, delay)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    match reply {
                        Reply::Body(body) => Ok(RawResponse::new(200, body)),
                        Reply::Refuse => Err(refused().await),
                    }
                }
                None => Ok(RawResponse::new(404, r#"{"status":"error","code":"notFound","message":"no such endpoint"}"#)),
            }
        }
        .boxed()
    }
}

/// A real `reqwest::Error`, produced by connecting to a port nobody listens on.
async fn refused() -> FetchError {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    match reqwest::get(format!("http://{addr}/")).await {
        Ok(_) => FetchError::Api {
            code: None,
            message: "unexpected listener".into(),
        },
        Err(e) => FetchError::Transport(e),
    }
}
