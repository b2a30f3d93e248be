//! The transport seam.
//!
//! The crate depends on a transport only through [`Transport`]: a
//! structured request goes in, a status, headers and a body come out.
//! Connection handling, TLS, signing and socket-level retries all live
//! behind this trait.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::operation::HttpMethod;

/// Ordered list of header name/value pairs.
pub type Headers = Vec<(String, String)>;

/// Looks up a header by case-insensitive name.
pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// A serialized request ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Name of the operation, for correlation only
    pub operation: &'static str,
    /// HTTP method
    pub method: HttpMethod,
    /// Request path
    pub path: &'static str,
    /// Request headers
    pub headers: Headers,
    /// Serialized input
    pub body: Vec<u8>,
}

impl TransportRequest {
    /// Returns a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the body is not valid JSON.
    pub fn body_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// A raw response as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Serialized output
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Creates a response with no headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Creates a response whose body is the given JSON document.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string())
            .with_header("content-type", "application/json")
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Error returned when the transport could not complete an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportError {
    /// Creates a new transport error.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for TransportError {}

/// Kind of transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The connection could not be established or was reset
    Connect,
    /// The transport's own timeout elapsed
    Timeout,
    /// Reading or writing the exchange failed
    Io,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Connect => write!(f, "connect"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Io => write!(f, "io"),
        }
    }
}

/// Sends one serialized request and returns the raw response.
///
/// Implementations perform exactly one exchange per call. Dropping the
/// returned future must abort the exchange; the pipeline relies on this
/// to cancel in-flight calls.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a single exchange.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request).await
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Respond(TransportResponse),
    Fail(TransportError),
    Hang,
}

/// An in-memory transport that replays scripted replies.
///
/// Replies are consumed in the order they were queued. When the queue is
/// empty the optional repeating reply is used; without one the exchange
/// fails with a `Connect` error. Every request is recorded, so tests can
/// count network calls and inspect what was sent without any real I/O.
///
/// # Examples
///
/// ```
/// use typed_ops::{ScriptedTransport, TransportResponse};
///
/// let transport = ScriptedTransport::new()
///     .reply(TransportResponse::json(200, &serde_json::json!({})));
///
/// assert_eq!(transport.calls(), 0);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    repeating: Option<Reply>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    /// Creates a transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn reply(self, response: TransportResponse) -> Self {
        self.push(Reply::Respond(response))
    }

    /// Queues a transport failure.
    pub fn fail(self, error: TransportError) -> Self {
        self.push(Reply::Fail(error))
    }

    /// Queues an exchange that never completes.
    pub fn hang(self) -> Self {
        self.push(Reply::Hang)
    }

    /// Sets the response used once the queue is exhausted.
    pub fn repeat(mut self, response: TransportResponse) -> Self {
        self.repeating = Some(Reply::Respond(response));
        self
    }

    /// Returns the number of exchanges started so far.
    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Returns a snapshot of every request received, in order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        lock(&self.requests).clone()
    }

    fn push(self, reply: Reply) -> Self {
        lock(&self.replies).push_back(reply);
        self
    }

    fn next_reply(&self) -> Reply {
        lock(&self.replies)
            .pop_front()
            .or_else(|| self.repeating.clone())
            .unwrap_or_else(|| {
                Reply::Fail(TransportError::new(
                    TransportErrorKind::Connect,
                    "no scripted reply left",
                ))
            })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        lock(&self.requests).push(request);
        match self.next_reply() {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(error) => Err(error),
            Reply::Hang => std::future::pending().await,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
