use std::fmt;

use crate::cancel::CancelReason;
use crate::transport::TransportError;
use crate::validation::ValidationErrors;

/// Errors returned by operation calls and pagination.
///
/// Every failure is returned to the immediate caller; the client never
/// retries or swallows one.
#[derive(Debug)]
pub enum Error {
    /// The input broke one or more declared constraints. Nothing was sent.
    Validation(ValidationErrors),
    /// The caller's scope was cancelled or expired before the send resolved
    Cancelled(CancelReason),
    /// The transport could not complete the exchange
    Transport(TransportError),
    /// The remote endpoint answered with a non-success status
    Server(ServerError),
    /// The response payload did not match the expected output shape
    Decode(DecodeError),
    /// The input could not be serialized
    Encode(String),
    /// The server returned a continuation cursor that did not advance
    CursorStalled {
        /// Operation being paginated
        operation: &'static str,
        /// The repeated cursor
        cursor: String,
    },
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Cancelled(_) => ErrorKind::Cancelled,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Server(_) => ErrorKind::Server,
            Error::Decode(_) => ErrorKind::Decode,
            Error::Encode(_) => ErrorKind::Encode,
            Error::CursorStalled { .. } => ErrorKind::CursorStalled,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(e) => write!(f, "invalid input: {}", e),
            Error::Cancelled(reason) => write!(f, "operation aborted: {}", reason),
            Error::Transport(e) => write!(f, "{}", e),
            Error::Server(e) => write!(f, "{}", e),
            Error::Decode(e) => write!(f, "{}", e),
            Error::Encode(msg) => write!(f, "failed to encode input: {}", msg),
            Error::CursorStalled { operation, cursor } => write!(
                f,
                "{} pagination stalled: cursor '{}' did not advance",
                operation, cursor
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Validation(e) => Some(e),
            Error::Transport(e) => Some(e),
            Error::Server(e) => Some(e),
            Error::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(e: ValidationErrors) -> Self {
        Error::Validation(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

impl From<ServerError> for Error {
    fn from(e: ServerError) -> Self {
        Error::Server(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

/// Category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input validation failed
    Validation,
    /// The send was cancelled or timed out
    Cancelled,
    /// Network-level failure
    Transport,
    /// Non-success status from the server
    Server,
    /// Response payload could not be decoded
    Decode,
    /// Input could not be encoded
    Encode,
    /// Pagination cursor failed to advance
    CursorStalled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::Server => write!(f, "server"),
            ErrorKind::Decode => write!(f, "decode"),
            ErrorKind::Encode => write!(f, "encode"),
            ErrorKind::CursorStalled => write!(f, "cursor stalled"),
        }
    }
}

/// A failure status reported by the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    operation: &'static str,
    status: u16,
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
}

impl ServerError {
    /// Creates a server error for the given operation and status.
    pub fn new(operation: &'static str, status: u16) -> Self {
        Self {
            operation,
            status,
            code: None,
            message: None,
            request_id: None,
        }
    }

    pub(crate) fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    pub(crate) fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    pub(crate) fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the failing operation's name.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the service error code, when the body carried one.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Returns the service error message, when the body carried one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the request id from the response metadata.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed with status {}", self.operation, self.status)?;
        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request id {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServerError {}

/// The response payload did not map onto the operation's output type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    operation: &'static str,
    message: String,
}

impl DecodeError {
    /// Creates a decode error.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }

    /// Returns the operation whose response failed to decode.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Returns the decoder's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to decode {} response: {}",
            self.operation, self.message
        )
    }
}

impl std::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportErrorKind;
    use crate::validation::Checks;

    #[test]
    fn kind_matches_variant() {
        let validation = Error::from(Checks::new("X").min_value("A", Some(0), 1).finish());
        assert_eq!(validation.kind(), ErrorKind::Validation);

        let transport = Error::from(TransportError::new(TransportErrorKind::Io, "x"));
        assert_eq!(transport.kind(), ErrorKind::Transport);

        assert_eq!(
            Error::Cancelled(CancelReason::Cancelled).kind(),
            ErrorKind::Cancelled
        );
    }

    #[test]
    fn server_error_display_includes_metadata() {
        let err = ServerError::new("DescribeThings", 400)
            .with_code(Some("Throttling".to_string()))
            .with_message(Some("Rate exceeded".to_string()))
            .with_request_id(Some("req-1".to_string()));

        assert_eq!(
            err.to_string(),
            "DescribeThings failed with status 400 [Throttling]: Rate exceeded (request id req-1)"
        );
    }

    #[test]
    fn server_error_display_without_body() {
        let err = ServerError::new("Op", 503);
        assert_eq!(err.to_string(), "Op failed with status 503");
        assert_eq!(err.code(), None);
    }

    #[test]
    fn cursor_stalled_display() {
        let err = Error::CursorStalled {
            operation: "ListThings",
            cursor: "A".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ListThings pagination stalled: cursor 'A' did not advance"
        );
    }

    #[test]
    fn source_chains_to_inner_error() {
        use std::error::Error as _;

        let err = Error::from(DecodeError::new("Op", "missing field"));
        assert!(err.source().is_some());
        assert!(Error::Encode("x".to_string()).source().is_none());
    }
}
