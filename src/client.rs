use std::fmt;

use tracing::Instrument;

use crate::cancel::CancelScope;
use crate::config::{ClientConfig, FALLBACK_REQUEST_ID_HEADER};
use crate::error::{DecodeError, Error, ErrorKind, ServerError};
use crate::logging::OpLog;
use crate::operation::{Operation, Paginated};
use crate::paginator::Paginator;
use crate::request::Request;
use crate::response::{Response, ResponseMetadata};
use crate::transport::{find_header, Headers, Transport, TransportResponse};

/// Lifecycle of a single send.
///
/// ```text
/// Built --> Sending --> Succeeded
///                   \-> Failed(kind)
/// ```
///
/// A call is terminal on its first resolution and is never resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// The request is bound and encoded
    Built,
    /// The exchange is in flight
    Sending,
    /// The output decoded successfully
    Succeeded,
    /// The call failed
    Failed(ErrorKind),
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallState::Built => write!(f, "built"),
            CallState::Sending => write!(f, "sending"),
            CallState::Succeeded => write!(f, "succeeded"),
            CallState::Failed(kind) => write!(f, "failed ({})", kind),
        }
    }
}

/// Executes typed operations over a [`Transport`].
///
/// The client holds no per-call state: inputs, requests and responses are
/// owned by each invocation, so one client can serve any number of
/// concurrent calls and pagination sequences.
///
/// # Examples
///
/// ```
/// use typed_ops::operations::DescribeSslPolicies;
/// use typed_ops::{CancelScope, Client, ScriptedTransport, TransportResponse};
///
/// # let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
/// # rt.block_on(async {
/// let transport = ScriptedTransport::new().reply(TransportResponse::json(
///     200,
///     &serde_json::json!({ "SslPolicies": [{ "Name": "ELBSecurityPolicy-2016-08" }] }),
/// ));
/// let client = Client::new(transport);
///
/// let response = client
///     .call::<DescribeSslPolicies>(None, &CancelScope::new())
///     .await
///     .unwrap();
///
/// assert_eq!(response.metadata().status(), 200);
/// assert_eq!(response.output().ssl_policies.len(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct Client<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> Client<T> {
    /// Creates a client with the default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Creates a client with an explicit configuration.
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validates `input`, builds the request and sends it.
    ///
    /// `None` is treated as the operation's empty input.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` without touching the transport when the
    /// input is invalid, otherwise any error of [`send`](Self::send).
    pub async fn call<O: Operation>(
        &self,
        input: Option<O::Input>,
        scope: &CancelScope,
    ) -> Result<Response<O::Output>, Error> {
        let request = Request::<O>::from_input(input)?;
        self.send(request, scope).await
    }

    /// Sends a built request under `scope`.
    ///
    /// Exactly one transport exchange is started; nothing is retried. If
    /// the scope is cancelled or expires first, the in-flight exchange is
    /// dropped and the call fails with `Error::Cancelled`.
    ///
    /// # Errors
    ///
    /// - `Error::Cancelled` when the scope ends before the exchange
    /// - `Error::Transport` when the exchange itself fails
    /// - `Error::Server` for any non-2xx status
    /// - `Error::Decode` when the payload does not match `O::Output`
    pub async fn send<O: Operation>(
        &self,
        request: Request<O>,
        scope: &CancelScope,
    ) -> Result<Response<O::Output>, Error> {
        self.send_logged(request, scope, OpLog::new(O::DESCRIPTOR.name()))
            .await
    }

    /// Starts a lazy pagination sequence from `input`'s cursor.
    ///
    /// Nothing is sent until the first page is requested.
    pub fn paginate<O: Paginated>(&self, input: Option<O::Input>) -> Paginator<'_, T, O> {
        Paginator::new(self, input.unwrap_or_default())
    }

    pub(crate) async fn send_logged<O: Operation>(
        &self,
        request: Request<O>,
        scope: &CancelScope,
        log: OpLog,
    ) -> Result<Response<O::Output>, Error> {
        let result = self
            .exchange(request, scope, log)
            .instrument(log.span())
            .await;
        match &result {
            Ok(response) => log.debug(format_args!(
                "{} (status {})",
                CallState::Succeeded,
                response.metadata().status()
            )),
            Err(e) => log.warn(format_args!("{}: {}", CallState::Failed(e.kind()), e)),
        }
        result
    }

    async fn exchange<O: Operation>(
        &self,
        request: Request<O>,
        scope: &CancelScope,
        log: OpLog,
    ) -> Result<Response<O::Output>, Error> {
        let wire = request.to_transport(self.request_headers())?;
        log.debug(format_args!("{} ({} bytes)", CallState::Built, wire.body.len()));

        let scope = match self.config.default_timeout() {
            Some(timeout) => scope.child_with_timeout(timeout),
            None => scope.clone(),
        };

        log.debug(format_args!(
            "{} {} {}",
            CallState::Sending,
            wire.method,
            wire.path
        ));
        let raw = tokio::select! {
            biased;
            reason = scope.cancelled() => return Err(Error::Cancelled(reason)),
            result = self.transport.send(wire) => result?,
        };

        self.decode::<O>(raw)
    }

    fn request_headers(&self) -> Headers {
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        if let Some(agent) = &self.config.user_agent {
            headers.push(("user-agent".to_string(), agent.clone()));
        }
        headers
    }

    fn decode<O: Operation>(&self, raw: TransportResponse) -> Result<Response<O::Output>, Error> {
        let operation = O::DESCRIPTOR.name();
        let request_id = find_header(&raw.headers, &self.config.request_id_header)
            .or_else(|| find_header(&raw.headers, FALLBACK_REQUEST_ID_HEADER))
            .map(str::to_string);

        if !(200..300).contains(&raw.status) {
            let (code, message) = parse_error_body(&raw.body);
            return Err(ServerError::new(operation, raw.status)
                .with_code(code)
                .with_message(message)
                .with_request_id(request_id)
                .into());
        }

        // An empty success body decodes as an empty document.
        let body: &[u8] = if raw.body.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &raw.body
        };
        let output: O::Output =
            serde_json::from_slice(body).map_err(|e| DecodeError::new(operation, e.to_string()))?;

        Ok(Response::new(
            output,
            ResponseMetadata::new(raw.status, request_id, raw.headers),
        ))
    }
}

/// Extracts a service error code and message from a JSON error body.
///
/// Understands flat `{"code", "message"}` documents, the `__type` field
/// (keeping only the part after `#`) and a nested `Error` object.
fn parse_error_body(body: &[u8]) -> (Option<String>, Option<String>) {
    let Ok(document) = serde_json::from_slice::<serde_json::Value>(body) else {
        return (None, None);
    };
    let root = document.get("Error").unwrap_or(&document);

    let field = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| root.get(*name).and_then(serde_json::Value::as_str))
            .map(str::to_string)
    };

    let code = field(&["code", "Code", "__type"])
        .map(|c| c.rsplit('#').next().unwrap_or_default().to_string());
    let message = field(&["message", "Message"]);
    (code, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_state_display() {
        assert_eq!(CallState::Built.to_string(), "built");
        assert_eq!(
            CallState::Failed(ErrorKind::Server).to_string(),
            "failed (server)"
        );
    }

    #[test]
    fn error_body_flat_fields() {
        let (code, message) =
            parse_error_body(br#"{"code":"ValidationError","message":"bad marker"}"#);
        assert_eq!(code.as_deref(), Some("ValidationError"));
        assert_eq!(message.as_deref(), Some("bad marker"));
    }

    #[test]
    fn error_body_type_prefix_is_stripped() {
        let (code, _) = parse_error_body(
            br#"{"__type":"com.amazonaws.elasticloadbalancing#SSLPolicyNotFound"}"#,
        );
        assert_eq!(code.as_deref(), Some("SSLPolicyNotFound"));
    }

    #[test]
    fn error_body_nested_error_object() {
        let (code, message) =
            parse_error_body(br#"{"Error":{"Code":"Throttling","Message":"Rate exceeded"}}"#);
        assert_eq!(code.as_deref(), Some("Throttling"));
        assert_eq!(message.as_deref(), Some("Rate exceeded"));
    }

    #[test]
    fn error_body_not_json() {
        assert_eq!(parse_error_body(b"<html>502</html>"), (None, None));
    }
}
