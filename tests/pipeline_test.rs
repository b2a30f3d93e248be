//! Integration tests for the execution pipeline.
//!
//! These tests drive full calls (validate, build, send, decode) against
//! the in-memory scripted transport.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use typed_ops::operations::{DescribeSslPolicies, DescribeSslPoliciesInput};
use typed_ops::{
    CancelReason, CancelScope, Client, ClientConfig, Error, ErrorKind, Request,
    ScriptedTransport, TransportError, TransportErrorKind, TransportResponse,
};

fn policies_page() -> TransportResponse {
    TransportResponse::json(
        200,
        &json!({
            "SslPolicies": [
                { "Name": "ELBSecurityPolicy-2016-08", "SslProtocols": ["TLSv1", "TLSv1.2"] }
            ]
        }),
    )
}

#[tokio::test]
async fn invalid_input_never_reaches_transport() {
    let client = Client::new(ScriptedTransport::new().repeat(policies_page()));
    let input = DescribeSslPoliciesInput {
        page_size: Some(0),
        ..Default::default()
    };

    let err = client
        .call::<DescribeSslPolicies>(Some(input), &CancelScope::new())
        .await
        .unwrap_err();

    match err {
        Error::Validation(errors) => {
            assert_eq!(errors.context(), "DescribeSslPoliciesInput");
            assert!(errors.contains("PageSize"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(client.transport().calls(), 0);
}

#[tokio::test]
async fn successful_call_decodes_output_and_metadata() {
    let transport = ScriptedTransport::new().reply(
        policies_page()
            .with_header("X-Amzn-RequestId", "req-42")
            .with_header("Date", "Fri, 16 Oct 2026 10:00:00 GMT"),
    );
    let client = Client::new(transport);

    let response = client
        .call::<DescribeSslPolicies>(None, &CancelScope::new())
        .await
        .expect("call succeeds");

    assert_eq!(response.metadata().status(), 200);
    assert_eq!(response.metadata().request_id(), Some("req-42"));
    assert!(response.metadata().header("date").is_some());
    let policy = &response.output().ssl_policies[0];
    assert_eq!(policy.name.as_deref(), Some("ELBSecurityPolicy-2016-08"));
    assert_eq!(client.transport().calls(), 1);
}

#[tokio::test]
async fn request_carries_descriptor_and_configured_headers() {
    let config = ClientConfig::default().with_user_agent("typed-ops-tests");
    let client = Client::with_config(ScriptedTransport::new().reply(policies_page()), config);
    let input = DescribeSslPoliciesInput::default()
        .with_names(["ELBSecurityPolicy-2016-08"])
        .with_page_size(20);

    client
        .call::<DescribeSslPolicies>(Some(input), &CancelScope::new())
        .await
        .unwrap();

    let sent = &client.transport().requests()[0];
    assert_eq!(sent.operation, "DescribeSSLPolicies");
    assert_eq!(sent.method.as_str(), "POST");
    assert_eq!(sent.path, "/");
    assert_eq!(sent.header("user-agent"), Some("typed-ops-tests"));
    assert_eq!(sent.header("content-type"), Some("application/json"));
    assert_eq!(
        sent.body_json().unwrap(),
        json!({ "Names": ["ELBSecurityPolicy-2016-08"], "PageSize": 20 })
    );
}

#[tokio::test]
async fn fallback_request_id_header_is_used() {
    let transport =
        ScriptedTransport::new().reply(policies_page().with_header("x-request-id", "fallback-1"));
    let client = Client::new(transport);

    let response = client
        .call::<DescribeSslPolicies>(None, &CancelScope::new())
        .await
        .unwrap();

    assert_eq!(response.metadata().request_id(), Some("fallback-1"));
}

#[tokio::test]
async fn cancelling_scope_aborts_in_flight_send() {
    let client = Client::new(ScriptedTransport::new().hang());
    let scope = CancelScope::new();

    let canceller = scope.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(2),
        client.call::<DescribeSslPolicies>(None, &scope),
    )
    .await
    .expect("cancellation unblocks the caller promptly");

    match result {
        Err(Error::Cancelled(reason)) => assert_eq!(reason, CancelReason::Cancelled),
        other => panic!("expected cancellation, got {:?}", other),
    }
    assert_eq!(client.transport().calls(), 1);
}

#[tokio::test]
async fn already_cancelled_scope_never_starts_exchange() {
    let client = Client::new(ScriptedTransport::new().repeat(policies_page()));
    let scope = CancelScope::new();
    scope.cancel();

    let err = client
        .call::<DescribeSslPolicies>(None, &scope)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(client.transport().calls(), 0);
}

#[tokio::test]
async fn caller_deadline_expires() {
    let client = Client::new(ScriptedTransport::new().hang());
    let scope = CancelScope::with_timeout(Duration::from_millis(20));

    let err = client
        .call::<DescribeSslPolicies>(None, &scope)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Cancelled(CancelReason::DeadlineExceeded)
    ));
}

#[tokio::test]
async fn configured_default_timeout_bounds_every_send() {
    let config = ClientConfig::default().with_default_timeout(Duration::from_millis(20));
    let client = Client::with_config(ScriptedTransport::new().hang(), config);

    let err = client
        .call::<DescribeSslPolicies>(None, &CancelScope::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Cancelled(CancelReason::DeadlineExceeded)
    ));
}

#[tokio::test]
async fn server_error_surfaces_status_code_and_request_id() {
    let transport = ScriptedTransport::new().reply(
        TransportResponse::json(
            400,
            &json!({ "__type": "elasticloadbalancing#SSLPolicyNotFound", "message": "unknown policy" }),
        )
        .with_header("x-amzn-requestid", "req-err"),
    );
    let client = Client::new(transport);

    let err = client
        .call::<DescribeSslPolicies>(None, &CancelScope::new())
        .await
        .unwrap_err();

    match err {
        Error::Server(server) => {
            assert_eq!(server.status(), 400);
            assert_eq!(server.code(), Some("SSLPolicyNotFound"));
            assert_eq!(server.message(), Some("unknown policy"));
            assert_eq!(server.request_id(), Some("req-err"));
            assert_eq!(server.operation(), "DescribeSSLPolicies");
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn transport_failure_is_not_retried() {
    let transport = ScriptedTransport::new()
        .fail(TransportError::new(
            TransportErrorKind::Connect,
            "connection refused",
        ))
        .repeat(policies_page());
    let client = Client::new(transport);

    let err = client
        .call::<DescribeSslPolicies>(None, &CancelScope::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(client.transport().calls(), 1);
}

#[tokio::test]
async fn mismatched_payload_is_a_decode_error() {
    let transport = ScriptedTransport::new()
        .reply(TransportResponse::json(200, &json!({ "SslPolicies": "not-a-list" })));
    let client = Client::new(transport);

    let err = client
        .call::<DescribeSslPolicies>(None, &CancelScope::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.to_string().contains("DescribeSSLPolicies"));
}

#[tokio::test]
async fn empty_success_body_decodes_to_empty_output() {
    let client = Client::new(ScriptedTransport::new().reply(TransportResponse::new(200, "")));

    let response = client
        .call::<DescribeSslPolicies>(None, &CancelScope::new())
        .await
        .unwrap();

    assert!(response.output().ssl_policies.is_empty());
    assert!(response.output().next_marker.is_none());
}

#[tokio::test]
async fn prebuilt_request_is_sent_as_is() {
    let client = Client::new(ScriptedTransport::new().reply(policies_page()));
    let request = Request::<DescribeSslPolicies>::from_input(Some(
        DescribeSslPoliciesInput::default().with_page_size(3),
    ))
    .unwrap();

    client.send(request, &CancelScope::new()).await.unwrap();

    let body = client.transport().requests()[0].body_json().unwrap();
    assert_eq!(body["PageSize"], 3);
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let client = Arc::new(Client::new(
        ScriptedTransport::new().repeat(policies_page()),
    ));
    let scope = CancelScope::new();

    let (a, b) = tokio::join!(
        client.call::<DescribeSslPolicies>(None, &scope),
        client.call::<DescribeSslPolicies>(None, &scope),
    );

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(client.transport().calls(), 2);
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn failed_call_logs_state_inside_operation_span() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let client = Client::new(ScriptedTransport::new().reply(TransportResponse::new(503, "")));

    let err = client
        .call::<DescribeSslPolicies>(None, &CancelScope::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    let output = logs.contents();
    assert!(output.contains("failed (server)"), "missing failure line: {}", output);
    assert!(output.contains("sending POST /"), "missing send line: {}", output);
    assert!(output.contains("operation{"), "missing operation span: {}", output);
    assert!(output.contains("DescribeSSLPolicies"));
}

#[tokio::test]
async fn unbounded_default_timeout_does_not_overflow() {
    let config = ClientConfig::default().with_default_timeout(Duration::MAX);
    let client = Client::with_config(ScriptedTransport::new().reply(policies_page()), config);

    let response = client
        .call::<DescribeSslPolicies>(None, &CancelScope::with_timeout(Duration::MAX))
        .await
        .unwrap();

    assert_eq!(response.metadata().status(), 200);
}
