//! Typed operation client for paginated remote APIs.
//!
//! This crate describes each remote operation once, as a type, and runs
//! every call through the same lifecycle:
//! - **Validation**: typed inputs are checked against every declared
//!   constraint, and all violations are reported together
//! - **Request building**: a [`Request`] can only be built from a
//!   [`Validated`] input, so nothing unvalidated reaches the wire
//! - **Execution**: [`Client::send`] makes exactly one [`Transport`]
//!   exchange under a caller-owned [`CancelScope`]
//! - **Pagination**: a [`Paginator`] follows the server's opaque cursor
//!   until it runs out, and fails loudly if the cursor stops advancing
//!
//! # Core Types
//!
//! - [`OperationDescriptor`]: static name, method and path of an operation
//! - [`Operation`] / [`Paginated`]: per-operation input, output and cursor access
//! - [`ValidationErrors`]: the complete set of violations for one input
//! - [`Response`]: decoded output plus [`ResponseMetadata`]
//! - [`Error`]: validation, cancellation, transport, server, decode and
//!   stalled-cursor failures
//!
//! # Examples
//!
//! ```
//! use typed_ops::operations::{DescribeSslPolicies, DescribeSslPoliciesInput};
//! use typed_ops::{CancelScope, Client, ErrorKind, ScriptedTransport};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! # rt.block_on(async {
//! let client = Client::new(ScriptedTransport::new());
//!
//! // Invalid input never reaches the transport
//! let input = DescribeSslPoliciesInput::default().with_page_size(0);
//! let err = client
//!     .call::<DescribeSslPolicies>(Some(input), &CancelScope::new())
//!     .await
//!     .unwrap_err();
//!
//! assert_eq!(err.kind(), ErrorKind::Validation);
//! assert_eq!(client.transport().calls(), 0);
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cancel;
mod client;
mod config;
mod error;
mod logging;
mod operation;
pub mod operations;
mod paginator;
mod request;
mod response;
pub mod telemetry;
mod transport;
mod validation;

pub use cancel::{CancelReason, CancelScope};
pub use client::{CallState, Client};
pub use config::{
    ClientConfig, PaginationConfig, DEFAULT_REQUEST_ID_HEADER, FALLBACK_REQUEST_ID_HEADER,
};
pub use error::{DecodeError, Error, ErrorKind, ServerError};
pub use logging::OpLog;
pub use operation::{HttpMethod, Operation, OperationDescriptor, Paginated};
pub use paginator::Paginator;
pub use request::Request;
pub use response::{Response, ResponseMetadata};
pub use transport::{
    Headers, ScriptedTransport, Transport, TransportError, TransportErrorKind, TransportRequest,
    TransportResponse,
};
pub use validation::{
    validate_input, Checks, FieldViolation, Validate, Validated, ValidationErrors, ViolationKind,
};
