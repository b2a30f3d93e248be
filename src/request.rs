use std::fmt;
use std::marker::PhantomData;

use crate::error::Error;
use crate::operation::{Operation, OperationDescriptor, Paginated};
use crate::transport::{Headers, TransportRequest};
use crate::validation::{validate_input, Validated, ValidationErrors};

/// A validated input bound to its operation, ready to send.
///
/// A `Request` is transient: it lives for one send and is never reused
/// across pages. It can only be built from a [`Validated`] input, so the
/// pipeline never receives an input that skipped validation.
///
/// # Examples
///
/// ```
/// use typed_ops::operations::{DescribeSslPolicies, DescribeSslPoliciesInput};
/// use typed_ops::Request;
///
/// let omitted = Request::<DescribeSslPolicies>::from_input(None).unwrap();
/// let empty =
///     Request::<DescribeSslPolicies>::from_input(Some(DescribeSslPoliciesInput::default()))
///         .unwrap();
///
/// assert_eq!(omitted, empty);
/// assert_eq!(omitted.descriptor().name(), "DescribeSSLPolicies");
/// ```
pub struct Request<O: Operation> {
    input: O::Input,
    _operation: PhantomData<fn() -> O>,
}

impl<O: Operation> Request<O> {
    /// Binds a validated input to the operation. Pure construction.
    pub fn build(input: Validated<O::Input>) -> Self {
        Self {
            input: input.into_inner(),
            _operation: PhantomData,
        }
    }

    /// Validates an optional input and builds a request from it.
    ///
    /// `None` is replaced by the canonical empty input, so every operation
    /// can be called without parameters.
    ///
    /// # Errors
    ///
    /// Returns every constraint violation of the (possibly defaulted) input.
    pub fn from_input(input: Option<O::Input>) -> Result<Self, ValidationErrors> {
        let validated = validate_input(input.unwrap_or_default())?;
        Ok(Self::build(validated))
    }

    /// Returns the operation's descriptor.
    pub fn descriptor(&self) -> OperationDescriptor {
        O::DESCRIPTOR
    }

    /// Returns the bound input.
    pub fn input(&self) -> &O::Input {
        &self.input
    }

    /// Serializes the request for the transport.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encode` if the input cannot be serialized.
    pub fn to_transport(&self, headers: Headers) -> Result<TransportRequest, Error> {
        let body = serde_json::to_vec(&self.input).map_err(|e| Error::Encode(e.to_string()))?;
        Ok(TransportRequest {
            operation: O::DESCRIPTOR.name(),
            method: O::DESCRIPTOR.method(),
            path: O::DESCRIPTOR.path(),
            headers,
            body,
        })
    }
}

impl<O: Paginated> Request<O> {
    /// Returns the cursor this request will send.
    pub fn cursor(&self) -> Option<&str> {
        O::cursor(&self.input)
    }

    /// Builds a fresh request for `base` positioned at `cursor`.
    ///
    /// # Errors
    ///
    /// Returns the violations of the resulting input, if any.
    pub fn with_cursor(base: &O::Input, cursor: Option<String>) -> Result<Self, ValidationErrors> {
        let mut input = base.clone();
        O::set_cursor(&mut input, cursor);
        Self::from_input(Some(input))
    }
}

impl<O: Operation> Clone for Request<O> {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            _operation: PhantomData,
        }
    }
}

impl<O: Operation> PartialEq for Request<O> {
    fn eq(&self, other: &Self) -> bool {
        self.input == other.input
    }
}

impl<O: Operation> fmt::Debug for Request<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("operation", &O::DESCRIPTOR.name())
            .field("input", &self.input)
            .finish()
    }
}
