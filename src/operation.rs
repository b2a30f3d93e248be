use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::validation::Validate;

/// HTTP method used by a remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
    /// HTTP HEAD method
    Head,
}

impl HttpMethod {
    /// Returns the canonical upper-case method name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static identity of one remote operation.
///
/// Descriptors are process-wide constants: they are created at compile time
/// and never mutated. The name doubles as the correlation key in logs.
///
/// # Examples
///
/// ```
/// use typed_ops::{HttpMethod, OperationDescriptor};
///
/// const LIST_THINGS: OperationDescriptor =
///     OperationDescriptor::new("ListThings", HttpMethod::Get, "/things");
///
/// assert_eq!(LIST_THINGS.name(), "ListThings");
/// assert_eq!(LIST_THINGS.to_string(), "ListThings (GET /things)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    name: &'static str,
    method: HttpMethod,
    path: &'static str,
}

impl OperationDescriptor {
    /// Creates a descriptor.
    pub const fn new(name: &'static str, method: HttpMethod, path: &'static str) -> Self {
        Self { name, method, path }
    }

    /// Returns the operation name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the request path.
    pub const fn path(&self) -> &'static str {
        self.path
    }
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.method, self.path)
    }
}

/// A remote operation shape: typed input, typed output and a descriptor.
///
/// Each remote operation is a zero-sized marker type implementing this
/// trait once; the request, pipeline and paginator are generic over it.
pub trait Operation {
    /// Typed request parameters. `Default` is the canonical empty input.
    type Input: Validate
        + Serialize
        + Default
        + Clone
        + fmt::Debug
        + PartialEq
        + Send
        + Sync
        + 'static;
    /// Typed response payload.
    type Output: DeserializeOwned + Send + 'static;
    /// Static identity of the operation.
    const DESCRIPTOR: OperationDescriptor;
}

/// An operation whose results are split across pages by an opaque cursor.
///
/// The server is authoritative for the cursor: the client never computes
/// offsets, it only copies `next_cursor` from one page into the next input.
pub trait Paginated: Operation {
    /// A single record of a page.
    type Item: Send + 'static;

    /// Returns the cursor carried by an input.
    fn cursor(input: &Self::Input) -> Option<&str>;

    /// Replaces the cursor carried by an input.
    fn set_cursor(input: &mut Self::Input, cursor: Option<String>);

    /// Returns the continuation cursor of a page. `None` or an empty string
    /// both mean there are no further pages.
    fn next_cursor(output: &Self::Output) -> Option<&str>;

    /// Consumes a page and returns its records.
    fn into_items(output: Self::Output) -> Vec<Self::Item>;
}
