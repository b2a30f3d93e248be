use crate::transport::{find_header, Headers};

/// Transport-level metadata of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    status: u16,
    request_id: Option<String>,
    headers: Headers,
}

impl ResponseMetadata {
    /// Creates metadata from raw transport values.
    pub fn new(status: u16, request_id: Option<String>, headers: Headers) -> Self {
        Self {
            status,
            request_id,
            headers,
        }
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the server-assigned request id, if one was sent.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns all raw headers in the order received.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A decoded output bundled with its transport metadata.
///
/// The envelope keeps status, headers and request id available without
/// mixing them into the operation's output type.
///
/// # Examples
///
/// ```
/// use typed_ops::{Response, ResponseMetadata};
///
/// let response = Response::new(
///     vec!["record"],
///     ResponseMetadata::new(200, Some("req-1".to_string()), Vec::new()),
/// );
///
/// assert_eq!(response.metadata().request_id(), Some("req-1"));
/// assert_eq!(response.into_output(), vec!["record"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<T> {
    output: T,
    metadata: ResponseMetadata,
}

impl<T> Response<T> {
    /// Bundles an output with its metadata.
    pub fn new(output: T, metadata: ResponseMetadata) -> Self {
        Self { output, metadata }
    }

    /// Returns the decoded output.
    pub fn output(&self) -> &T {
        &self.output
    }

    /// Returns the transport metadata.
    pub fn metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }

    /// Consumes the envelope and returns the output.
    pub fn into_output(self) -> T {
        self.output
    }

    /// Consumes the envelope and returns output and metadata.
    pub fn into_parts(self) -> (T, ResponseMetadata) {
        (self.output, self.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_header_lookup_ignores_case() {
        let metadata = ResponseMetadata::new(
            200,
            None,
            vec![("Content-Type".to_string(), "application/json".to_string())],
        );

        assert_eq!(metadata.header("content-type"), Some("application/json"));
        assert_eq!(metadata.headers().len(), 1);
        assert_eq!(metadata.request_id(), None);
    }

    #[test]
    fn into_parts_returns_both_halves() {
        let response = Response::new(7, ResponseMetadata::new(201, None, Vec::new()));

        let (output, metadata) = response.into_parts();

        assert_eq!(output, 7);
        assert_eq!(metadata.status(), 201);
    }
}
