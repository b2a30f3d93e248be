use serde::{Deserialize, Serialize};

use crate::operation::{HttpMethod, Operation, OperationDescriptor, Paginated};
use crate::validation::{Checks, Validate, ValidationErrors};

/// Describes the specified policies, or all policies, used for SSL
/// negotiation.
#[derive(Debug, Clone, Copy)]
pub struct DescribeSslPolicies;

impl Operation for DescribeSslPolicies {
    type Input = DescribeSslPoliciesInput;
    type Output = DescribeSslPoliciesOutput;
    const DESCRIPTOR: OperationDescriptor =
        OperationDescriptor::new("DescribeSSLPolicies", HttpMethod::Post, "/");
}

impl Paginated for DescribeSslPolicies {
    type Item = SslPolicy;

    fn cursor(input: &DescribeSslPoliciesInput) -> Option<&str> {
        input.marker.as_deref()
    }

    fn set_cursor(input: &mut DescribeSslPoliciesInput, cursor: Option<String>) {
        input.marker = cursor;
    }

    fn next_cursor(output: &DescribeSslPoliciesOutput) -> Option<&str> {
        output.next_marker.as_deref()
    }

    fn into_items(output: DescribeSslPoliciesOutput) -> Vec<SslPolicy> {
        output.ssl_policies
    }
}

/// Parameters of [`DescribeSslPolicies`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeSslPoliciesInput {
    /// Continuation marker received from a previous call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Names of the policies to describe; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    /// Maximum number of results per page (at least 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

impl DescribeSslPoliciesInput {
    /// Restricts the call to the named policies.
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

impl Validate for DescribeSslPoliciesInput {
    fn validate(&self) -> ValidationErrors {
        Checks::new("DescribeSslPoliciesInput")
            .min_value("PageSize", self.page_size, 1)
            .finish()
    }
}

/// Result page of [`DescribeSslPolicies`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeSslPoliciesOutput {
    /// Marker for the next page; absent or empty on the last page
    pub next_marker: Option<String>,
    /// The policies on this page
    pub ssl_policies: Vec<SslPolicy>,
}

/// A policy used for SSL negotiation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SslPolicy {
    /// Policy name
    pub name: Option<String>,
    /// Enabled protocols, e.g. `TLSv1.2`
    pub ssl_protocols: Vec<String>,
    /// Enabled ciphers in priority order
    pub ciphers: Vec<Cipher>,
    /// Load balancer types the policy applies to
    pub supported_load_balancer_types: Vec<String>,
}

/// A cipher enabled by an [`SslPolicy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Cipher {
    /// Cipher name
    pub name: Option<String>,
    /// Priority; lower numbers are preferred
    pub priority: Option<i64>,
}
