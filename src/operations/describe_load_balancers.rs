use serde::{Deserialize, Serialize};

use crate::operation::{HttpMethod, Operation, OperationDescriptor, Paginated};
use crate::validation::{Checks, Validate, ValidationErrors};

/// Describes the specified load balancers, or all of them.
#[derive(Debug, Clone, Copy)]
pub struct DescribeLoadBalancers;

impl Operation for DescribeLoadBalancers {
    type Input = DescribeLoadBalancersInput;
    type Output = DescribeLoadBalancersOutput;
    const DESCRIPTOR: OperationDescriptor =
        OperationDescriptor::new("DescribeLoadBalancers", HttpMethod::Post, "/");
}

impl Paginated for DescribeLoadBalancers {
    type Item = LoadBalancer;

    fn cursor(input: &DescribeLoadBalancersInput) -> Option<&str> {
        input.marker.as_deref()
    }

    fn set_cursor(input: &mut DescribeLoadBalancersInput, cursor: Option<String>) {
        input.marker = cursor;
    }

    fn next_cursor(output: &DescribeLoadBalancersOutput) -> Option<&str> {
        output.next_marker.as_deref()
    }

    fn into_items(output: DescribeLoadBalancersOutput) -> Vec<LoadBalancer> {
        output.load_balancers
    }
}

/// Parameters of [`DescribeLoadBalancers`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeLoadBalancersInput {
    /// Continuation marker received from a previous call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Load balancer names (at most 20)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    /// Load balancer ARNs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_balancer_arns: Vec<String>,
    /// Maximum number of results per page (1 to 400)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

impl Validate for DescribeLoadBalancersInput {
    fn validate(&self) -> ValidationErrors {
        Checks::new("DescribeLoadBalancersInput")
            .max_items("Names", &self.names, 20)
            .each_min_len("Names", &self.names, 1)
            .each_min_len("LoadBalancerArns", &self.load_balancer_arns, 1)
            .min_value("PageSize", self.page_size, 1)
            .max_value("PageSize", self.page_size, 400)
            .finish()
    }
}

/// Result page of [`DescribeLoadBalancers`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeLoadBalancersOutput {
    /// Marker for the next page; absent or empty on the last page
    pub next_marker: Option<String>,
    /// The load balancers on this page
    pub load_balancers: Vec<LoadBalancer>,
}

/// A load balancer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoadBalancer {
    /// ARN
    pub load_balancer_arn: Option<String>,
    /// Name
    pub load_balancer_name: Option<String>,
    /// Public DNS name
    #[serde(rename = "DNSName")]
    pub dns_name: Option<String>,
    /// `internet-facing` or `internal`
    pub scheme: Option<String>,
    /// `application`, `network` or `gateway`
    #[serde(rename = "Type")]
    pub load_balancer_type: Option<String>,
    /// VPC the load balancer lives in
    pub vpc_id: Option<String>,
    /// Provisioning state
    pub state: Option<LoadBalancerState>,
}

/// Provisioning state of a [`LoadBalancer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoadBalancerState {
    /// `active`, `provisioning`, `failed`, ...
    pub code: Option<String>,
    /// Explanation for a failed state
    pub reason: Option<String>,
}
