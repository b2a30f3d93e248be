//! Concrete remote operations and their registration table.
//!
//! Each operation is a zero-sized marker implementing [`Operation`] (and
//! [`Paginated`] where the API pages its results), next to its typed input
//! and output. Adding an operation means adding a module here and a line
//! to [`REGISTRY`].
//!
//! [`Operation`]: crate::Operation
//! [`Paginated`]: crate::Paginated

mod describe_load_balancers;
mod describe_ssl_policies;

pub use describe_load_balancers::{
    DescribeLoadBalancers, DescribeLoadBalancersInput, DescribeLoadBalancersOutput, LoadBalancer,
    LoadBalancerState,
};
pub use describe_ssl_policies::{
    Cipher, DescribeSslPolicies, DescribeSslPoliciesInput, DescribeSslPoliciesOutput, SslPolicy,
};

use crate::operation::{Operation, OperationDescriptor};

/// Descriptors of every operation this crate knows about.
pub static REGISTRY: &[OperationDescriptor] = &[
    <DescribeSslPolicies as Operation>::DESCRIPTOR,
    <DescribeLoadBalancers as Operation>::DESCRIPTOR,
];

/// Looks up a registered descriptor by operation name.
///
/// # Examples
///
/// ```
/// use typed_ops::operations::lookup;
/// use typed_ops::HttpMethod;
///
/// let descriptor = lookup("DescribeSSLPolicies").unwrap();
/// assert_eq!(descriptor.method(), HttpMethod::Post);
/// assert!(lookup("DeleteEverything").is_none());
/// ```
pub fn lookup(name: &str) -> Option<&'static OperationDescriptor> {
    REGISTRY.iter().find(|d| d.name() == name)
}
