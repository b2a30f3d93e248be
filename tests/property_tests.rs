//! Integration property tests for typed-ops.
//!
//! These tests validate cross-module invariants of validation, request
//! building and telemetry mapping using property-based testing.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use proptest::prelude::*;
use typed_ops::operations::{
    DescribeLoadBalancers, DescribeLoadBalancersInput, DescribeSslPolicies,
    DescribeSslPoliciesInput,
};
use typed_ops::telemetry::Source;
use typed_ops::{validate_input, Request, Validate};

// Strategy: Generate arbitrary IP addresses of either family
fn arb_ip() -> impl Strategy<Value = IpAddr> {
    prop_oneof![
        any::<u32>().prop_map(|v| IpAddr::V4(Ipv4Addr::from(v))),
        any::<u128>().prop_map(|v| IpAddr::V6(Ipv6Addr::from(v))),
    ]
}

proptest! {
    /// Property: PageSize is valid exactly when it is absent or at least one
    #[test]
    fn proptest_page_size_lower_bound(page_size in prop::option::of(any::<i64>())) {
        let input = DescribeSslPoliciesInput {
            page_size,
            ..Default::default()
        };

        let errors = input.validate();

        match page_size {
            Some(n) if n < 1 => {
                prop_assert_eq!(errors.len(), 1);
                prop_assert!(errors.contains("PageSize"));
            }
            _ => prop_assert!(errors.is_empty()),
        }
    }

    /// Property: validation reports every violated constraint, not just the first
    #[test]
    fn proptest_violations_accumulate(
        blank_names in 0usize..5,
        good_names in 0usize..5,
        page_size in prop_oneof![-100i64..1, 401i64..1000],
    ) {
        let mut names: Vec<String> = (0..good_names).map(|i| format!("lb-{}", i)).collect();
        names.extend(std::iter::repeat(String::new()).take(blank_names));
        let input = DescribeLoadBalancersInput {
            names,
            page_size: Some(page_size),
            ..Default::default()
        };

        let errors = validate_input(input).unwrap_err();

        prop_assert_eq!(errors.len(), blank_names + 1);
        prop_assert!(errors.contains("PageSize"));
        prop_assert_eq!(errors.context(), "DescribeLoadBalancersInput");
    }

    /// Property: a request is never built from invalid input
    #[test]
    fn proptest_invalid_input_never_builds(page_size in i64::MIN..1) {
        let input = DescribeSslPoliciesInput::default().with_page_size(page_size);
        prop_assert!(Request::<DescribeSslPolicies>::from_input(Some(input)).is_err());
    }

    /// Property: building a request leaves the validated input untouched
    #[test]
    fn proptest_built_request_preserves_input(
        marker in prop::option::of("[A-Za-z0-9+/=]{1,24}"),
        page_size in prop::option::of(1i64..=400),
    ) {
        let input = DescribeLoadBalancersInput {
            marker,
            page_size,
            ..Default::default()
        };

        let request = Request::<DescribeLoadBalancers>::from_input(Some(input.clone())).unwrap();

        prop_assert_eq!(request.input(), &input);
        prop_assert_eq!(request.cursor(), input.marker.as_deref());
    }

    /// Property: telemetry maps exactly the fields that are set
    #[test]
    fn proptest_source_maps_only_set_fields(
        domain in prop_oneof![Just(String::new()), "[a-z]{1,10}(\\.[a-z]{2,5}){0,2}"],
        ip in prop::option::of(arb_ip()),
        port in -10i64..70000,
    ) {
        let source = Source { domain: domain.clone(), ip, port };

        let fields = source.fields();

        let expected = usize::from(!domain.is_empty()) + usize::from(ip.is_some()) + usize::from(port > 0);
        prop_assert_eq!(fields.len(), expected);
        if let Some(ip) = ip {
            let mapped = fields.get("ip").and_then(|v| v.as_str()).unwrap();
            prop_assert_eq!(mapped.parse::<IpAddr>().unwrap(), ip.to_canonical());
        }
        if port > 0 {
            prop_assert_eq!(fields.get("port").and_then(|v| v.as_i64()), Some(port));
        }
    }
}

#[test]
fn absent_input_equals_default_input() {
    let absent = Request::<DescribeSslPolicies>::from_input(None).unwrap();
    let default =
        Request::<DescribeSslPolicies>::from_input(Some(DescribeSslPoliciesInput::default()))
            .unwrap();

    assert_eq!(absent, default);
}
