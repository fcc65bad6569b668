//! Property-based tests for the limit gate.

use proptest::prelude::*;

use super::gate::evaluate;
use super::types::{LimitedResource, UsageLimits};
use crate::document::DocumentKind;

fn resource_strategy() -> impl Strategy<Value = LimitedResource> {
    prop_oneof![
        Just(LimitedResource::Client),
        prop::sample::select(DocumentKind::ALL.to_vec()).prop_map(LimitedResource::Document),
    ]
}

fn limits_strategy() -> impl Strategy<Value = UsageLimits> {
    prop::array::uniform6(0u64..50).prop_map(|l| UsageLimits {
        max_invoices: l[0],
        max_estimates: l[1],
        max_credit_notes: l[2],
        max_delivery_notes: l[3],
        max_purchase_orders: l[4],
        max_clients: l[5],
    })
}

proptest! {
    /// Active plans are never limited.
    #[test]
    fn prop_active_plan_always_ok(
        limits in limits_strategy(),
        resource in resource_strategy(),
        count in 0u64..1_000,
    ) {
        prop_assert!(evaluate(true, &limits, resource, count).ok);
    }

    /// On the free tier the max-th create succeeds and the (max+1)-th fails.
    #[test]
    fn prop_free_tier_boundary(
        limits in limits_strategy(),
        resource in resource_strategy(),
    ) {
        let ceiling = limits.ceiling_for(resource);
        if ceiling > 0 {
            prop_assert!(evaluate(false, &limits, resource, ceiling - 1).ok);
        }
        let denied = evaluate(false, &limits, resource, ceiling);
        prop_assert!(!denied.ok);
        prop_assert!(denied.message.is_some());
    }

    /// Denials are monotonic in the count.
    #[test]
    fn prop_denial_monotonic(
        limits in limits_strategy(),
        resource in resource_strategy(),
        count in 0u64..100,
        extra in 0u64..100,
    ) {
        if !evaluate(false, &limits, resource, count).ok {
            prop_assert!(!evaluate(false, &limits, resource, count + extra).ok);
        }
    }
}
