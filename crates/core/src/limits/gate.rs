//! The free-tier decision table.
//!
//! | plan active | count vs ceiling | result  |
//! |-------------|------------------|---------|
//! | yes         | any              | allowed |
//! | no          | `count < limit`  | allowed |
//! | no          | `count >= limit` | denied  |
//!
//! Callers that cannot load the inputs must treat the check as allowed.

use super::types::{LimitDecision, LimitedResource, ResourceUsage, UsageLimits};

/// Decides whether one more `resource` may be created.
#[must_use]
pub fn evaluate(
    plan_active: bool,
    limits: &UsageLimits,
    resource: LimitedResource,
    current_count: u64,
) -> LimitDecision {
    if plan_active {
        return LimitDecision::allowed();
    }

    let ceiling = limits.ceiling_for(resource);
    if current_count < ceiling {
        LimitDecision::allowed()
    } else {
        LimitDecision::denied(upgrade_message(resource, ceiling))
    }
}

/// The prompt shown when the free tier is exhausted.
#[must_use]
pub fn upgrade_message(resource: LimitedResource, ceiling: u64) -> String {
    format!(
        "You've reached the free plan limit of {ceiling} {}. Upgrade to Professional to create more.",
        resource.plural_noun()
    )
}

/// Builds a usage line for the billing page.
#[must_use]
pub fn usage(
    plan_active: bool,
    limits: &UsageLimits,
    resource: LimitedResource,
    used: u64,
) -> ResourceUsage {
    ResourceUsage {
        resource: resource.plural_noun().to_string(),
        used,
        limit: (!plan_active).then(|| limits.ceiling_for(resource)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;
    use crate::limits::DEFAULT_FREE_LIMIT;

    #[test]
    fn test_free_tier_allows_up_to_ceiling() {
        let limits = UsageLimits::default();
        let resource = LimitedResource::Document(DocumentKind::Invoice);

        assert!(evaluate(false, &limits, resource, 0).ok);
        assert!(evaluate(false, &limits, resource, DEFAULT_FREE_LIMIT - 1).ok);

        let denied = evaluate(false, &limits, resource, DEFAULT_FREE_LIMIT);
        assert!(!denied.ok);
        assert_eq!(
            denied.message.as_deref(),
            Some("You've reached the free plan limit of 2 invoices. Upgrade to Professional to create more.")
        );
    }

    #[test]
    fn test_active_plan_always_allowed() {
        let limits = UsageLimits::default();
        let decision = evaluate(true, &limits, LimitedResource::Client, 10_000);
        assert_eq!(decision, LimitDecision::allowed());
    }

    #[test]
    fn test_override_ceiling() {
        let limits = UsageLimits {
            max_clients: 5,
            ..UsageLimits::default()
        };
        assert!(evaluate(false, &limits, LimitedResource::Client, 4).ok);
        assert!(!evaluate(false, &limits, LimitedResource::Client, 5).ok);
        assert!(
            !evaluate(
                false,
                &limits,
                LimitedResource::Document(DocumentKind::Estimate),
                2
            )
            .ok
        );
    }

    #[test]
    fn test_zero_ceiling_blocks_everything() {
        let limits = UsageLimits {
            max_purchase_orders: 0,
            ..UsageLimits::default()
        };
        let decision = evaluate(
            false,
            &limits,
            LimitedResource::Document(DocumentKind::PurchaseOrder),
            0,
        );
        assert!(!decision.ok);
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(LimitDecision::allowed()).unwrap();
        assert_eq!(json, serde_json::json!({ "ok": true }));

        let json = serde_json::to_value(LimitDecision::denied("upgrade")).unwrap();
        assert_eq!(json, serde_json::json!({ "ok": false, "message": "upgrade" }));
    }

    #[test]
    fn test_usage_hides_limit_on_active_plan() {
        let limits = UsageLimits::default();
        let free = usage(false, &limits, LimitedResource::Client, 1);
        assert_eq!(free.limit, Some(DEFAULT_FREE_LIMIT));
        assert_eq!(free.resource, "clients");

        let paid = usage(true, &limits, LimitedResource::Client, 40);
        assert_eq!(paid.limit, None);
        assert_eq!(paid.used, 40);
    }

    #[test]
    fn test_all_resources() {
        let all = LimitedResource::all();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], LimitedResource::Client);
    }
}
