//! Free-tier usage limits.
//!
//! Users without an active plan may own a fixed number of clients and of
//! each document kind. The gate is a pure function of the plan state, the
//! ceilings and the current count; loading those is the caller's job.

pub mod gate;
pub mod types;

#[cfg(test)]
mod gate_props;

pub use gate::{evaluate, upgrade_message, usage};
pub use types::{
    DEFAULT_FREE_LIMIT, LimitDecision, LimitedResource, ResourceUsage, UsageLimits,
};
