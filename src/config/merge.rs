//! Merge policy: defaults and override order.

pub mod merge_policy;
