//! Catalog configuration.
//!
//! Defaults suit nearly every caller. The process-wide catalog reads
//! `FASTPROP_CYCLE_POLICY` and `FASTPROP_MAX_DEPTH` once, on first use;
//! values that do not parse are ignored rather than treated as fatal.

use serde::{Deserialize, Serialize};
use std::env;

pub const CYCLE_POLICY_ENV: &str = "FASTPROP_CYCLE_POLICY";
pub const MAX_DEPTH_ENV: &str = "FASTPROP_MAX_DEPTH";

const DEFAULT_MAX_DEPTH: usize = 32;

/// What the catalog does when a composite type reappears on its own
/// expansion path.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Abort the build with `Error::CyclicTypeGraph`.
    #[default]
    Fail,
    /// Leave the re-entrant branch out and keep walking.
    Skip,
}

impl CyclePolicy {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fail" => Some(CyclePolicy::Fail),
            "skip" => Some(CyclePolicy::Skip),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub cycle_policy: CyclePolicy,
    /// Maximum number of nested composite levels, counting the root.
    pub max_depth: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cycle_policy: CyclePolicy::Fail,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let cycle_policy = lookup(CYCLE_POLICY_ENV)
            .and_then(|raw| CyclePolicy::parse(&raw))
            .unwrap_or(defaults.cycle_policy);
        let max_depth = lookup(MAX_DEPTH_ENV)
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|depth| *depth > 0)
            .unwrap_or(defaults.max_depth);
        Self {
            cycle_policy,
            max_depth,
        }
    }

    pub fn with_cycle_policy(mut self, cycle_policy: CyclePolicy) -> Self {
        self.cycle_policy = cycle_policy;
        self
    }

    /// Values below 1 are raised to 1, since the root itself is a level.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }
}
