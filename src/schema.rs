use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::harness::Accumulation;
use crate::targets::Arity;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub profile: String,
    pub trials: u64,
    pub seed: Option<u64>,
    pub accumulation: Accumulation,
    /// Seconds since the Unix epoch when the report was assembled.
    pub timestamp_unix: u64,
    pub git_sha: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,
    pub unit: String,
    pub arity: Arity,

    pub trials: u64,
    pub total_ns: u128,
    pub mean_ns: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub run: RunMeta,
    pub measurements: Vec<Measurement>,
}

pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Commit of the build, taken from `GIT_SHA` or `GITHUB_SHA` when set.
pub fn git_sha_short() -> Option<String> {
    ["GIT_SHA", "GITHUB_SHA"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .filter(|sha| !sha.is_empty())
        .map(|sha| sha.chars().take(12).collect())
}
