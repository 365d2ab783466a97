//! CLI configuration with flag > environment > default precedence.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BUDGET_SECS: u64 = 10;
pub const DEFAULT_RESOLUTION: usize = 400;
pub const DEFAULT_TTL_SECS: u64 = 300;
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

/// Resolved runtime knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub budget: Duration,
    pub resolution: usize,
    pub artifact_dir: PathBuf,
    pub ttl: Duration,
}

impl CliConfig {
    /// Resolve each knob: an explicit flag wins, then the `GRAPHEQ_*`
    /// environment variable, then the built-in default.
    pub fn resolve(
        budget_secs: Option<u64>,
        resolution: Option<usize>,
        artifact_dir: Option<PathBuf>,
        ttl_secs: Option<u64>,
    ) -> Self {
        CliConfig {
            budget: Duration::from_secs(
                budget_secs
                    .or_else(|| env_parse("GRAPHEQ_BUDGET_SECS"))
                    .unwrap_or(DEFAULT_BUDGET_SECS),
            ),
            resolution: resolution
                .or_else(|| env_parse("GRAPHEQ_RESOLUTION"))
                .unwrap_or(DEFAULT_RESOLUTION),
            artifact_dir: artifact_dir
                .or_else(|| env::var("GRAPHEQ_ARTIFACT_DIR").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_DIR)),
            ttl: Duration::from_secs(
                ttl_secs
                    .or_else(|| env_parse("GRAPHEQ_TTL_SECS"))
                    .unwrap_or(DEFAULT_TTL_SECS),
            ),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok()?.trim().parse().ok()
}
