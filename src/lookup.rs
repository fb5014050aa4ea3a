//! Sequential lookup driver.

use crate::config::Config;
use crate::entry::EntryKind;
use crate::pacing::Sleeper;
use crate::providers::{LookupError, ReputationApi};
use crate::report::Summary;
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub succeeded: usize,
    pub failed: usize,
}

/// Queries entries one at a time, pacing requests to the configured rate.
pub struct Lookup {
    api: Box<dyn ReputationApi>,
    sleeper: Arc<dyn Sleeper>,
    kind: EntryKind,
    interval: Duration,
    rate_limit_wait: Duration,
    max_rate_limit_retries: Option<u32>,
}

impl Lookup {
    pub fn new(
        config: &Config,
        kind: EntryKind,
        api: Box<dyn ReputationApi>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            api,
            sleeper,
            kind,
            interval: config.request_interval(),
            rate_limit_wait: config.rate_limit_wait(),
            max_rate_limit_retries: config.max_rate_limit_retries,
        }
    }

    /// Query one entry, waiting and retrying while the API reports HTTP 429.
    pub async fn query(&self, entry: &str) -> Result<Value, LookupError> {
        let mut retries = 0u32;

        loop {
            let response = self.api.fetch(self.kind, entry).await?;

            if response.is_rate_limited() {
                if self.max_rate_limit_retries.is_some_and(|max| retries >= max) {
                    return Err(LookupError::RateLimited { retries });
                }

                warn!(
                    entry = %entry,
                    wait_secs = self.rate_limit_wait.as_secs(),
                    "Rate limit exceeded. Waiting before retrying..."
                );
                self.sleeper.sleep(self.rate_limit_wait).await;
                retries += 1;
                continue;
            }

            if !response.is_ok() {
                return Err(LookupError::Status(response.status));
            }

            return Ok(serde_json::from_str(&response.body)?);
        }
    }

    /// Query every entry in order, writing one summary or failure per entry.
    pub async fn run<W: Write>(&self, entries: &[String], out: &mut W) -> std::io::Result<RunStats> {
        let mut stats = RunStats::default();

        if entries.is_empty() {
            writeln!(out, "No valid entries to process.")?;
            return Ok(stats);
        }

        info!(
            entries = entries.len(),
            kind = %self.kind,
            provider = self.api.name(),
            interval_ms = self.interval.as_millis() as u64,
            "Starting lookups"
        );

        for entry in entries {
            match self.query(entry).await {
                Ok(body) => {
                    let summary = Summary::from_response(entry, self.kind, &body);
                    debug!(entry = %entry, detections = ?summary.detections, "Lookup complete");
                    writeln!(out, "{}", summary)?;
                    stats.succeeded += 1;
                }
                Err(e) => {
                    warn!(entry = %entry, error = %e, "Lookup failed");
                    writeln!(out, "Error querying {}: {}", entry, e)?;
                    writeln!(out, "Failed to retrieve data for {}", entry)?;
                    stats.failed += 1;
                }
            }

            self.sleeper.sleep(self.interval).await;
        }

        Ok(stats)
    }
}
