//! Ingestion pipeline settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Overall deadline for one ingestion in seconds. `0` disables it.
    #[serde(default)]
    pub deadline_secs: u64,
}

impl IngestConfig {
    pub const fn deadline(&self) -> Option<Duration> {
        if self.deadline_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.deadline_secs))
        }
    }
}
