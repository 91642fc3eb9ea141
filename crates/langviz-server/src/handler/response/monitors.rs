//! Health check response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Overall health of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Serialize, Deserialize, JsonSchema, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthStatus {
    /// The trace store answers connectivity probes.
    Healthy,
    /// The trace store is unreachable.
    Unhealthy,
}

impl HealthStatus {
    #[inline]
    pub fn from_probe(healthy: bool) -> Self {
        if healthy {
            Self::Healthy
        } else {
            Self::Unhealthy
        }
    }

    #[inline]
    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Health check response.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// Overall health status.
    pub status: HealthStatus,
    /// Timestamp when this status was generated.
    pub checked_at: Timestamp,
    /// Application version.
    pub version: String,
}

impl MonitorStatus {
    pub fn new(status: HealthStatus) -> Self {
        Self {
            status,
            checked_at: Timestamp::now(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() -> anyhow::Result<()> {
        let value = serde_json::to_value(MonitorStatus::new(HealthStatus::Unhealthy))?;
        assert_eq!(value["status"], "unhealthy");
        assert!(value["checkedAt"].is_string());
        assert_eq!(HealthStatus::Healthy.to_string(), "healthy");
        Ok(())
    }
}
