//! Application state and dependency injection.

mod cache;
mod config;

use langviz_postgres::PgClient;

pub use crate::service::cache::HealthCache;
pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder, ServiceConfigBuilderError};
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub postgres: PgClient,
    pub health_cache: HealthCache,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the trace store and applies pending migrations.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let service_state = Self {
            postgres: config.connect_postgres().await?,
            health_cache: HealthCache::with_cache_duration(config.health_cache_ttl()),
        };

        Ok(service_state)
    }

    /// Assembles state from an already constructed client.
    ///
    /// No connection is made; the pool connects on first checkout.
    pub fn from_parts(postgres: PgClient, health_cache: HealthCache) -> Self {
        Self {
            postgres,
            health_cache,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(postgres: PgClient);
impl_di!(health_cache: HealthCache);
