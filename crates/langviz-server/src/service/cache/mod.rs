//! Cached probes of external dependencies.

mod health_cache;

pub use health_cache::HealthCache;
