//! Middleware for `axum::Router` and HTTP request processing.
//!
//! Each concern is exposed as an extension trait on [`Router`]:
//!
//! ```rust,no_run
//! use axum::Router;
//! use langviz_server::middleware::{
//!     CorsConfig, RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_security(&CorsConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```
//!
//! [`Router`]: axum::Router

mod observability;
mod recovery;
mod security;
mod specification;

pub use observability::{RouterObservabilityExt, track_request_metrics};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, DEFAULT_MAX_BODY_SIZE, RouterSecurityExt};
pub use specification::{OpenApiConfig, RouterOpenApiExt};
