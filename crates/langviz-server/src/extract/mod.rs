//! Request extractors.
//!
//! - [`Json`] and [`Query`] deserialize with descriptive rejections.
//! - [`ValidateJson`] and [`ValidateQuery`] additionally run `validator`.
//! - [`PgPool`] checks a trace store connection out of the pool.

mod pg_connection;
mod reject;

pub use crate::extract::pg_connection::PgPool;
pub use crate::extract::reject::{Json, Query, ValidateJson, ValidateQuery};
