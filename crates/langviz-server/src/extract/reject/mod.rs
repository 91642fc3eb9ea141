//! Request extractors that reject with the API's error body.
//!
//! These are drop-in replacements for their axum counterparts. Failures
//! carry a message naming the problem and, for validated extractors, the
//! offending fields.

mod enhanced_json;
mod enhanced_query;
mod validated_json;
mod validated_query;

pub use self::enhanced_json::Json;
pub use self::enhanced_query::Query;
pub use self::validated_json::ValidateJson;
pub use self::validated_query::ValidateQuery;
