//! Constraint names and other custom types.

mod constraint;

pub use constraint::{
    ConstraintCategory, ConstraintViolation, GraphConstraints, GraphEdgeConstraints,
    GraphStepConstraints,
};
