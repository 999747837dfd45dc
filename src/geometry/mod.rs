//! Geometric Primitives and Operations

pub mod transform;
pub mod utilities;

// Re-export commonly used items
pub use transform::DecomposedTransform;
pub use utilities::{
    angle, constrain_hor_ver_diag, distance, intersect, project_onto_line, unconstrained,
    Intersection,
};
