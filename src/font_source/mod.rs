//! Font source data structures
//!
//! The outline the edit behaviors read from: points with their UFO
//! attributes, contour metadata and components, plus conversions from
//! norad glyphs.

pub mod conversions;
pub mod outline;
pub mod ufo_point;

// Explicit re-exports for public API
pub use outline::{Component, ContourInfo, GlyphOutline, OutlineSource};
pub use ufo_point::{PointKind, UfoPoint, UfoPointType};
