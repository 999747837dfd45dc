//! Core configuration
//!
//! The read-only rule tables and action library every behavior factory is
//! built against.

pub mod config_file;

// Re-export commonly used items
pub use config_file::{BehaviorConfig, BehaviorTable};
