//! Editing Functionality
//!
//! Rule-driven edit behaviors for dragging and transforming selected
//! outline points:
//! - Selection parsing
//! - Point classification, rule tables and the compiled match tree
//! - The action library and per-gesture edit behaviors
//! - The behavior factory hosts talk to

pub mod actions;
pub mod change;
pub mod classify;
pub mod edit_behavior;
pub mod factory;
pub mod match_tree;
pub mod matcher;
pub mod rules;
pub mod selection;
pub mod snapshot;

// Re-export commonly used items
pub use actions::{ActionLibrary, EditTransform, Neighborhood};
pub use change::{ComponentChange, ComponentEdit, EditChange, EditDiff, PointChange};
pub use classify::{PointDescriptor, StructuralTag};
pub use edit_behavior::EditBehavior;
pub use factory::BehaviorFactory;
pub use match_tree::{MatchDirection, MatchTree, RuleMatch};
pub use matcher::{match_point, PointMatch};
pub use rules::{BehaviorName, Pattern, Rule};
pub use selection::Selection;
pub use snapshot::OutlineSnapshot;
