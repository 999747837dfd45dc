//! Coordinate diffs produced by edit behaviors
//!
//! A change lists absolute point coordinates under `path` and component
//! edits under `components`. Hosts apply it to their outline and may
//! serialize it to broadcast the edit.

use crate::geometry::DecomposedTransform;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// New absolute position of one point
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointChange {
    /// Absolute point index within the glyph outline
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

impl PointChange {
    pub fn new(index: usize, position: Point) -> Self {
        Self {
            index,
            x: position.x,
            y: position.y,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// What happens to a component
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentEdit {
    /// Move the component, keeping the rest of its transformation
    Origin { x: f64, y: f64 },
    /// Replace the whole decomposed transformation
    Transform(DecomposedTransform),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentChange {
    pub index: usize,
    #[serde(flatten)]
    pub edit: ComponentEdit,
}

/// One set of coordinate updates
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EditChange {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PointChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentChange>,
}

impl EditChange {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.components.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.path.len()
    }

    /// Entry for an absolute point index, if the change touches it
    pub fn point(&self, index: usize) -> Option<Point> {
        self.path
            .iter()
            .find(|change| change.index == index)
            .map(PointChange::position)
    }
}

/// A forward change paired with the change that undoes it
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDiff {
    pub change: EditChange,
    pub rollback_change: EditChange,
}
