//! Glyph outline storage as seen by the edit behaviors
//!
//! Points are stored flattened in one list; contours are described by the
//! index of their last point and a closed flag. Hosts with their own outline
//! storage implement [`OutlineSource`] instead of converting to
//! [`GlyphOutline`].

use crate::editing::change::{ComponentEdit, EditChange};
use crate::font_source::ufo_point::UfoPoint;
use crate::geometry::DecomposedTransform;
use anyhow::{Context, Result};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Contour metadata: absolute index of the last point and whether it closes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourInfo {
    pub end_point: usize,
    pub closed: bool,
}

/// A reference to another glyph placed with a decomposed transformation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub base_glyph: String,
    #[serde(default)]
    pub transform: DecomposedTransform,
}

impl Component {
    pub fn new(base_glyph: impl Into<String>, transform: DecomposedTransform) -> Self {
        Self {
            base_glyph: base_glyph.into(),
            transform,
        }
    }

    pub fn origin(&self) -> Point {
        self.transform.origin()
    }
}

/// Point and contour queries the edit behaviors need from an outline
pub trait OutlineSource {
    fn num_points(&self) -> usize;

    fn num_contours(&self) -> usize;

    fn contour_info(&self, contour_index: usize) -> Option<ContourInfo>;

    fn point(&self, point_index: usize) -> Option<&UfoPoint>;

    fn components(&self) -> &[Component];

    /// Absolute index of the first point of a contour
    fn contour_start(&self, contour_index: usize) -> Option<usize> {
        self.contour_info(contour_index)?;
        if contour_index == 0 {
            Some(0)
        } else {
            self.contour_info(contour_index - 1)
                .map(|previous| previous.end_point + 1)
        }
    }

    /// Contour containing an absolute point index
    fn contour_of_point(&self, point_index: usize) -> Option<usize> {
        if point_index >= self.num_points() {
            return None;
        }
        let (mut low, mut high) = (0, self.num_contours());
        while low < high {
            let mid = (low + high) / 2;
            if self.contour_info(mid)?.end_point < point_index {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        (low < self.num_contours()).then_some(low)
    }
}

/// In-memory glyph outline
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphOutline {
    #[serde(default)]
    pub points: Vec<UfoPoint>,
    #[serde(default)]
    pub contours: Vec<ContourInfo>,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl GlyphOutline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contour; empty point lists are skipped
    pub fn with_contour(mut self, points: Vec<UfoPoint>, closed: bool) -> Self {
        self.push_contour(points, closed);
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Append a contour in place, returning its index
    pub fn push_contour(&mut self, points: Vec<UfoPoint>, closed: bool) -> Option<usize> {
        if points.is_empty() {
            debug!("Skipping empty contour");
            return None;
        }
        self.points.extend(points);
        self.contours.push(ContourInfo {
            end_point: self.points.len() - 1,
            closed,
        });
        Some(self.contours.len() - 1)
    }

    /// Parse an outline from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self> {
        let outline: Self =
            serde_json::from_str(json).context("Failed to parse glyph outline JSON")?;
        Ok(outline)
    }

    pub fn point_position(&self, point_index: usize) -> Option<Point> {
        self.points.get(point_index).map(UfoPoint::position)
    }

    /// Apply a change produced by an edit behavior
    ///
    /// Entries that point past the end of the outline are skipped.
    pub fn apply_change(&mut self, change: &EditChange) {
        for point_change in &change.path {
            match self.points.get_mut(point_change.index) {
                Some(point) => point.set_position(point_change.position()),
                None => warn!(
                    "Change refers to missing point {}, skipping",
                    point_change.index
                ),
            }
        }
        for component_change in &change.components {
            let Some(component) = self.components.get_mut(component_change.index) else {
                warn!(
                    "Change refers to missing component {}, skipping",
                    component_change.index
                );
                continue;
            };
            match &component_change.edit {
                ComponentEdit::Origin { x, y } => {
                    component.transform = component.transform.with_origin(Point::new(*x, *y));
                }
                ComponentEdit::Transform(transform) => component.transform = *transform,
            }
        }
    }
}

impl OutlineSource for GlyphOutline {
    fn num_points(&self) -> usize {
        self.points.len()
    }

    fn num_contours(&self) -> usize {
        self.contours.len()
    }

    fn contour_info(&self, contour_index: usize) -> Option<ContourInfo> {
        self.contours.get(contour_index).copied()
    }

    fn point(&self, point_index: usize) -> Option<&UfoPoint> {
        self.points.get(point_index)
    }

    fn components(&self) -> &[Component] {
        &self.components
    }
}
