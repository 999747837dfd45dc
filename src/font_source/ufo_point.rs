//! UFO-compliant point data structures
//!
//! Points carry the UFO `type` and `smooth` attributes. The edit behavior
//! engine only cares about the coarser [`PointKind`] derived from them.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// UFO-compliant point type enumeration
/// Maps directly to the UFO specification point types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UfoPointType {
    /// First point in an open contour
    #[serde(rename = "move")]
    Move,
    /// Draws straight line from previous point
    #[serde(rename = "line")]
    Line,
    /// Part of curve segment (control point)
    #[serde(rename = "offcurve")]
    OffCurve,
    /// Draws cubic Bézier curve
    #[serde(rename = "curve")]
    Curve,
    /// Draws quadratic curve
    #[serde(rename = "qcurve")]
    QCurve,
}

impl UfoPointType {
    /// Check if this point type is on-curve (not a control point)
    pub fn is_on_curve(&self) -> bool {
        !matches!(self, UfoPointType::OffCurve)
    }
}

/// Structural kind of a point as seen by the edit behaviors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointKind {
    /// On-curve corner point
    #[default]
    Sharp,
    /// On-curve point with tangent continuity
    Smooth,
    /// Bezier control point
    OffCurve,
}

/// A single outline point with its UFO attributes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UfoPoint {
    pub x: f64,
    pub y: f64,
    /// Point/segment type; absent means an on-curve point
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub point_type: Option<UfoPointType>,
    /// Smooth curve flag - only meaningful for on-curve points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smooth: Option<bool>,
}

impl UfoPoint {
    /// Create a new UFO point with coordinates and type
    pub fn new(x: f64, y: f64, point_type: UfoPointType) -> Self {
        Self {
            x,
            y,
            point_type: Some(point_type),
            smooth: None,
        }
    }

    /// A point with no type metadata at all
    pub fn untyped(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            point_type: None,
            smooth: None,
        }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self::new(x, y, UfoPointType::Move)
    }

    pub fn line_to(x: f64, y: f64) -> Self {
        Self::new(x, y, UfoPointType::Line)
    }

    pub fn off_curve(x: f64, y: f64) -> Self {
        Self::new(x, y, UfoPointType::OffCurve)
    }

    pub fn curve_to(x: f64, y: f64) -> Self {
        Self::new(x, y, UfoPointType::Curve)
    }

    pub fn qcurve_to(x: f64, y: f64) -> Self {
        Self::new(x, y, UfoPointType::QCurve)
    }

    /// Set the smooth flag (only valid for on-curve points)
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        if self.is_on_curve() {
            self.smooth = Some(smooth);
        }
        self
    }

    /// Check if this point is on-curve
    pub fn is_on_curve(&self) -> bool {
        self.point_type.map_or(true, |t| t.is_on_curve())
    }

    /// Check if this point is smooth
    pub fn is_smooth(&self) -> bool {
        self.smooth.unwrap_or(false) && self.is_on_curve()
    }

    /// Structural kind; missing metadata reads as a sharp on-curve point
    pub fn kind(&self) -> PointKind {
        if !self.is_on_curve() {
            PointKind::OffCurve
        } else if self.is_smooth() {
            PointKind::Smooth
        } else {
            PointKind::Sharp
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Move the point, keeping its attributes
    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }
}
