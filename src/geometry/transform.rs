//! Decomposed affine transformations for components
//!
//! Components store their placement in decomposed form (translation,
//! rotation, scale, skew around a transformation center) so that rotate and
//! scale gestures can edit one parameter without disturbing the others.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// A component transformation split into its editable parameters
///
/// Angles are stored in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecomposedTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub skew_x: f64,
    pub skew_y: f64,
    pub t_center_x: f64,
    pub t_center_y: f64,
}

impl Default for DecomposedTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl DecomposedTransform {
    pub const fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
            t_center_x: 0.0,
            t_center_y: 0.0,
        }
    }

    /// A pure translation
    pub fn from_translation(x: f64, y: f64) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            ..Self::identity()
        }
    }

    /// The component origin (its translation)
    pub fn origin(&self) -> Point {
        Point::new(self.translate_x, self.translate_y)
    }

    /// Replace the translation, keeping every other parameter
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.translate_x = origin.x;
        self.translate_y = origin.y;
        self
    }

    /// Compose the parameters into a single affine matrix
    ///
    /// Order (last applied first): move the center to the origin, skew,
    /// scale, rotate, then translate back out and by the component offset.
    pub fn to_affine(&self) -> Affine {
        let center = Vec2::new(self.t_center_x, self.t_center_y);
        Affine::translate(Vec2::new(self.translate_x, self.translate_y) + center)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * Affine::skew(self.skew_x.to_radians().tan(), self.skew_y.to_radians().tan())
            * Affine::translate(-center)
    }

    /// Decompose an affine matrix (transformation center at the origin)
    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, x, y] = affine.as_coeffs();
        let delta = a * d - b * c;

        let mut result = Self::from_translation(x, y);
        if a != 0.0 || b != 0.0 {
            let r = a.hypot(b);
            result.rotation = if b >= 0.0 {
                (a / r).acos()
            } else {
                -(a / r).acos()
            }
            .to_degrees();
            result.scale_x = r;
            result.scale_y = delta / r;
            result.skew_x = ((a * c + b * d) / (r * r)).atan().to_degrees();
            result.skew_y = 0.0;
        } else if c != 0.0 || d != 0.0 {
            let s = c.hypot(d);
            let inner = if d >= 0.0 {
                (-c / s).acos()
            } else {
                -(c / s).acos()
            };
            result.rotation = (std::f64::consts::FRAC_PI_2 - inner).to_degrees();
            result.scale_x = delta / s;
            result.scale_y = s;
            result.skew_x = 0.0;
            result.skew_y = ((a * c + b * d) / (s * s)).atan().to_degrees();
        } else {
            // Fully collapsed matrix; only the offset survives
            result.scale_x = 0.0;
            result.scale_y = 0.0;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_affine_close(a: Affine, b: Affine) {
        for (x, y) in a.as_coeffs().iter().zip(b.as_coeffs().iter()) {
            assert!((x - y).abs() < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_identity_is_identity_affine() {
        assert_affine_close(DecomposedTransform::identity().to_affine(), Affine::IDENTITY);
    }

    #[test]
    fn test_translation_origin() {
        let t = DecomposedTransform::from_translation(120.0, -40.0);
        assert_eq!(t.origin(), Point::new(120.0, -40.0));
        assert_eq!(t.to_affine() * Point::new(0.0, 0.0), Point::new(120.0, -40.0));
    }

    #[test]
    fn test_decompose_round_trip() {
        let original = DecomposedTransform {
            translate_x: 30.0,
            translate_y: 15.0,
            rotation: 30.0,
            scale_x: 2.0,
            scale_y: 0.5,
            skew_x: 10.0,
            ..DecomposedTransform::identity()
        };
        let decomposed = DecomposedTransform::from_affine(original.to_affine());
        assert!((decomposed.rotation - 30.0).abs() < 1e-9);
        assert!((decomposed.scale_x - 2.0).abs() < 1e-9);
        assert!((decomposed.scale_y - 0.5).abs() < 1e-9);
        assert!((decomposed.skew_x - 10.0).abs() < 1e-9);
        assert_affine_close(decomposed.to_affine(), original.to_affine());
    }

    #[test]
    fn test_transform_center_is_fixed_point() {
        let t = DecomposedTransform {
            rotation: 90.0,
            t_center_x: 50.0,
            t_center_y: 50.0,
            ..DecomposedTransform::identity()
        };
        let mapped = t.to_affine() * Point::new(50.0, 50.0);
        assert!((mapped.x - 50.0).abs() < 1e-9);
        assert!((mapped.y - 50.0).abs() < 1e-9);
    }
}
