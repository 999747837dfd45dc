//! UFO format conversion utilities
//!
//! Converts norad glyphs into the flattened [`GlyphOutline`] the edit
//! behaviors operate on.

use crate::font_source::outline::{Component, GlyphOutline};
use crate::font_source::ufo_point::{UfoPoint, UfoPointType};
use crate::geometry::DecomposedTransform;
use kurbo::Affine;

impl UfoPointType {
    pub fn from_norad_point_type(norad_type: &norad::PointType) -> Self {
        match norad_type {
            norad::PointType::Move => UfoPointType::Move,
            norad::PointType::Line => UfoPointType::Line,
            norad::PointType::OffCurve => UfoPointType::OffCurve,
            norad::PointType::Curve => UfoPointType::Curve,
            norad::PointType::QCurve => UfoPointType::QCurve,
        }
    }
}

impl UfoPoint {
    pub fn from_norad_point(norad_point: &norad::ContourPoint) -> Self {
        UfoPoint::new(
            norad_point.x,
            norad_point.y,
            UfoPointType::from_norad_point_type(&norad_point.typ),
        )
        .with_smooth(norad_point.smooth)
    }
}

impl Component {
    pub fn from_norad_component(norad_component: &norad::Component) -> Self {
        let t = &norad_component.transform;
        let affine = Affine::new([
            t.x_scale, t.xy_scale, t.yx_scale, t.y_scale, t.x_offset, t.y_offset,
        ]);
        Component::new(
            norad_component.base.to_string(),
            DecomposedTransform::from_affine(affine),
        )
    }
}

impl GlyphOutline {
    /// Convert a norad glyph; a contour is open when it starts with a move
    pub fn from_norad_glyph(norad_glyph: &norad::Glyph) -> Self {
        let mut outline = GlyphOutline::new();
        for contour in &norad_glyph.contours {
            let closed = contour
                .points
                .first()
                .map_or(true, |first| first.typ != norad::PointType::Move);
            let points = contour.points.iter().map(UfoPoint::from_norad_point).collect();
            outline.push_contour(points, closed);
        }
        outline.components = norad_glyph
            .components
            .iter()
            .map(Component::from_norad_component)
            .collect();
        outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_source::outline::OutlineSource;
    use crate::font_source::ufo_point::PointKind;

    fn norad_point(x: f64, y: f64, typ: norad::PointType, smooth: bool) -> norad::ContourPoint {
        norad::ContourPoint::new(x, y, typ, smooth, None, None)
    }

    #[test]
    fn test_from_norad_glyph() {
        let mut glyph = norad::Glyph::new("o");
        glyph.contours.push(norad::Contour::new(
            vec![
                norad_point(0.0, 0.0, norad::PointType::Curve, true),
                norad_point(0.0, 50.0, norad::PointType::OffCurve, false),
                norad_point(50.0, 100.0, norad::PointType::OffCurve, false),
                norad_point(100.0, 100.0, norad::PointType::Curve, false),
            ],
            None,
        ));
        glyph.contours.push(norad::Contour::new(
            vec![
                norad_point(200.0, 0.0, norad::PointType::Move, false),
                norad_point(300.0, 0.0, norad::PointType::Line, false),
            ],
            None,
        ));
        let transform = norad::AffineTransform {
            x_scale: 1.0,
            xy_scale: 0.0,
            yx_scale: 0.0,
            y_scale: 1.0,
            x_offset: 50.0,
            y_offset: 25.0,
        };
        glyph.components.push(norad::Component::new(
            "acute".parse().unwrap(),
            transform,
            None,
        ));

        let outline = GlyphOutline::from_norad_glyph(&glyph);
        assert_eq!(outline.num_contours(), 2);
        assert!(outline.contour_info(0).unwrap().closed);
        assert!(!outline.contour_info(1).unwrap().closed);
        assert_eq!(outline.points[0].kind(), PointKind::Smooth);
        assert_eq!(outline.points[1].kind(), PointKind::OffCurve);
        assert_eq!(outline.points[3].kind(), PointKind::Sharp);
        assert_eq!(outline.components[0].base_glyph, "acute");
        assert_eq!(outline.components[0].origin(), kurbo::Point::new(50.0, 25.0));
    }
}
