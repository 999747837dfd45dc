//! Pre-gesture snapshot of the outline parts an edit touches
//!
//! Only contours containing a selected point and selected components are
//! captured. Everything an edit behavior computes is derived from this
//! snapshot, never from the live (already edited) outline.

use crate::editing::classify::PointDescriptor;
use crate::editing::selection::Selection;
use crate::font_source::OutlineSource;
use crate::geometry::DecomposedTransform;
use kurbo::Point;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// One contour with at least one selected point
#[derive(Clone, Debug, PartialEq)]
pub struct ContourSnapshot {
    pub contour_index: usize,
    /// Absolute index of the contour's first point
    pub start: usize,
    pub points: Vec<PointDescriptor>,
    pub closed: bool,
}

impl ContourSnapshot {
    pub fn positions(&self) -> Vec<Point> {
        self.points.iter().map(|point| point.position).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One selected component
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComponentSnapshot {
    pub index: usize,
    pub transform: DecomposedTransform,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutlineSnapshot {
    pub contours: Vec<ContourSnapshot>,
    pub components: Vec<ComponentSnapshot>,
}

impl OutlineSnapshot {
    /// Capture the selected contours and components
    ///
    /// Selection entries that do not exist in the outline are dropped with
    /// a warning.
    pub fn capture<O: OutlineSource + ?Sized>(outline: &O, selection: &Selection) -> Self {
        let mut selected_by_contour: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        for point_index in selection.points() {
            match outline.contour_of_point(point_index) {
                Some(contour_index) => {
                    selected_by_contour
                        .entry(contour_index)
                        .or_default()
                        .insert(point_index);
                }
                None => warn!("Selected point {} is not in the outline", point_index),
            }
        }

        let contours: Vec<ContourSnapshot> = selected_by_contour
            .into_iter()
            .filter_map(|(contour_index, selected)| {
                capture_contour(outline, contour_index, &selected)
            })
            .collect();

        let components: Vec<ComponentSnapshot> = selection
            .components()
            .filter_map(|index| match outline.components().get(index) {
                Some(component) => Some(ComponentSnapshot {
                    index,
                    transform: component.transform,
                }),
                None => {
                    warn!("Selected component {} is not in the outline", index);
                    None
                }
            })
            .collect();

        debug!(
            "Captured {} contours and {} components for editing",
            contours.len(),
            components.len()
        );
        Self {
            contours,
            components,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty() && self.components.is_empty()
    }
}

fn capture_contour<O: OutlineSource + ?Sized>(
    outline: &O,
    contour_index: usize,
    selected: &BTreeSet<usize>,
) -> Option<ContourSnapshot> {
    let info = outline.contour_info(contour_index)?;
    let start = outline.contour_start(contour_index)?;
    let mut points = Vec::with_capacity(info.end_point + 1 - start);
    for index in start..=info.end_point {
        let Some(point) = outline.point(index) else {
            warn!(
                "Contour {} refers to missing point {}, skipping contour",
                contour_index, index
            );
            return None;
        };
        points.push(PointDescriptor {
            position: point.position(),
            kind: point.kind(),
            selected: selected.contains(&index),
        });
    }
    Some(ContourSnapshot {
        contour_index,
        start,
        points,
        closed: info.closed,
    })
}
