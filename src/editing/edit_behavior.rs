//! Edit behavior: rule-driven point updates for one selection
//!
//! Built once per gesture from a pre-gesture [`OutlineSnapshot`]. Every
//! point of a selected contour is matched against the behavior's rule
//! table; matched points get an apply function from the action library.
//! Applying a transform runs two passes per contour. The transform pass
//! reads original positions; the constrain pass reads the transform pass
//! results, so constrain actions can react to points that just moved.

use crate::core::config_file::BehaviorConfig;
use crate::editing::actions::{ApplyFn, EditTransform, Neighborhood};
use crate::editing::change::{ComponentChange, ComponentEdit, EditChange, EditDiff, PointChange};
use crate::editing::classify::classify_contour;
use crate::editing::matcher::match_point;
use crate::editing::rules::{BehaviorName, PATTERN_LENGTH};
use crate::editing::snapshot::{ContourSnapshot, OutlineSnapshot};
use crate::geometry::DecomposedTransform;
use kurbo::{Point, Vec2};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Applies one matched action to one point
struct PointEdit {
    /// Contour-local index of the edited point
    point: usize,
    /// Contour-local neighbor indices in action order
    indices: [Option<usize>; PATTERN_LENGTH],
    apply: ApplyFn,
}

impl PointEdit {
    /// Evaluate against `positions`, keeping the original position when
    /// the action has no usable result
    fn evaluate(&self, transform: &EditTransform, positions: &[Point], original: Point) -> Point {
        let neighborhood = Neighborhood::gather(&self.indices, positions);
        match (self.apply)(transform, &neighborhood) {
            Some(position) if position.is_finite() => position,
            _ => {
                trace!("Degenerate geometry for point {}, keeping it in place", self.point);
                original
            }
        }
    }
}

/// Per-contour edit plan
struct ContourEdits {
    start: usize,
    original: Vec<Point>,
    transform: Vec<PointEdit>,
    constrain: Vec<PointEdit>,
    /// Sorted contour-local indices of every edited point
    participating: Vec<usize>,
}

impl ContourEdits {
    fn build(
        contour: &ContourSnapshot,
        name: BehaviorName,
        config: &BehaviorConfig,
        unknown_actions: &mut BTreeSet<String>,
    ) -> Self {
        let table = config.table(name);
        let tags = classify_contour(&contour.points);
        let original = contour.positions();
        let mut edits = ContourEdits {
            start: contour.start,
            original,
            transform: Vec::new(),
            constrain: Vec::new(),
            participating: Vec::new(),
        };

        for center in 0..tags.len() {
            let Some(found) = match_point(&table.match_tree, &tags, contour.closed, center) else {
                continue;
            };
            let Some(rule) = table.rules.get(found.rule) else {
                continue;
            };
            let Some(builder) = config.actions().get(&rule.action) else {
                unknown_actions.insert(rule.action.clone());
                continue;
            };
            let neighborhood = Neighborhood::gather(&found.indices, &edits.original);
            let Some(apply) = builder(&neighborhood) else {
                warn!(
                    "Action '{}' could not be built for point {}, leaving it in place",
                    rule.action,
                    contour.start + center
                );
                continue;
            };
            let edit = PointEdit {
                point: center,
                indices: found.indices,
                apply,
            };
            if rule.constrain {
                edits.constrain.push(edit);
            } else {
                edits.transform.push(edit);
            }
            edits.participating.push(center);
        }
        edits
    }

    /// New positions of every participating point, in `participating` order
    fn apply(&self, transform: &EditTransform) -> Vec<(usize, Point)> {
        let mut current = self.original.clone();
        for edit in &self.transform {
            current[edit.point] = edit.evaluate(transform, &self.original, self.original[edit.point]);
        }
        let after_transform = current.clone();
        for edit in &self.constrain {
            current[edit.point] = edit.evaluate(transform, &after_transform, self.original[edit.point]);
        }
        self.participating
            .iter()
            .map(|&point| (point, current[point]))
            .collect()
    }
}

/// Edit plan for one selection under one behavior name
pub struct EditBehavior {
    name: BehaviorName,
    snapshot: Arc<OutlineSnapshot>,
    contours: Vec<ContourEdits>,
    delta_constraint: fn(Vec2) -> Vec2,
    rollback: EditChange,
}

impl fmt::Debug for EditBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditBehavior")
            .field("name", &self.name)
            .field("participating_points", &self.participating_points())
            .finish_non_exhaustive()
    }
}

impl EditBehavior {
    pub fn new(snapshot: Arc<OutlineSnapshot>, name: BehaviorName, config: &BehaviorConfig) -> Self {
        let mut unknown_actions = BTreeSet::new();
        let contours: Vec<ContourEdits> = snapshot
            .contours
            .iter()
            .map(|contour| ContourEdits::build(contour, name, config, &mut unknown_actions))
            .collect();
        for action in &unknown_actions {
            warn!(
                "Unknown edit action '{}' in behavior '{}', affected points stay in place",
                action, name
            );
        }

        let rollback = rollback_change(&contours, &snapshot);
        let behavior = Self {
            name,
            delta_constraint: config.table(name).delta_constraint(),
            snapshot,
            contours,
            rollback,
        };
        debug!(
            "Built '{}' edit behavior: {} participating points, {} components",
            name,
            behavior.rollback.point_count(),
            behavior.snapshot.components.len()
        );
        behavior
    }

    pub fn behavior_name(&self) -> BehaviorName {
        self.name
    }

    /// Absolute indices of every point this behavior moves
    pub fn participating_points(&self) -> Vec<usize> {
        self.contours
            .iter()
            .flat_map(|contour| contour.participating.iter().map(move |point| contour.start + point))
            .collect()
    }

    /// Change restoring every touched point and component
    pub fn rollback_change(&self) -> &EditChange {
        &self.rollback
    }

    /// Translate the selection by a drag delta
    pub fn make_change_for_delta(&self, delta: Vec2) -> EditDiff {
        let constrained_delta = (self.delta_constraint)(delta);
        let constrained = move |point: Point| point + constrained_delta;
        let free = move |point: Point| point + delta;
        self.make_change_for_transform_func(&constrained, Some(&free as &dyn Fn(Point) -> Point), None)
    }

    /// General form for rotate, scale and skew
    ///
    /// `free` defaults to `constrained`. Without `component_fn` components
    /// only have their origin mapped through `constrained`.
    pub fn make_change_for_transform_func(
        &self,
        constrained: &dyn Fn(Point) -> Point,
        free: Option<&dyn Fn(Point) -> Point>,
        component_fn: Option<&dyn Fn(&DecomposedTransform) -> DecomposedTransform>,
    ) -> EditDiff {
        let transform = EditTransform {
            constrained,
            free: free.unwrap_or(constrained),
            constrain_delta: self.delta_constraint,
        };

        let path = self
            .contours
            .iter()
            .flat_map(|contour| {
                contour
                    .apply(&transform)
                    .into_iter()
                    .map(move |(point, position)| PointChange::new(contour.start + point, position.round()))
            })
            .collect();

        let components = self
            .snapshot
            .components
            .iter()
            .map(|component| {
                let edit = match component_fn {
                    Some(component_fn) => {
                        let mut transformed = component_fn(&component.transform);
                        transformed.translate_x = transformed.translate_x.round();
                        transformed.translate_y = transformed.translate_y.round();
                        ComponentEdit::Transform(transformed)
                    }
                    None => {
                        let origin = constrained(component.transform.origin()).round();
                        ComponentEdit::Origin {
                            x: origin.x,
                            y: origin.y,
                        }
                    }
                };
                ComponentChange {
                    index: component.index,
                    edit,
                }
            })
            .collect();

        EditDiff {
            change: EditChange { path, components },
            rollback_change: self.rollback.clone(),
        }
    }
}

fn rollback_change(contours: &[ContourEdits], snapshot: &OutlineSnapshot) -> EditChange {
    let path = contours
        .iter()
        .flat_map(|contour| {
            contour
                .participating
                .iter()
                .map(move |&point| PointChange::new(contour.start + point, contour.original[point]))
        })
        .collect();
    let components = snapshot
        .components
        .iter()
        .map(|component| ComponentChange {
            index: component.index,
            edit: ComponentEdit::Transform(component.transform),
        })
        .collect();
    EditChange { path, components }
}
