//! Edit behavior cache for one selection
//!
//! The factory snapshots the outline once, before the gesture changes
//! anything, and builds behaviors lazily from that snapshot. Switching
//! behavior mid-drag therefore never sees displaced coordinates, as long
//! as the host applies the previous behavior's rollback first.

use crate::core::config_file::BehaviorConfig;
use crate::editing::edit_behavior::EditBehavior;
use crate::editing::rules::BehaviorName;
use crate::editing::selection::Selection;
use crate::editing::snapshot::OutlineSnapshot;
use crate::font_source::OutlineSource;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct BehaviorFactory {
    selection: Selection,
    snapshot: Arc<OutlineSnapshot>,
    config: Arc<BehaviorConfig>,
    behaviors: HashMap<BehaviorName, Arc<EditBehavior>>,
}

impl BehaviorFactory {
    pub fn new<O: OutlineSource + ?Sized>(
        outline: &O,
        selection: Selection,
        config: Arc<BehaviorConfig>,
    ) -> Self {
        let snapshot = Arc::new(OutlineSnapshot::capture(outline, &selection));
        Self {
            selection,
            snapshot,
            config,
            behaviors: HashMap::new(),
        }
    }

    /// Behavior by host-supplied name; unknown names get "default"
    pub fn get_behavior(&mut self, name: &str) -> Arc<EditBehavior> {
        self.get_behavior_for(BehaviorName::parse_or_default(name))
    }

    pub fn get_behavior_for(&mut self, name: BehaviorName) -> Arc<EditBehavior> {
        let snapshot = &self.snapshot;
        let config = &self.config;
        self.behaviors
            .entry(name)
            .or_insert_with(|| Arc::new(EditBehavior::new(snapshot.clone(), name, config)))
            .clone()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn snapshot(&self) -> &OutlineSnapshot {
        &self.snapshot
    }
}
