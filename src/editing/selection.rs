//! Selection of points and components targeted by an edit
//!
//! Hosts describe a selection as string keys: `"point/<absoluteIndex>"` and
//! `"component/<index>"`. Keys that do not parse are dropped with a warning.

use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Parsed selection, ordered so that iteration is deterministic
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    points: BTreeSet<usize>,
    components: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse host selection keys
    pub fn parse<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for key in keys {
            let key = key.as_ref();
            let parsed = key
                .split_once('/')
                .and_then(|(kind, index)| Some((kind, index.parse::<usize>().ok()?)));
            match parsed {
                Some(("point", index)) => {
                    selection.points.insert(index);
                }
                Some(("component", index)) => {
                    selection.components.insert(index);
                }
                _ => warn!("Ignoring unrecognized selection key '{}'", key),
            }
        }
        selection
    }

    pub fn with_point(mut self, index: usize) -> Self {
        self.points.insert(index);
        self
    }

    pub fn with_component(mut self, index: usize) -> Self {
        self.components.insert(index);
        self
    }

    pub fn points(&self) -> impl Iterator<Item = usize> + '_ {
        self.points.iter().copied()
    }

    pub fn components(&self) -> impl Iterator<Item = usize> + '_ {
        self.components.iter().copied()
    }

    pub fn contains_point(&self, index: usize) -> bool {
        self.points.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.components.is_empty()
    }

    /// Canonical host keys, points first
    pub fn to_keys(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|index| format!("point/{index}"))
            .chain(self.components.iter().map(|index| format!("component/{index}")))
            .collect()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_keys().join(","))
    }
}
