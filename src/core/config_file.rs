//! Edit behavior configuration
//!
//! Holds the four named rule tables, compiled once into match trees, and
//! the action library they refer to. Tables can be overridden from
//! ~/.config/bezy/edit-behavior.json; tables missing from the file keep
//! their built-in rules.

use crate::editing::actions::ActionLibrary;
use crate::editing::match_tree::MatchTree;
use crate::editing::rules::{builtin_rules, BehaviorName, Rule};
use crate::geometry::{constrain_hor_ver_diag, unconstrained};
use anyhow::{Context, Result};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// One rule table as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableFile {
    /// Snap drag deltas to 0/45/90 degrees; defaults per behavior name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    constrain_delta: Option<bool>,
    rules: Vec<Rule>,
}

/// A rule table with its compiled match tree
#[derive(Debug, Clone)]
pub struct BehaviorTable {
    pub name: BehaviorName,
    pub rules: Vec<Rule>,
    pub constrain_delta: bool,
    pub match_tree: MatchTree,
}

impl BehaviorTable {
    pub fn new(name: BehaviorName, rules: Vec<Rule>, constrain_delta: bool) -> Self {
        let match_tree = MatchTree::build(&rules);
        Self {
            name,
            rules,
            constrain_delta,
            match_tree,
        }
    }

    pub fn builtin(name: BehaviorName) -> Self {
        Self::new(name, builtin_rules(name), name.constrains_delta())
    }

    /// Vector snap for drag deltas and handle directions
    pub fn delta_constraint(&self) -> fn(Vec2) -> Vec2 {
        if self.constrain_delta {
            constrain_hor_ver_diag
        } else {
            unconstrained
        }
    }
}

/// Read-only configuration shared by every behavior factory
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    tables: [BehaviorTable; 4],
    actions: ActionLibrary,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BehaviorConfig {
    pub fn builtin() -> Self {
        Self {
            tables: BehaviorName::ALL.map(BehaviorTable::builtin),
            actions: ActionLibrary::builtin(),
        }
    }

    /// Process-wide built-in configuration, compiled on first use
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<BehaviorConfig>> = OnceLock::new();
        SHARED
            .get_or_init(|| Arc::new(BehaviorConfig::builtin()))
            .clone()
    }

    /// Replace the action library
    pub fn with_actions(mut self, actions: ActionLibrary) -> Self {
        self.actions = actions;
        self
    }

    /// Replace one table
    pub fn with_table(mut self, table: BehaviorTable) -> Self {
        let index = table.name as usize;
        self.tables[index] = table;
        self
    }

    pub fn table(&self, name: BehaviorName) -> &BehaviorTable {
        &self.tables[name as usize]
    }

    pub fn actions(&self) -> &ActionLibrary {
        &self.actions
    }

    /// Parse tables from JSON, keyed by behavior name
    pub fn from_json_str(json: &str) -> Result<Self> {
        let files: BTreeMap<String, TableFile> =
            serde_json::from_str(json).context("Failed to parse edit behavior config")?;
        let mut config = Self::builtin();
        for (key, file) in files {
            let Ok(name) = key.parse::<BehaviorName>() else {
                warn!("Ignoring unknown edit behavior '{}' in config", key);
                continue;
            };
            let constrain_delta = file.constrain_delta.unwrap_or(name.constrains_delta());
            debug!("Using {} configured rules for '{}'", file.rules.len(), name);
            config = config.with_table(BehaviorTable::new(name, file.rules, constrain_delta));
        }
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        let files: BTreeMap<&str, TableFile> = self
            .tables
            .iter()
            .map(|table| {
                (
                    table.name.as_str(),
                    TableFile {
                        constrain_delta: Some(table.constrain_delta),
                        rules: table.rules.clone(),
                    },
                )
            })
            .collect();
        Ok(serde_json::to_string_pretty(&files)?)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_json_str(&contents)
            .with_context(|| format!("Invalid edit behavior config {}", path.display()))?;
        debug!("Loaded edit behavior config from {:?}", path);
        Ok(config)
    }

    /// Write every table to a config file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_string()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Saved edit behavior config to {:?}", path);
        Ok(())
    }

    /// Path of the user config file
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("bezy").join("edit-behavior.json")
    }

    /// The user's tables if present and valid, the built-in ones otherwise
    pub fn load_user_or_builtin() -> Self {
        Self::load_or_builtin(&Self::config_path())
    }

    pub fn load_or_builtin(path: &Path) -> Self {
        if !path.exists() {
            return Self::builtin();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Using built-in edit behaviors: {:#}", e);
                Self::builtin()
            }
        }
    }
}
