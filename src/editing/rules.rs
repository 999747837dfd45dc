//! Declarative edit behavior rules
//!
//! A rule pairs a 7-position structural pattern (three neighbors before the
//! point, the point, three after) with an action name. Within a table the
//! first matching rule wins; each rule is tried with the neighborhood read
//! forward and then reversed before moving on to the next rule.
//!
//! Patterns are written with the tag bits from [`crate::editing::classify`]:
//! `OFF | UNS` is an unselected off-curve point, `ON | SEL` a selected
//! on-curve point, `ANY | NIL` anything including a missing neighbor. A
//! pattern without `SEL`/`UNS` accepts either selection state.

use crate::editing::classify::{
    StructuralTag, ANY, KIND_MASK, NIL, OFF, ON, SEL, SELECTION_MASK, SHA, SMO, UNS,
};
use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Number of positions in a rule pattern
pub const PATTERN_LENGTH: usize = 7;

/// Index of the point itself within a pattern
pub const CENTER: usize = 3;

/// Pattern for a single neighborhood position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Pattern {
    /// Anything, including a missing neighbor
    Any,
    /// The neighbor must not exist
    Nil,
    /// An existing point with one of `kinds` and one of `selection`,
    /// optionally also accepting a missing neighbor
    Points { kinds: u8, selection: u8, or_nil: bool },
}

impl Pattern {
    /// Build a pattern from OR-ed tag bits
    pub const fn from_bits(bits: u8) -> Self {
        let mut kinds = bits & KIND_MASK;
        let mut selection = bits & SELECTION_MASK;
        let or_nil = bits & NIL != 0;
        if kinds == 0 && selection == 0 {
            return if or_nil {
                Pattern::Nil
            } else {
                Pattern::Points {
                    kinds: 0,
                    selection: 0,
                    or_nil: false,
                }
            };
        }
        if kinds == 0 {
            kinds = KIND_MASK;
        }
        if selection == 0 {
            selection = SELECTION_MASK;
        }
        if kinds == KIND_MASK && selection == SELECTION_MASK && or_nil {
            return Pattern::Any;
        }
        Pattern::Points {
            kinds,
            selection,
            or_nil,
        }
    }

    /// Normalized bit form (selection bits always explicit)
    pub fn bits(self) -> u8 {
        match self {
            Pattern::Any => KIND_MASK | SELECTION_MASK | NIL,
            Pattern::Nil => NIL,
            Pattern::Points {
                kinds,
                selection,
                or_nil,
            } => kinds | selection | if or_nil { NIL } else { 0 },
        }
    }

    pub fn matches(self, tag: StructuralTag) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Nil => tag.is_nil(),
            Pattern::Points {
                kinds,
                selection,
                or_nil,
            } => {
                if tag.is_nil() {
                    or_nil
                } else {
                    tag.bits() & kinds != 0 && tag.bits() & selection != 0
                }
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = self.bits();
        let mut tokens = Vec::new();
        match bits & KIND_MASK {
            ANY => tokens.push("ANY"),
            ON => tokens.push("ON"),
            kinds => {
                for (bit, name) in [(SHA, "SHA"), (SMO, "SMO"), (OFF, "OFF")] {
                    if kinds & bit != 0 {
                        tokens.push(name);
                    }
                }
            }
        }
        match bits & SELECTION_MASK {
            SEL => tokens.push("SEL"),
            UNS => tokens.push("UNS"),
            _ => {}
        }
        if bits & NIL != 0 {
            tokens.push("NIL");
        }
        write!(f, "{}", tokens.join("|"))
    }
}

impl FromStr for Pattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut bits = 0u8;
        for token in s.split('|').map(str::trim) {
            bits |= match token {
                "SHA" => SHA,
                "SMO" => SMO,
                "OFF" => OFF,
                "ON" => ON,
                "ANY" => ANY,
                "SEL" => SEL,
                "UNS" => UNS,
                "NIL" => NIL,
                other => bail!("Unknown pattern token '{}' in '{}'", other, s),
            };
        }
        if bits & (KIND_MASK | SELECTION_MASK | NIL) == 0 {
            bail!("Empty pattern '{}'", s);
        }
        Ok(Pattern::from_bits(bits))
    }
}

impl TryFrom<String> for Pattern {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.to_string()
    }
}

/// One entry of a rule table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub pattern: [Pattern; PATTERN_LENGTH],
    /// Evaluate in the constrain pass, after every transform-pass point
    #[serde(default)]
    pub constrain: bool,
    pub action: String,
}

impl Rule {
    pub fn new(pattern: [Pattern; PATTERN_LENGTH], constrain: bool, action: impl Into<String>) -> Self {
        Self {
            pattern,
            constrain,
            action: action.into(),
        }
    }

    /// The pattern read from the other end
    pub fn reversed_pattern(&self) -> [Pattern; PATTERN_LENGTH] {
        let mut pattern = self.pattern;
        pattern.reverse();
        pattern
    }
}

/// The four named rule configurations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BehaviorName {
    Default,
    Constrain,
    Alternate,
    AlternateConstrain,
}

impl BehaviorName {
    pub const ALL: [BehaviorName; 4] = [
        BehaviorName::Default,
        BehaviorName::Constrain,
        BehaviorName::Alternate,
        BehaviorName::AlternateConstrain,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorName::Default => "default",
            BehaviorName::Constrain => "constrain",
            BehaviorName::Alternate => "alternate",
            BehaviorName::AlternateConstrain => "alternate-constrain",
        }
    }

    /// Whether drag deltas are snapped to 0/45/90 degrees
    pub fn constrains_delta(self) -> bool {
        matches!(
            self,
            BehaviorName::Constrain | BehaviorName::AlternateConstrain
        )
    }

    /// Parse a host-supplied name, falling back to `Default`
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!("Unknown edit behavior '{}', using 'default'", name);
            BehaviorName::Default
        })
    }
}

impl FromStr for BehaviorName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        BehaviorName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| anyhow!("Unknown edit behavior '{}'", s))
    }
}

impl fmt::Display for BehaviorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn rule(bits: [u8; PATTERN_LENGTH], constrain: bool, action: &str) -> Rule {
    Rule::new(bits.map(Pattern::from_bits), constrain, action)
}

// Positions:   prev3      prev2      prev1      point      next1      next2      next3

/// Rules specific to the default behavior, highest priority first
fn default_specific_rules() -> Vec<Rule> {
    vec![
        // Selected tangent point and its handle: both slide along the straight segment
        rule([ANY | NIL, ANY | NIL, ON | UNS, SMO | SEL, OFF | SEL, ANY | NIL, ANY | NIL], false, "ConstrainMiddle"),
        rule([ANY | NIL, ON | UNS, SMO | SEL, OFF | SEL, ANY | NIL, ANY | NIL, ANY | NIL], false, "ConstrainPrevAngle"),
        // Handle of a selected tangent point follows the straight segment
        rule([ANY | NIL, ON | UNS, SMO | SEL, OFF | UNS, ANY | NIL, ANY | NIL, ANY | NIL], true, "RotateNext"),
        // Selected handle of a tangent point: slide along the straight segment
        rule([ANY | NIL, ON | UNS, SMO | UNS, OFF | SEL, ANY | NIL, ANY | NIL, ANY | NIL], false, "ConstrainPrevAngle"),
        // Single off-curve between two unselected smooth points, one tangent moving
        rule([ANY | NIL, ANY | SEL, SMO | UNS, OFF | UNS, SMO | UNS, ANY, ANY | NIL], true, "HandleIntersect"),
        // Off-curve between a smooth point whose tangent moves and a selected on-curve point
        rule([ANY | NIL, ANY | SEL, SMO | UNS, OFF | UNS, ON | SEL, ANY | NIL, ANY | NIL], true, "TangentIntersectLive"),
        // Off-curve between a fixed smooth point and a selected on-curve point
        rule([ANY | NIL, ANY | UNS, SMO | UNS, OFF | UNS, ON | SEL, ANY | NIL, ANY | NIL], true, "TangentIntersect"),
        // Opposite handle of a smooth point whose other neighbor moves
        rule([ANY | NIL, ANY | SEL, SMO | UNS, OFF | UNS, ANY | NIL, ANY | NIL, ANY | NIL], true, "RotateNext"),
        // Two unselected smooth points between selected points
        rule([ANY | NIL, ANY | SEL, SMO | UNS, SMO | UNS, ANY | SEL, ANY | NIL, ANY | NIL], true, "InterpolatePrevPrevNext"),
        // Unselected smooth point between two selected points
        rule([ANY | NIL, ANY | NIL, ANY | SEL, SMO | UNS, ANY | SEL, ANY | NIL, ANY | NIL], true, "Interpolate"),
    ]
}

/// Extra rules for the constrain behavior
fn constrain_extra_rules() -> Vec<Rule> {
    vec![
        // Selected off-curve after a regular smooth point: keep the tangent, snap around next
        rule([ANY | NIL, OFF | UNS, SMO | UNS, OFF | SEL, ON | UNS, ANY | NIL, ANY | NIL], false, "ConstrainHandleIntersectPrev"),
        // Selected single off-curve between two fixed on-curve points
        rule([ANY | NIL, ANY | NIL, ON | UNS, OFF | SEL, ON | UNS, ANY | NIL, ANY | NIL], false, "ConstrainHandleIntersect"),
        // Selected handle of a fixed on-curve point
        rule([ANY | NIL, ANY | NIL, ON | UNS, OFF | SEL, ANY | NIL, ANY | NIL, ANY | NIL], false, "ConstrainHandle"),
    ]
}

/// Rules specific to the alternate behavior, highest priority first
fn alternate_specific_rules() -> Vec<Rule> {
    vec![
        // Two selected smooth points on one tangent: slide along it
        rule([ANY | NIL, OFF | UNS, SMO | SEL, SMO | SEL, OFF | UNS, ANY | NIL, ANY | NIL], false, "ConstrainMiddleTwo"),
        // Selected smooth point: slide between its fixed neighbors
        rule([ANY | NIL, ANY | NIL, ANY | UNS, SMO | SEL, OFF | UNS, ANY | NIL, ANY | NIL], false, "ConstrainMiddle"),
        // Selected tangent point and its handle: both slide along the straight segment
        rule([ANY | NIL, ANY | NIL, ON | UNS, SMO | SEL, OFF | SEL, ANY | NIL, ANY | NIL], false, "ConstrainMiddle"),
        rule([ANY | NIL, ON | UNS, SMO | SEL, OFF | SEL, ANY | NIL, ANY | NIL, ANY | NIL], false, "ConstrainPrevAngle"),
        // Handles of sliding smooth points stay put
        rule([OFF | UNS, SMO | SEL, SMO | SEL, OFF | UNS, ANY | NIL, ANY | NIL, ANY | NIL], false, "DontMove"),
        rule([ANY | NIL, ANY | UNS, SMO | SEL, OFF | UNS, ANY | NIL, ANY | NIL, ANY | NIL], false, "DontMove"),
        // Selected handle of a smooth point keeps its direction
        rule([ANY | NIL, ANY | UNS, SMO | UNS, OFF | SEL, ANY | NIL, ANY | NIL, ANY | NIL], false, "ConstrainPrevAngle"),
        rule([ANY | NIL, ANY | SEL, SMO | UNS, OFF | UNS, SMO | UNS, ANY, ANY | NIL], true, "HandleIntersect"),
        rule([ANY | NIL, ANY | SEL, SMO | UNS, OFF | UNS, ON | SEL, ANY | NIL, ANY | NIL], true, "TangentIntersectLive"),
        rule([ANY | NIL, ANY | UNS, SMO | UNS, OFF | UNS, ON | SEL, ANY | NIL, ANY | NIL], true, "TangentIntersect"),
        rule([ANY | NIL, ANY | SEL, SMO | UNS, OFF | UNS, ANY | NIL, ANY | NIL, ANY | NIL], true, "RotateNext"),
        rule([ANY | NIL, ANY | SEL, SMO | UNS, SMO | UNS, ANY | SEL, ANY | NIL, ANY | NIL], true, "InterpolatePrevPrevNext"),
        rule([ANY | NIL, ANY | NIL, ANY | SEL, SMO | UNS, ANY | SEL, ANY | NIL, ANY | NIL], true, "Interpolate"),
    ]
}

/// Extra rules for the alternate-constrain behavior
fn alternate_constrain_extra_rules() -> Vec<Rule> {
    vec![
        // A selected curve run snaps around the fixed on-curve point it starts from
        rule([ON | UNS, OFF | SEL, OFF | SEL, ON | SEL, ON | NIL, ANY | NIL, ANY | NIL], false, "ConstrainAroundPrevPrevPrev"),
        rule([ANY | NIL, ON | UNS, OFF | SEL, ON | SEL, ON | NIL, ANY | NIL, ANY | NIL], false, "ConstrainAroundPrevPrev"),
        rule([ANY | NIL, ON | UNS, OFF | SEL, OFF | SEL, ON | SEL, ANY | NIL, ANY | NIL], false, "ConstrainAroundPrevPrev"),
        // Selected handle of a fixed sharp point
        rule([ANY | NIL, ANY | NIL, SHA | UNS, OFF | SEL, ANY | NIL, ANY | NIL, ANY | NIL], false, "ConstrainHandle"),
    ]
}

/// Catch-all rules closing every table
fn fallback_rules() -> Vec<Rule> {
    vec![
        // Any other selected point moves with the pointer
        rule([ANY | NIL, ANY | NIL, ANY | NIL, ANY | SEL, ANY | NIL, ANY | NIL, ANY | NIL], false, "Move"),
        // Handles follow their selected on-curve point
        rule([ANY | NIL, ANY | NIL, ON | SEL, OFF | UNS, ANY | NIL, ANY | NIL, ANY | NIL], false, "Move"),
    ]
}

/// Built-in rule table for a behavior
///
/// The constrain variants extend their base table: the extra rules come
/// after every base rule but ahead of the catch-all fallbacks.
pub fn builtin_rules(name: BehaviorName) -> Vec<Rule> {
    let mut rules = match name {
        BehaviorName::Default | BehaviorName::Constrain => default_specific_rules(),
        BehaviorName::Alternate | BehaviorName::AlternateConstrain => alternate_specific_rules(),
    };
    match name {
        BehaviorName::Constrain => rules.extend(constrain_extra_rules()),
        BehaviorName::AlternateConstrain => rules.extend(alternate_constrain_extra_rules()),
        BehaviorName::Default | BehaviorName::Alternate => {}
    }
    rules.extend(fallback_rules());
    rules
}
