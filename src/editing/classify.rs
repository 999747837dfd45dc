//! Point classification for edit behavior matching
//!
//! Every contour point is reduced to a [`StructuralTag`]: its kind (sharp,
//! smooth or off-curve) combined with its selection state. Positions past
//! the end of an open contour get the [`StructuralTag::NIL`] tag.

use crate::font_source::PointKind;
use kurbo::Point;
use std::fmt;

/// Bit for sharp on-curve points
pub const SHA: u8 = 0x01;
/// Bit for smooth on-curve points
pub const SMO: u8 = 0x02;
/// Bit for off-curve points
pub const OFF: u8 = 0x04;
/// Bit for selected points
pub const SEL: u8 = 0x08;
/// Bit for unselected points
pub const UNS: u8 = 0x10;
/// Bit for a position that does not exist
pub const NIL: u8 = 0x20;

/// Any on-curve point
pub const ON: u8 = SHA | SMO;
/// Any kind of point
pub const ANY: u8 = SHA | SMO | OFF;

pub(crate) const KIND_MASK: u8 = ANY;
pub(crate) const SELECTION_MASK: u8 = SEL | UNS;

/// Concrete tag of one neighborhood position
///
/// Always either exactly one kind bit plus one selection bit, or `NIL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuralTag(u8);

impl StructuralTag {
    pub const NIL: StructuralTag = StructuralTag(NIL);

    /// Every concrete tag, ordered by [`StructuralTag::slot`]
    pub const CONCRETE: [StructuralTag; 7] = [
        StructuralTag(SHA | SEL),
        StructuralTag(SHA | UNS),
        StructuralTag(SMO | SEL),
        StructuralTag(SMO | UNS),
        StructuralTag(OFF | SEL),
        StructuralTag(OFF | UNS),
        StructuralTag(NIL),
    ];

    pub fn new(kind: PointKind, selected: bool) -> Self {
        let kind_bit = match kind {
            PointKind::Sharp => SHA,
            PointKind::Smooth => SMO,
            PointKind::OffCurve => OFF,
        };
        StructuralTag(kind_bit | if selected { SEL } else { UNS })
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_nil(self) -> bool {
        self.0 == NIL
    }

    pub fn is_selected(self) -> bool {
        self.0 & SEL != 0
    }

    /// Dense index in `0..7`, used as a branch index by the match tree
    pub fn slot(self) -> usize {
        if self.is_nil() {
            return 6;
        }
        let kind = match self.0 & KIND_MASK {
            SHA => 0,
            SMO => 1,
            _ => 2,
        };
        kind * 2 + usize::from(self.0 & UNS != 0)
    }
}

impl fmt::Display for StructuralTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            return write!(f, "NIL");
        }
        let kind = match self.0 & KIND_MASK {
            SHA => "SHA",
            SMO => "SMO",
            _ => "OFF",
        };
        let selection = if self.is_selected() { "SEL" } else { "UNS" };
        write!(f, "{kind}|{selection}")
    }
}

/// Immutable per-point snapshot taken when a gesture starts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointDescriptor {
    pub position: Point,
    pub kind: PointKind,
    pub selected: bool,
}

impl PointDescriptor {
    pub fn tag(&self) -> StructuralTag {
        StructuralTag::new(self.kind, self.selected)
    }
}

/// Tag every point of one contour
pub fn classify_contour(points: &[PointDescriptor]) -> Vec<StructuralTag> {
    points.iter().map(PointDescriptor::tag).collect()
}
