//! Per-point rule lookup
//!
//! Resolves the seven-point neighborhood of one contour point and asks the
//! compiled match tree which rule governs it.

use crate::editing::classify::StructuralTag;
use crate::editing::match_tree::{MatchDirection, MatchTree};
use crate::editing::rules::{CENTER, PATTERN_LENGTH};

/// Contour-local neighbor indices around a center point
///
/// Closed contours wrap around (short contours may repeat indices); open
/// contours yield `None` past either end.
pub fn neighbor_indices(len: usize, closed: bool, center: usize) -> [Option<usize>; PATTERN_LENGTH] {
    std::array::from_fn(|position| {
        let offset = position as isize - CENTER as isize;
        let index = center as isize + offset;
        if closed {
            Some(index.rem_euclid(len as isize) as usize)
        } else {
            (0..len as isize).contains(&index).then_some(index as usize)
        }
    })
}

/// The rule governing one point, with its neighbors in action order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointMatch {
    pub rule: usize,
    pub direction: MatchDirection,
    /// prevPrevPrev .. nextNextNext as seen by the action
    pub indices: [Option<usize>; PATTERN_LENGTH],
}

/// Match the point at `center` of a classified contour
pub fn match_point(
    tree: &MatchTree,
    tags: &[StructuralTag],
    closed: bool,
    center: usize,
) -> Option<PointMatch> {
    if center >= tags.len() {
        return None;
    }
    let mut indices = neighbor_indices(tags.len(), closed, center);
    let neighborhood = indices.map(|index| index.map_or(StructuralTag::NIL, |index| tags[index]));
    let found = tree.lookup(&neighborhood)?;
    if found.direction == MatchDirection::Reverse {
        indices.reverse();
    }
    Some(PointMatch {
        rule: found.rule,
        direction: found.direction,
        indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::classify::{ANY, NIL, OFF, ON, SEL, UNS};
    use crate::editing::rules::{Pattern, Rule};

    #[test]
    fn test_closed_contour_wraps() {
        assert_eq!(
            neighbor_indices(5, true, 0),
            [Some(2), Some(3), Some(4), Some(0), Some(1), Some(2), Some(3)]
        );
        // Two points repeat around the loop
        assert_eq!(
            neighbor_indices(2, true, 1),
            [Some(0), Some(1), Some(0), Some(1), Some(0), Some(1), Some(0)]
        );
    }

    #[test]
    fn test_open_contour_ends_are_nil() {
        assert_eq!(
            neighbor_indices(4, false, 1),
            [None, None, Some(0), Some(1), Some(2), Some(3), None]
        );
        assert_eq!(
            neighbor_indices(1, false, 0),
            [None, None, None, Some(0), None, None, None]
        );
    }

    #[test]
    fn test_reverse_match_reorders_indices() {
        let any = ANY | NIL;
        let rules = vec![Rule::new(
            [any, any, ON | UNS, OFF | SEL, any, any, any].map(Pattern::from_bits),
            false,
            "ConstrainHandle",
        )];
        let tree = MatchTree::build(&rules);
        let sharp_uns = StructuralTag::CONCRETE[1];
        let off_sel = StructuralTag::CONCRETE[4];
        let off_uns = StructuralTag::CONCRETE[5];
        // open: off(sel) off(uns) sharp(uns); the selected handle's anchor comes after it
        let tags = [off_uns, off_sel, sharp_uns];
        let found = match_point(&tree, &tags, false, 1).unwrap();
        assert_eq!(found.direction, MatchDirection::Reverse);
        assert_eq!(found.indices[CENTER - 1], Some(2));
        assert_eq!(found.indices[CENTER], Some(1));
        assert_eq!(found.indices[CENTER + 1], Some(0));
        assert_eq!(match_point(&tree, &tags, false, 0), None);
        assert_eq!(match_point(&tree, &tags, false, 7), None);
    }
}
