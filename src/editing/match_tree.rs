//! Compiled decision tree over neighborhood tags
//!
//! A rule table is compiled once into a DAG that branches on one
//! neighborhood position per level. Every node is keyed by the depth it
//! sits at and the ordered set of candidates still alive there, so
//! identical subtrees are shared. A lookup costs at most seven branch
//! steps regardless of the table size.

use crate::editing::classify::StructuralTag;
use crate::editing::rules::{Pattern, Rule, PATTERN_LENGTH};
use std::collections::HashMap;
use tracing::debug;

const BRANCH_COUNT: usize = StructuralTag::CONCRETE.len();

/// Which way a rule pattern was read when it matched
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchDirection {
    Forward,
    /// The neighborhood was matched against the mirrored pattern
    Reverse,
}

/// The winning rule for a neighborhood
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RuleMatch {
    /// Index into the rule table
    pub rule: usize,
    pub direction: MatchDirection,
}

/// Candidate order: rule 0 forward, rule 0 reversed, rule 1 forward, ...
type Candidate = u16;

fn candidate_match(candidate: Candidate) -> RuleMatch {
    RuleMatch {
        rule: usize::from(candidate / 2),
        direction: if candidate % 2 == 0 {
            MatchDirection::Forward
        } else {
            MatchDirection::Reverse
        },
    }
}

type NodeId = u32;

#[derive(Clone, Debug)]
enum Node {
    Leaf(Option<RuleMatch>),
    Branch {
        position: usize,
        children: [NodeId; BRANCH_COUNT],
    },
}

/// Decision DAG compiled from one rule table
#[derive(Clone, Debug)]
pub struct MatchTree {
    nodes: Vec<Node>,
    root: NodeId,
}

struct Builder {
    patterns: Vec<[Pattern; PATTERN_LENGTH]>,
    nodes: Vec<Node>,
    memo: HashMap<(usize, Vec<Candidate>), NodeId>,
    leaves: HashMap<Candidate, NodeId>,
    empty_leaf: NodeId,
}

impl Builder {
    fn new(rules: &[Rule]) -> Self {
        let patterns = rules
            .iter()
            .flat_map(|rule| [rule.pattern, rule.reversed_pattern()])
            .collect();
        Self {
            patterns,
            nodes: vec![Node::Leaf(None)],
            memo: HashMap::new(),
            leaves: HashMap::new(),
            empty_leaf: 0,
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        (self.nodes.len() - 1) as NodeId
    }

    fn build(&mut self, depth: usize, candidates: Vec<Candidate>) -> NodeId {
        let Some(&first) = candidates.first() else {
            return self.empty_leaf;
        };
        // The best remaining candidate matches whatever follows
        let rest = &self.patterns[usize::from(first)][depth..];
        if rest.iter().all(|pattern| *pattern == Pattern::Any) {
            return self.leaf(first);
        }
        if let Some(&id) = self.memo.get(&(depth, candidates.clone())) {
            return id;
        }

        let mut children = [self.empty_leaf; BRANCH_COUNT];
        for (slot, tag) in StructuralTag::CONCRETE.iter().enumerate() {
            let surviving: Vec<Candidate> = candidates
                .iter()
                .copied()
                .filter(|&candidate| self.patterns[usize::from(candidate)][depth].matches(*tag))
                .collect();
            children[slot] = self.build(depth + 1, surviving);
        }
        let id = if children.iter().all(|child| *child == children[0]) {
            // Every branch leads to the same place
            children[0]
        } else {
            self.push(Node::Branch {
                position: depth,
                children,
            })
        };
        self.memo.insert((depth, candidates), id);
        id
    }

    fn leaf(&mut self, candidate: Candidate) -> NodeId {
        if let Some(&id) = self.leaves.get(&candidate) {
            return id;
        }
        let id = self.push(Node::Leaf(Some(candidate_match(candidate))));
        self.leaves.insert(candidate, id);
        id
    }
}

impl MatchTree {
    /// Compile a rule table
    pub fn build(rules: &[Rule]) -> Self {
        let mut builder = Builder::new(rules);
        let all: Vec<Candidate> = (0..builder.patterns.len() as Candidate).collect();
        let root = builder.build(0, all);
        debug!(
            "Compiled {} rules into a match tree with {} nodes",
            rules.len(),
            builder.nodes.len()
        );
        Self {
            nodes: builder.nodes,
            root,
        }
    }

    /// Find the first rule matching a neighborhood
    pub fn lookup(&self, tags: &[StructuralTag; PATTERN_LENGTH]) -> Option<RuleMatch> {
        let mut node = self.root;
        loop {
            match &self.nodes[node as usize] {
                Node::Leaf(result) => return *result,
                Node::Branch { position, children } => {
                    node = children[tags[*position].slot()];
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Reference matcher: try each rule forward, then reversed, in order
    pub fn linear_scan(rules: &[Rule], tags: &[StructuralTag; PATTERN_LENGTH]) -> Option<RuleMatch> {
        let matches = |pattern: &[Pattern; PATTERN_LENGTH]| {
            pattern.iter().zip(tags).all(|(pattern, tag)| pattern.matches(*tag))
        };
        rules.iter().enumerate().find_map(|(index, rule)| {
            if matches(&rule.pattern) {
                Some(RuleMatch {
                    rule: index,
                    direction: MatchDirection::Forward,
                })
            } else if matches(&rule.reversed_pattern()) {
                Some(RuleMatch {
                    rule: index,
                    direction: MatchDirection::Reverse,
                })
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::classify::{ANY, NIL, OFF, ON, SEL, SMO, UNS};
    use crate::editing::rules::{builtin_rules, BehaviorName};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn rule(bits: [u8; PATTERN_LENGTH], action: &str) -> Rule {
        Rule::new(bits.map(Pattern::from_bits), false, action)
    }

    fn tags(slots: [usize; PATTERN_LENGTH]) -> [StructuralTag; PATTERN_LENGTH] {
        slots.map(|slot| StructuralTag::CONCRETE[slot])
    }

    #[test]
    fn test_empty_table_never_matches() {
        let tree = MatchTree::build(&[]);
        assert_eq!(tree.lookup(&tags([6; 7])), None);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_reverse_match() {
        let any = ANY | NIL;
        let rules = vec![rule([any, any, ON | UNS, OFF | SEL, any, any, any], "Handle")];
        let tree = MatchTree::build(&rules);

        // sharp unselected before a selected off-curve
        let forward = tags([6, 6, 1, 4, 6, 6, 6]);
        assert_eq!(
            tree.lookup(&forward),
            Some(RuleMatch {
                rule: 0,
                direction: MatchDirection::Forward
            })
        );
        // same shape, mirrored
        let mirrored = tags([6, 6, 6, 4, 3, 6, 6]);
        assert_eq!(
            tree.lookup(&mirrored),
            Some(RuleMatch {
                rule: 0,
                direction: MatchDirection::Reverse
            })
        );
        assert_eq!(tree.lookup(&tags([6, 6, 5, 4, 5, 6, 6])), None);
    }

    #[test]
    fn test_first_rule_wins() {
        let any = ANY | NIL;
        let rules = vec![
            rule([any, any, any, SMO | SEL, any, any, any], "First"),
            rule([any, any, any, ANY | SEL, any, any, any], "Second"),
        ];
        let tree = MatchTree::build(&rules);
        assert_eq!(tree.lookup(&tags([6, 6, 6, 2, 6, 6, 6])).unwrap().rule, 0);
        assert_eq!(tree.lookup(&tags([6, 6, 6, 0, 6, 6, 6])).unwrap().rule, 1);
        assert_eq!(tree.lookup(&tags([6, 6, 6, 1, 6, 6, 6])), None);
    }

    #[test]
    fn test_builtin_tables_agree_with_linear_scan() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for name in BehaviorName::ALL {
            let rules = builtin_rules(name);
            let tree = MatchTree::build(&rules);
            for _ in 0..5000 {
                let neighborhood = tags(std::array::from_fn(|_| rng.gen_range(0..BRANCH_COUNT)));
                assert_eq!(
                    tree.lookup(&neighborhood),
                    MatchTree::linear_scan(&rules, &neighborhood),
                    "{name}: mismatch for {neighborhood:?}"
                );
            }
        }
    }

    #[test]
    fn test_subtrees_are_shared() {
        let rules = builtin_rules(BehaviorName::AlternateConstrain);
        let tree = MatchTree::build(&rules);
        // A full tree would need a node for every 6-tag prefix
        assert!(
            tree.node_count() < BRANCH_COUNT.pow(6),
            "{} nodes",
            tree.node_count()
        );
    }
}
