//! Thompson-construction NFA: fragments built by [`builder::NfaBuilder`]
//! and combined by the operators in this module.
//!
//! A single-pattern [`Nfa`] has exactly one start node and one accept
//! node, as Thompson's construction guarantees at every step. A lexer
//! built from several token rules needs more than one accept node (one
//! per rule, so the token code survives); [`LexicalNfa`] is the
//! multi-accept sibling used for that case, built by [`union_tagged`]
//! rather than by the ordinary binary `union`.

pub mod builder;
pub mod table;

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NfaNodeId(pub usize);

#[derive(Debug, Clone, Default)]
pub struct NfaNode {
    pub epsilon_transitions: Vec<NfaNodeId>,
    pub transitions: Vec<(char, NfaNodeId)>,
}

/// A Thompson fragment: `nodes[start.0]` has no incoming edges from
/// outside the fragment, `nodes[accept.0]` has no outgoing edges.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub nodes: Vec<NfaNode>,
    pub start: NfaNodeId,
    pub accept: NfaNodeId,
}

impl Nfa {
    fn with_nodes(n: usize) -> Self {
        Nfa {
            nodes: vec![NfaNode::default(); n],
            start: NfaNodeId(0),
            accept: NfaNodeId(n.saturating_sub(1)),
        }
    }

    fn add_node(&mut self) -> NfaNodeId {
        let id = NfaNodeId(self.nodes.len());
        self.nodes.push(NfaNode::default());
        id
    }

    fn add_epsilon(&mut self, from: NfaNodeId, to: NfaNodeId) {
        self.nodes[from.0].epsilon_transitions.push(to);
    }

    fn add_transition(&mut self, from: NfaNodeId, c: char, to: NfaNodeId) {
        self.nodes[from.0].transitions.push((c, to));
    }

    pub fn literal(c: char) -> Self {
        let mut nfa = Nfa::with_nodes(2);
        nfa.start = NfaNodeId(0);
        nfa.accept = NfaNodeId(1);
        nfa.add_transition(NfaNodeId(0), c, NfaNodeId(1));
        nfa
    }

    pub fn empty() -> Self {
        let mut nfa = Nfa::with_nodes(2);
        nfa.start = NfaNodeId(0);
        nfa.accept = NfaNodeId(1);
        nfa.add_epsilon(NfaNodeId(0), NfaNodeId(1));
        nfa
    }

    /// Splice `other`'s node pool onto the end of `self`'s, returning the
    /// id offset so callers can translate `other`'s old ids.
    fn absorb(&mut self, other: Nfa) -> usize {
        let offset = self.nodes.len();
        self.nodes.extend(other.nodes);
        for node in &mut self.nodes[offset..] {
            for e in &mut node.epsilon_transitions {
                e.0 += offset;
            }
            for (_, t) in &mut node.transitions {
                t.0 += offset;
            }
        }
        offset
    }

    pub fn concat(a: Nfa, b: Nfa) -> Nfa {
        let mut out = a;
        let a_accept = out.accept;
        let offset = out.absorb(b.clone());
        out.add_epsilon(a_accept, NfaNodeId(b.start.0 + offset));
        out.accept = NfaNodeId(b.accept.0 + offset);
        out
    }

    /// Generic binary union: a fresh start/accept pair, each branch's own
    /// accept flag subsumed into the new one. Not used for lexer-level
    /// composition of independently tagged token rules — see
    /// [`union_tagged`] for that.
    pub fn union(a: Nfa, b: Nfa) -> Nfa {
        let mut out = Nfa::with_nodes(0);
        let new_start = out.add_node();
        let a_offset = out.absorb(a.clone());
        let b_offset = out.absorb(b.clone());
        let new_accept = out.add_node();
        out.add_epsilon(new_start, NfaNodeId(a.start.0 + a_offset));
        out.add_epsilon(new_start, NfaNodeId(b.start.0 + b_offset));
        out.add_epsilon(NfaNodeId(a.accept.0 + a_offset), new_accept);
        out.add_epsilon(NfaNodeId(b.accept.0 + b_offset), new_accept);
        out.start = new_start;
        out.accept = new_accept;
        out
    }

    pub fn star(a: Nfa) -> Nfa {
        let mut out = Nfa::with_nodes(0);
        let new_start = out.add_node();
        let a_offset = out.absorb(a.clone());
        let new_accept = out.add_node();
        out.add_epsilon(new_start, NfaNodeId(a.start.0 + a_offset));
        out.add_epsilon(new_start, new_accept);
        out.add_epsilon(NfaNodeId(a.accept.0 + a_offset), NfaNodeId(a.start.0 + a_offset));
        out.add_epsilon(NfaNodeId(a.accept.0 + a_offset), new_accept);
        out.start = new_start;
        out.accept = new_accept;
        out
    }

    pub fn optional(a: Nfa) -> Nfa {
        Nfa::union(a, Nfa::empty())
    }

    pub fn epsilon_closure(&self, states: &BTreeSet<NfaNodeId>) -> BTreeSet<NfaNodeId> {
        let mut closure: BTreeSet<NfaNodeId> = states.clone();
        let mut stack: Vec<NfaNodeId> = states.iter().copied().collect();
        while let Some(s) = stack.pop() {
            for &next in &self.nodes[s.0].epsilon_transitions {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }
        closure
    }

    pub fn step(&self, states: &BTreeSet<NfaNodeId>, c: char) -> BTreeSet<NfaNodeId> {
        let mut out = BTreeSet::new();
        for &s in states {
            for &(edge_char, target) in &self.nodes[s.0].transitions {
                if edge_char == c {
                    out.insert(target);
                }
            }
        }
        out
    }

    /// Every literal char that labels some transition in this fragment,
    /// i.e. the DFA construction's alphabet.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.nodes
            .iter()
            .flat_map(|n| n.transitions.iter().map(|(c, _)| *c))
            .collect()
    }
}

/// A lexer-level NFA: one arena, several accept nodes, each tagged with
/// the token code of the rule alternative it closes.
#[derive(Debug, Clone)]
pub struct LexicalNfa {
    pub nodes: Vec<NfaNode>,
    pub start: NfaNodeId,
    /// accept node id -> token code. Smallest node id wins when a DFA
    /// state's NFA-node set contains more than one of these (earliest
    /// declared rule takes priority, standard lex-generator semantics).
    pub accepts: BTreeMap<NfaNodeId, i64>,
}

impl LexicalNfa {
    pub fn epsilon_closure(&self, states: &BTreeSet<NfaNodeId>) -> BTreeSet<NfaNodeId> {
        let mut closure: BTreeSet<NfaNodeId> = states.clone();
        let mut stack: Vec<NfaNodeId> = states.iter().copied().collect();
        while let Some(s) = stack.pop() {
            for &next in &self.nodes[s.0].epsilon_transitions {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }
        closure
    }

    pub fn step(&self, states: &BTreeSet<NfaNodeId>, c: char) -> BTreeSet<NfaNodeId> {
        let mut out = BTreeSet::new();
        for &s in states {
            for &(edge_char, target) in &self.nodes[s.0].transitions {
                if edge_char == c {
                    out.insert(target);
                }
            }
        }
        out
    }

    pub fn alphabet(&self) -> BTreeSet<char> {
        self.nodes
            .iter()
            .flat_map(|n| n.transitions.iter().map(|(c, _)| *c))
            .collect()
    }

    /// Smallest-id accepting node, and its token code, among `states`.
    pub fn resolve_token_code(&self, states: &BTreeSet<NfaNodeId>) -> Option<i64> {
        states
            .iter()
            .filter_map(|id| self.accepts.get(id).map(|code| (*id, *code)))
            .min_by_key(|(id, _)| *id)
            .map(|(_, code)| code)
    }
}

/// Combine each `(fragment, token_code)` pair into one [`LexicalNfa`] via
/// a synthetic start node epsilon-connected to every fragment's start,
/// keeping every fragment's own accept node (and hence its token code)
/// distinct — unlike [`Nfa::union`], which collapses all branches onto
/// one shared accept node.
pub fn union_tagged(fragments: Vec<(Nfa, i64)>) -> LexicalNfa {
    let mut nodes: Vec<NfaNode> = vec![NfaNode::default()];
    let start = NfaNodeId(0);
    let mut accepts = BTreeMap::new();

    for (fragment, code) in fragments {
        let offset = nodes.len();
        nodes.extend(fragment.nodes);
        for node in &mut nodes[offset..] {
            for e in &mut node.epsilon_transitions {
                e.0 += offset;
            }
            for (_, t) in &mut node.transitions {
                t.0 += offset;
            }
        }
        nodes[start.0]
            .epsilon_transitions
            .push(NfaNodeId(fragment.start.0 + offset));
        accepts.insert(NfaNodeId(fragment.accept.0 + offset), code);
    }

    LexicalNfa {
        nodes,
        start,
        accepts,
    }
}
