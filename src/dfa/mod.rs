//! Deterministic automata derived from a [`crate::nfa::LexicalNfa`]:
//! subset construction ([`subset`]) followed by partition-refinement
//! minimization ([`minimize`]).

pub mod minimize;
pub mod subset;

use std::collections::BTreeMap;

use crate::nfa::NfaNodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DfaNodeId(pub usize);

#[derive(Debug, Clone)]
pub struct DfaNode {
    pub nfa_states: std::collections::BTreeSet<NfaNodeId>,
    pub transitions: BTreeMap<char, DfaNodeId>,
    /// The token code of the highest-priority accepting NFA state in
    /// `nfa_states`, or `None` if this state accepts nothing.
    pub token_code: Option<i64>,
}

impl DfaNode {
    pub fn is_accepting(&self) -> bool {
        self.token_code.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Dfa {
    pub nodes: Vec<DfaNode>,
    pub start: DfaNodeId,
}

#[derive(Debug, Clone)]
pub struct MinDfaNode {
    pub member_states: std::collections::BTreeSet<DfaNodeId>,
    pub transitions: BTreeMap<char, usize>,
    pub token_code: Option<i64>,
}

impl MinDfaNode {
    pub fn is_accepting(&self) -> bool {
        self.token_code.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct MinDfa {
    pub nodes: Vec<MinDfaNode>,
    pub start: usize,
}

impl MinDfa {
    /// Run `input` against this automaton from the start state, returning
    /// the token code of the longest accepted prefix and its length, if
    /// any prefix of `input` is accepted.
    pub fn longest_match(&self, input: &str) -> Option<(i64, usize)> {
        let mut state = self.start;
        let mut best: Option<(i64, usize)> = None;
        let mut consumed = 0usize;
        if let Some(code) = self.nodes[state].token_code {
            best = Some((code, 0));
        }
        for c in input.chars() {
            let next = match self.nodes[state].transitions.get(&c) {
                Some(&next) => next,
                None => break,
            };
            state = next;
            consumed += c.len_utf8();
            if let Some(code) = self.nodes[state].token_code {
                best = Some((code, consumed));
            }
        }
        best
    }
}
