//! A depth-first listing of an NFA's transitions, used for debug output
//! and by tooling that wants a stable row order without re-deriving a
//! traversal of its own.

use std::collections::BTreeSet;
use std::fmt;

use crate::nfa::{LexicalNfa, NfaNodeId};

#[derive(Debug, Clone)]
pub struct NfaTableRow {
    pub from: NfaNodeId,
    pub on: Option<char>, // None = epsilon
    pub to: NfaNodeId,
}

#[derive(Debug, Clone)]
pub struct NfaTable {
    pub order: Vec<NfaNodeId>,
    pub rows: Vec<NfaTableRow>,
}

impl NfaTable {
    pub fn from_lexical(nfa: &LexicalNfa) -> Self {
        let mut order = Vec::new();
        let mut visited = BTreeSet::new();
        let mut stack = vec![nfa.start];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);
            let node = &nfa.nodes[id.0];
            for &next in node.epsilon_transitions.iter().rev() {
                stack.push(next);
            }
            for &(_, next) in node.transitions.iter().rev() {
                stack.push(next);
            }
        }
        order.sort();

        let mut rows = Vec::new();
        for &id in &order {
            let node = &nfa.nodes[id.0];
            for &next in &node.epsilon_transitions {
                rows.push(NfaTableRow {
                    from: id,
                    on: None,
                    to: next,
                });
            }
            for &(c, next) in &node.transitions {
                rows.push(NfaTableRow {
                    from: id,
                    on: Some(c),
                    to: next,
                });
            }
        }

        NfaTable { order, rows }
    }
}

impl fmt::Display for NfaTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            match row.on {
                Some(c) => writeln!(f, "{} --{:?}--> {}", row.from.0, c, row.to.0)?,
                None => writeln!(f, "{} --eps--> {}", row.from.0, row.to.0)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::union_tagged;
    use crate::nfa::Nfa;

    #[test]
    fn visits_every_reachable_node_once() {
        let lexical = union_tagged(vec![(Nfa::literal('a'), 1), (Nfa::literal('b'), 2)]);
        let table = NfaTable::from_lexical(&lexical);
        assert_eq!(table.order.len(), lexical.nodes.len());
    }
}
