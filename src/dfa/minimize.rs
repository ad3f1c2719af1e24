//! Partition-refinement minimization (Moore's algorithm), adapted for a
//! lexer DFA: the initial partition splits accepting states by their
//! resolved token code, not just accepting-vs-not, since two states
//! accepting different tokens must never collapse into one state no
//! matter how similar their outgoing transitions look.

use std::collections::BTreeMap;

use crate::dfa::{Dfa, DfaNodeId, MinDfa, MinDfaNode};
use crate::support::BuildLog;

pub struct DfaMinimizer;

impl DfaMinimizer {
    pub fn minimize(dfa: &Dfa, log: BuildLog) -> MinDfa {
        let alphabet: Vec<char> = dfa
            .nodes
            .iter()
            .flat_map(|n| n.transitions.keys().copied())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut block_of: Vec<usize> = vec![0; dfa.nodes.len()];
        let mut blocks: Vec<Vec<usize>> = partition_by_signature(
            (0..dfa.nodes.len()).collect(),
            |&i| dfa.nodes[i].token_code,
        );
        assign_block_ids(&blocks, &mut block_of);

        loop {
            let mut next_blocks: Vec<Vec<usize>> = Vec::new();
            let mut changed = false;

            for block in &blocks {
                let splits = partition_by_signature(block.clone(), |&i| {
                    alphabet
                        .iter()
                        .map(|&c| dfa.nodes[i].transitions.get(&c).map(|t| block_of[t.0]))
                        .collect::<Vec<_>>()
                });
                if splits.len() > 1 {
                    changed = true;
                }
                next_blocks.extend(splits);
            }

            blocks = next_blocks;
            assign_block_ids(&blocks, &mut block_of);

            if !changed {
                break;
            }

            log.trace(BuildLog::Verbose, || {
                format!("partition refinement pass produced {} blocks", blocks.len())
            });
        }

        let mut nodes = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let representative = block[0];
            let mut transitions = BTreeMap::new();
            for &c in &alphabet {
                if let Some(target) = dfa.nodes[representative].transitions.get(&c) {
                    transitions.insert(c, block_of[target.0]);
                }
            }
            nodes.push(MinDfaNode {
                member_states: block.iter().map(|&i| DfaNodeId(i)).collect(),
                transitions,
                token_code: dfa.nodes[representative].token_code,
            });
        }

        let start = block_of[dfa.start.0];
        log.trace(BuildLog::Default, || {
            format!(
                "minimization reduced {} states to {} states",
                dfa.nodes.len(),
                nodes.len()
            )
        });

        MinDfa { nodes, start }
    }
}

fn assign_block_ids(blocks: &[Vec<usize>], block_of: &mut [usize]) {
    for (block_id, block) in blocks.iter().enumerate() {
        for &state in block {
            block_of[state] = block_id;
        }
    }
}

/// Groups `items` by `signature`, preserving each group's first-seen
/// order and ordering groups by first appearance — deterministic without
/// requiring `T: Ord`.
fn partition_by_signature<T: Eq, F: Fn(&usize) -> T>(
    items: Vec<usize>,
    signature: F,
) -> Vec<Vec<usize>> {
    let mut groups: Vec<(T, Vec<usize>)> = Vec::new();
    for item in items {
        let sig = signature(&item);
        match groups.iter_mut().find(|(s, _)| *s == sig) {
            Some((_, members)) => members.push(item),
            None => groups.push((sig, vec![item])),
        }
    }
    groups.into_iter().map(|(_, members)| members).collect()
}
