//! Subset construction: turns a [`LexicalNfa`] into a [`Dfa`] by tracking
//! sets of simultaneously-live NFA states.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::dfa::{Dfa, DfaNode, DfaNodeId};
use crate::nfa::{LexicalNfa, NfaNodeId};
use crate::support::BuildLog;

pub struct SubsetConstructor;

impl SubsetConstructor {
    pub fn build(nfa: &LexicalNfa, log: BuildLog) -> Dfa {
        let start_set = nfa.epsilon_closure(&BTreeSet::from([nfa.start]));
        let alphabet: Vec<char> = nfa.alphabet().into_iter().collect();

        let mut index: BTreeMap<BTreeSet<NfaNodeId>, DfaNodeId> = BTreeMap::new();
        let mut nodes: Vec<DfaNode> = Vec::new();

        let start_id = DfaNodeId(0);
        index.insert(start_set.clone(), start_id);
        nodes.push(DfaNode {
            nfa_states: start_set.clone(),
            transitions: BTreeMap::new(),
            token_code: nfa.resolve_token_code(&start_set),
        });

        let mut worklist: VecDeque<BTreeSet<NfaNodeId>> = VecDeque::new();
        worklist.push_back(start_set);

        while let Some(current) = worklist.pop_front() {
            let current_id = *index.get(&current).expect("enqueued states are indexed");
            for &c in &alphabet {
                let moved = nfa.step(&current, c);
                if moved.is_empty() {
                    continue;
                }
                let target_set = nfa.epsilon_closure(&moved);
                let target_id = *index.entry(target_set.clone()).or_insert_with(|| {
                    let id = DfaNodeId(nodes.len());
                    nodes.push(DfaNode {
                        nfa_states: target_set.clone(),
                        transitions: BTreeMap::new(),
                        token_code: nfa.resolve_token_code(&target_set),
                    });
                    worklist.push_back(target_set.clone());
                    id
                });
                nodes[current_id.0].transitions.insert(c, target_id);
                log.trace(BuildLog::Verbose, || {
                    format!("dfa state {} --{:?}--> {}", current_id.0, c, target_id.0)
                });
            }
        }

        log.trace(BuildLog::Default, || {
            format!("subset construction produced {} states", nodes.len())
        });

        Dfa {
            nodes,
            start: start_id,
        }
    }
}
