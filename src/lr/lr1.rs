//! Canonical LR(1) collection: full `(core, lookahead)` item sets,
//! closure computed via FIRST*(βa), no LALR state merging — two states
//! with the same core but different lookaheads stay distinct.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::grammar::first_follow::FirstFollow;
use crate::grammar::Grammar;
use crate::lr::{Lr0Item, Lr1Item};
use crate::symbol::Symbol;

pub type ItemSet = BTreeSet<Lr1Item>;

pub struct CanonicalCollection {
    pub states: Vec<ItemSet>,
    pub transitions: BTreeMap<(usize, Symbol), usize>,
}

pub struct Lr1Builder;

impl Lr1Builder {
    pub fn closure(items: ItemSet, grammar: &Grammar, first_follow: &FirstFollow) -> ItemSet {
        let mut closure = items;
        let mut changed = true;
        while changed {
            changed = false;
            let snapshot: Vec<Lr1Item> = closure.iter().cloned().collect();
            for item in snapshot {
                let Some(Symbol::Nonterminal(name)) = item.core.symbol_after_dot(grammar) else {
                    continue;
                };
                let name = name.clone();
                let beta = &grammar.productions[item.core.production].rhs[item.core.dot + 1..];
                let mut beta_a = beta.to_vec();
                beta_a.push(item.lookahead.clone());
                let lookaheads = first_follow.first_of_string(&beta_a);

                for (index, production) in grammar.productions.iter().enumerate() {
                    if let Symbol::Nonterminal(lhs_name) = &production.lhs {
                        if lhs_name != &name {
                            continue;
                        }
                        for lookahead in &lookaheads {
                            if lookahead.is_epsilon() {
                                continue;
                            }
                            let new_item = Lr1Item {
                                core: Lr0Item::start(index),
                                lookahead: lookahead.clone(),
                            };
                            if closure.insert(new_item) {
                                changed = true;
                            }
                        }
                    }
                }
            }
        }
        closure
    }

    pub fn goto(
        items: &ItemSet,
        symbol: &Symbol,
        grammar: &Grammar,
        first_follow: &FirstFollow,
    ) -> ItemSet {
        let moved: ItemSet = items
            .iter()
            .filter(|item| item.core.symbol_after_dot(grammar) == Some(symbol))
            .map(Lr1Item::advanced)
            .collect();
        Lr1Builder::closure(moved, grammar, first_follow)
    }

    pub fn build(grammar: &Grammar) -> CanonicalCollection {
        let first_follow = FirstFollow::compute(grammar);
        let initial = Lr1Builder::closure(
            BTreeSet::from([Lr1Item {
                core: Lr0Item::start(0),
                lookahead: Symbol::EndMarker,
            }]),
            grammar,
            &first_follow,
        );

        let mut states: Vec<ItemSet> = vec![initial.clone()];
        let mut index: BTreeMap<ItemSet, usize> = BTreeMap::new();
        index.insert(initial, 0);

        let mut worklist: VecDeque<usize> = VecDeque::from([0]);
        let mut transitions: BTreeMap<(usize, Symbol), usize> = BTreeMap::new();

        let symbols: BTreeSet<Symbol> = grammar
            .terminals()
            .iter()
            .cloned()
            .chain(grammar.nonterminals().iter().cloned())
            .collect();

        while let Some(state_id) = worklist.pop_front() {
            let items = states[state_id].clone();
            for symbol in &symbols {
                let target = Lr1Builder::goto(&items, symbol, grammar, &first_follow);
                if target.is_empty() {
                    continue;
                }
                let target_id = *index.entry(target.clone()).or_insert_with(|| {
                    let id = states.len();
                    states.push(target.clone());
                    worklist.push_back(id);
                    id
                });
                transitions.insert((state_id, symbol.clone()), target_id);
            }
        }

        CanonicalCollection {
            states,
            transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::loader::GrammarLoader;

    #[test]
    fn distinct_lookaheads_keep_states_distinct() {
        let grammar = GrammarLoader::from_text(
            "S | A | B\na | b | c\nS -> A a\nS -> B b\nA -> c\nB -> c\n",
        )
        .unwrap();
        let collection = Lr1Builder::build(&grammar);
        // LALR would merge the two states that each contain [A -> c., a]
        // and [B -> c., b] by ignoring lookahead; a canonical LR(1)
        // collection never does, so it must have strictly more states
        // than the LR(0) collection over the same grammar.
        let lr0 = crate::lr::lr0::Lr0Builder::build(&grammar);
        assert!(collection.states.len() >= lr0.states.len());
    }
}
