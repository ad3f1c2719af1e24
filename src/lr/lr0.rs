//! Canonical LR(0) collection: closure and goto over item sets whose
//! identity is the full closure set (kernel-plus-closure items), not
//! just the kernel — simpler to reason about at this crate's scale, at
//! the cost of comparing a few more items per state during dedup.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::grammar::Grammar;
use crate::lr::Lr0Item;
use crate::symbol::Symbol;

pub type ItemSet = BTreeSet<Lr0Item>;

pub struct CanonicalCollection {
    pub states: Vec<ItemSet>,
    pub transitions: BTreeMap<(usize, Symbol), usize>,
}

pub struct Lr0Builder;

impl Lr0Builder {
    pub fn closure(items: ItemSet, grammar: &Grammar) -> ItemSet {
        let mut closure = items;
        let mut changed = true;
        while changed {
            changed = false;
            let snapshot: Vec<Lr0Item> = closure.iter().copied().collect();
            for item in snapshot {
                if let Some(Symbol::Nonterminal(name)) = item.symbol_after_dot(grammar) {
                    for (index, production) in grammar.productions.iter().enumerate() {
                        if let Symbol::Nonterminal(lhs_name) = &production.lhs {
                            if lhs_name == name && closure.insert(Lr0Item::start(index)) {
                                changed = true;
                            }
                        }
                    }
                }
            }
        }
        closure
    }

    pub fn goto(items: &ItemSet, symbol: &Symbol, grammar: &Grammar) -> ItemSet {
        let moved: ItemSet = items
            .iter()
            .filter(|item| item.symbol_after_dot(grammar) == Some(symbol))
            .map(Lr0Item::advanced)
            .collect();
        Lr0Builder::closure(moved, grammar)
    }

    pub fn build(grammar: &Grammar) -> CanonicalCollection {
        let initial = Lr0Builder::closure(BTreeSet::from([Lr0Item::start(0)]), grammar);

        let mut states: Vec<ItemSet> = vec![initial.clone()];
        let mut index: BTreeMap<ItemSet, usize> = BTreeMap::new();
        index.insert(initial.clone(), 0);

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
                let target = Lr0Builder::goto(&items, symbol, grammar);
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
    fn builds_nontrivial_collection() {
        let grammar =
            GrammarLoader::from_text("E | T\n+ | id\nE -> E + T\nE -> T\nT -> id\n").unwrap();
        let collection = Lr0Builder::build(&grammar);
        assert!(collection.states.len() > 1);
        // state 0 must contain the start item.
        assert!(collection.states[0].contains(&Lr0Item::start(0)));
    }

    #[test]
    fn goto_on_undefined_symbol_is_empty() {
        let grammar = GrammarLoader::from_text("E\nid\nE -> id\n").unwrap();
        let collection = Lr0Builder::build(&grammar);
        let state0 = &collection.states[0];
        let target = Lr0Builder::goto(state0, &Symbol::terminal("+"), &grammar);
        assert!(target.is_empty());
    }
}
