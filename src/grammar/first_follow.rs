//! FIRST and FOLLOW set computation, fixed-point iteration over a
//! grammar's productions.

use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::Grammar;
use crate::symbol::Symbol;

pub type SymbolSet = BTreeSet<Symbol>;
pub type FirstSets = BTreeMap<Symbol, SymbolSet>;
pub type FollowSets = BTreeMap<Symbol, SymbolSet>;

pub struct FirstFollow {
    pub first: FirstSets,
    pub follow: FollowSets,
}

impl FirstFollow {
    pub fn compute(grammar: &Grammar) -> Self {
        let first = compute_first_sets(grammar);
        let follow = compute_follow_sets(grammar, &first);
        FirstFollow { first, follow }
    }

    pub fn first_of(&self, symbol: &Symbol) -> SymbolSet {
        self.first.get(symbol).cloned().unwrap_or_default()
    }

    pub fn follow_of(&self, symbol: &Symbol) -> SymbolSet {
        self.follow.get(symbol).cloned().unwrap_or_default()
    }

    /// FIRST of a whole symbol string, the building block both table
    /// builders need for lookahead computation.
    pub fn first_of_string(&self, symbols: &[Symbol]) -> SymbolSet {
        first_of_string(&self.first, symbols)
    }
}

pub fn compute_first_sets(grammar: &Grammar) -> FirstSets {
    let mut first: FirstSets = FirstSets::new();

    for terminal in grammar.terminals() {
        first.insert(terminal.clone(), SymbolSet::from([terminal.clone()]));
    }
    first.insert(Symbol::Epsilon, SymbolSet::from([Symbol::Epsilon]));
    first.insert(Symbol::EndMarker, SymbolSet::from([Symbol::EndMarker]));
    for nonterminal in grammar.nonterminals() {
        first.entry(nonterminal.clone()).or_default();
    }

    let mut changed = true;
    while changed {
        changed = false;
        for production in &grammar.productions {
            let rhs_first = first_of_string(&first, &production.rhs);
            let entry = first.entry(production.lhs.clone()).or_default();
            let before = entry.len();
            entry.extend(rhs_first);
            if entry.len() != before {
                changed = true;
            }
        }
    }

    first
}

pub fn first_of_string(first: &FirstSets, symbols: &[Symbol]) -> SymbolSet {
    if symbols.is_empty() {
        return SymbolSet::from([Symbol::Epsilon]);
    }

    let mut result = SymbolSet::new();
    let mut all_nullable = true;

    for symbol in symbols {
        let symbol_first = first.get(symbol).cloned().unwrap_or_default();
        result.extend(symbol_first.iter().filter(|s| !s.is_epsilon()).cloned());
        if !symbol_first.contains(&Symbol::Epsilon) {
            all_nullable = false;
            break;
        }
    }

    if all_nullable {
        result.insert(Symbol::Epsilon);
    }
    result
}

pub fn compute_follow_sets(grammar: &Grammar, first: &FirstSets) -> FollowSets {
    let mut follow: FollowSets = FollowSets::new();
    for nonterminal in grammar.nonterminals() {
        follow.entry(nonterminal.clone()).or_default();
    }
    follow
        .entry(grammar.augmented_start_symbol())
        .or_default()
        .insert(Symbol::EndMarker);

    let mut changed = true;
    while changed {
        changed = false;
        for production in &grammar.productions {
            for (i, symbol) in production.rhs.iter().enumerate() {
                if !symbol.is_nonterminal() {
                    continue;
                }
                let rest = &production.rhs[i + 1..];
                let rest_first = first_of_string(first, rest);

                let entry = follow.entry(symbol.clone()).or_default();
                let before = entry.len();
                entry.extend(rest_first.iter().filter(|s| !s.is_epsilon()).cloned());
                if entry.len() != before {
                    changed = true;
                }

                if rest_first.contains(&Symbol::Epsilon) {
                    let lhs_follow = follow.get(&production.lhs).cloned().unwrap_or_default();
                    let entry = follow.entry(symbol.clone()).or_default();
                    let before = entry.len();
                    entry.extend(lhs_follow);
                    if entry.len() != before {
                        changed = true;
                    }
                }
            }
        }
    }

    follow
}
