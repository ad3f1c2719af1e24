//! LR(1) table construction: reduce actions placed at each item's own
//! carried lookahead rather than FOLLOW(lhs). Unlike the SLR(1) builder,
//! no conflict is resolved silently here — both shift-reduce and
//! reduce-reduce conflicts make the grammar not LR(1).

use std::collections::BTreeMap;

use crate::error::{Conflict, ConflictKind};
use crate::grammar::Grammar;
use crate::lr::lr1::Lr1Builder;
use crate::lr::{ActionCell, ParseTable};
use crate::symbol::Symbol;
use crate::BuildError;

pub struct Lr1TableBuilder;

impl Lr1TableBuilder {
    pub fn build(grammar: &Grammar) -> Result<ParseTable, BuildError> {
        let collection = Lr1Builder::build(grammar);

        let mut cells: BTreeMap<(usize, Symbol), ActionCell> = BTreeMap::new();
        let mut conflicts: Vec<Conflict> = Vec::new();

        for (state_id, items) in collection.states.iter().enumerate() {
            for item in items {
                if item.core.is_complete(grammar) {
                    if item.core.production == 0 {
                        insert(
                            &mut cells,
                            &mut conflicts,
                            state_id,
                            Symbol::EndMarker,
                            ActionCell::Accept,
                        );
                        continue;
                    }
                    insert(
                        &mut cells,
                        &mut conflicts,
                        state_id,
                        item.lookahead.clone(),
                        ActionCell::Reduce(item.core.production),
                    );
                } else if let Some(symbol) = item.core.symbol_after_dot(grammar) {
                    if let Some(&target) = collection.transitions.get(&(state_id, symbol.clone()))
                    {
                        let cell = if symbol.is_terminal() {
                            ActionCell::Shift(target)
                        } else {
                            ActionCell::Goto(target)
                        };
                        insert(&mut cells, &mut conflicts, state_id, symbol.clone(), cell);
                    }
                }
            }
        }

        if !conflicts.is_empty() {
            return Err(BuildError::GrammarNotLr1(conflicts));
        }

        Ok(ParseTable {
            state_count: collection.states.len(),
            cells,
            // LR(1) rejects every conflict outright, so a table that
            // built at all is always conflict-free.
            shift_reduce_conflicts: Vec::new(),
        })
    }
}

fn insert(
    cells: &mut BTreeMap<(usize, Symbol), ActionCell>,
    conflicts: &mut Vec<Conflict>,
    state_id: usize,
    symbol: Symbol,
    cell: ActionCell,
) {
    match cells.get(&(state_id, symbol.clone())) {
        None => {
            cells.insert((state_id, symbol), cell);
        }
        Some(&existing) if existing == cell => {}
        Some(&ActionCell::Shift(_)) => conflicts.push(Conflict {
            state_id,
            symbol,
            kind: ConflictKind::ShiftReduce,
        }),
        Some(&ActionCell::Reduce(_)) => {
            let kind = if matches!(cell, ActionCell::Shift(_)) {
                ConflictKind::ShiftReduce
            } else {
                ConflictKind::ReduceReduce
            };
            conflicts.push(Conflict {
                state_id,
                symbol,
                kind,
            });
        }
        Some(_) => conflicts.push(Conflict {
            state_id,
            symbol,
            kind: ConflictKind::ReduceReduce,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::loader::GrammarLoader;

    #[test]
    fn builds_table_for_unambiguous_expression_grammar() {
        let grammar = GrammarLoader::from_text(
            "E | T | F\n+ | * | ( | ) | id\nE -> E + T\nE -> T\nT -> T * F\nT -> F\nF -> ( E )\nF -> id\n",
        )
        .unwrap();
        let table = Lr1TableBuilder::build(&grammar).unwrap();
        assert!(table.state_count > 1);
    }

    #[test]
    fn genuinely_ambiguous_grammar_is_rejected() {
        let ambiguous =
            GrammarLoader::from_text("S | A | B\nz\nS -> A\nS -> B\nA -> @\nB -> @\n").unwrap();
        let err = Lr1TableBuilder::build(&ambiguous).unwrap_err();
        assert!(matches!(err, BuildError::GrammarNotLr1(_)));
    }

    #[test]
    fn lr1_builds_for_a_grammar_with_disjoint_follow_sets() {
        // S -> A a | B b, A -> c, B -> c is SLR(1) too (FOLLOW(A)={a} and
        // FOLLOW(B)={b} are disjoint), but per-item lookahead still builds
        // a clean table for it.
        let grammar = GrammarLoader::from_text(
            "S | A | B\na | b | c\nS -> A a\nS -> B b\nA -> c\nB -> c\n",
        )
        .unwrap();
        assert!(Lr1TableBuilder::build(&grammar).is_ok());
    }
}
