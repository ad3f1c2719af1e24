//! SLR(1) table construction: LR(0) canonical collection, reduce actions
//! placed at FOLLOW(lhs) instead of carried lookaheads.
//!
//! Shift-reduce conflicts are resolved by always preferring the shift,
//! the same disambiguation classic `yacc`-family tools apply by default;
//! this is a policy choice carried forward deliberately; it is not
//! treated as a build failure, but it is surfaced on the returned
//! [`ParseTable::shift_reduce_conflicts`] so a caller can tell a
//! genuinely conflict-free grammar from one that only built because
//! shift was preferred. A reduce-reduce conflict has no such convention
//! to fall back on and makes the grammar not SLR(1).

use std::collections::BTreeMap;

use crate::error::{Conflict, ConflictKind};
use crate::grammar::first_follow::FirstFollow;
use crate::grammar::Grammar;
use crate::lr::lr0::Lr0Builder;
use crate::lr::{ActionCell, ParseTable};
use crate::symbol::Symbol;
use crate::BuildError;
use crate::support::BuildLog;

pub struct Slr1TableBuilder;

impl Slr1TableBuilder {
    pub fn build(grammar: &Grammar, log: BuildLog) -> Result<ParseTable, BuildError> {
        let collection = Lr0Builder::build(grammar);
        let first_follow = FirstFollow::compute(grammar);

        let mut cells: BTreeMap<(usize, Symbol), ActionCell> = BTreeMap::new();
        let mut reduce_reduce: Vec<Conflict> = Vec::new();
        let mut shift_reduce: Vec<Conflict> = Vec::new();

        for (state_id, items) in collection.states.iter().enumerate() {
            for item in items {
                if item.is_complete(grammar) {
                    let production = &grammar.productions[item.production];
                    if item.production == 0 {
                        insert(
                            &mut cells,
                            &mut reduce_reduce,
                            &mut shift_reduce,
                            state_id,
                            Symbol::EndMarker,
                            ActionCell::Accept,
                            log,
                        );
                        continue;
                    }
                    for terminal in first_follow.follow_of(&production.lhs) {
                        insert(
                            &mut cells,
                            &mut reduce_reduce,
                            &mut shift_reduce,
                            state_id,
                            terminal,
                            ActionCell::Reduce(item.production),
                            log,
                        );
                    }
                } else if let Some(symbol) = item.symbol_after_dot(grammar) {
                    if let Some(&target) = collection.transitions.get(&(state_id, symbol.clone()))
                    {
                        let cell = if symbol.is_terminal() {
                            ActionCell::Shift(target)
                        } else {
                            ActionCell::Goto(target)
                        };
                        insert(
                            &mut cells,
                            &mut reduce_reduce,
                            &mut shift_reduce,
                            state_id,
                            symbol.clone(),
                            cell,
                            log,
                        );
                    }
                }
            }
        }

        if !reduce_reduce.is_empty() {
            return Err(BuildError::GrammarNotSlr1(reduce_reduce));
        }

        Ok(ParseTable {
            state_count: collection.states.len(),
            cells,
            shift_reduce_conflicts: shift_reduce,
        })
    }
}

fn insert(
    cells: &mut BTreeMap<(usize, Symbol), ActionCell>,
    reduce_reduce: &mut Vec<Conflict>,
    shift_reduce: &mut Vec<Conflict>,
    state_id: usize,
    symbol: Symbol,
    cell: ActionCell,
    log: BuildLog,
) {
    match cells.get(&(state_id, symbol.clone())) {
        None => {
            cells.insert((state_id, symbol), cell);
        }
        Some(&existing) if existing == cell => {}
        Some(&ActionCell::Shift(_)) => {
            log.trace(BuildLog::Result, || {
                format!("state {state_id} on '{symbol}': shift/reduce conflict, preferring shift")
            });
            shift_reduce.push(Conflict {
                state_id,
                symbol,
                kind: ConflictKind::ShiftReduce,
            });
            // Shift already present: keep it regardless of which action
            // is being inserted now.
        }
        Some(&ActionCell::Reduce(existing_production)) => match cell {
            ActionCell::Shift(_) => {
                log.trace(BuildLog::Result, || {
                    format!(
                        "state {state_id} on '{symbol}': shift/reduce conflict, preferring shift"
                    )
                });
                shift_reduce.push(Conflict {
                    state_id,
                    symbol: symbol.clone(),
                    kind: ConflictKind::ShiftReduce,
                });
                cells.insert((state_id, symbol), cell);
            }
            ActionCell::Reduce(new_production) if new_production != existing_production => {
                reduce_reduce.push(Conflict {
                    state_id,
                    symbol,
                    kind: ConflictKind::ReduceReduce,
                });
            }
            _ => {}
        },
        Some(_) => {
            // Goto/Accept colliding with something else should not arise
            // from a well-formed augmented grammar; treat as reduce-reduce
            // for diagnostic purposes rather than panicking.
            reduce_reduce.push(Conflict {
                state_id,
                symbol,
                kind: ConflictKind::ReduceReduce,
            });
        }
    }
}
