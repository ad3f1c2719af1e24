//! `ParseTable` export/import as one `SLRUnit` block per `(state,
//! symbol)` cell:
//!
//! ```text
//! SLRUnit
//! {
//!     Key: 3 id
//!     Value: s5
//! }
//! ```
//!
//! `Value` encodings: `s<n>` shift, `r(A->α)` reduce, `ACCEPT`, `<n>`
//! (bare numeric) goto. Blocks are emitted in state-id order. The `Key`
//! line carries the state id ahead of the symbol name — the literal
//! two-field block shown above has no other way to say which state a
//! unit belongs to once more than one block shares a file.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::error::BuildError;
use crate::grammar::Grammar;
use crate::lr::{ActionCell, ParseTable};
use crate::symbol::Symbol;

pub struct TableIo;

impl TableIo {
    pub fn export(table: &ParseTable, grammar: &Grammar) -> String {
        let mut out = String::new();
        for ((state, symbol), action) in &table.cells {
            let _ = writeln!(out, "SLRUnit");
            let _ = writeln!(out, "{{");
            let _ = writeln!(out, "    Key: {state} {}", symbol.name());
            let _ = writeln!(out, "    Value: {}", render_action(action, grammar));
            let _ = writeln!(out, "}}");
        }
        out
    }

    pub fn import(
        text: &str,
        grammar: &Grammar,
        terminals: &BTreeMap<String, Symbol>,
    ) -> Result<ParseTable, BuildError> {
        let mut cells = BTreeMap::new();
        let mut max_state = 0usize;

        for block in text.split("SLRUnit").skip(1) {
            let key_line = block
                .lines()
                .find_map(|l| l.trim().strip_prefix("Key:"))
                .ok_or_else(|| BuildError::TableIO("SLRUnit block missing Key".into()))?
                .trim();
            let value_line = block
                .lines()
                .find_map(|l| l.trim().strip_prefix("Value:"))
                .ok_or_else(|| BuildError::TableIO("SLRUnit block missing Value".into()))?
                .trim();

            let (state_str, symbol_name) = key_line
                .split_once(' ')
                .ok_or_else(|| BuildError::TableIO(format!("malformed Key: '{key_line}'")))?;
            let state: usize = state_str
                .parse()
                .map_err(|_| BuildError::TableIO(format!("bad state id in Key: '{key_line}'")))?;
            let symbol = resolve_symbol(symbol_name, grammar, terminals);

            let action = parse_action(value_line, grammar)
                .ok_or_else(|| BuildError::TableIO(format!("malformed Value: '{value_line}'")))?;

            max_state = max_state.max(state);
            cells.insert((state, symbol), action);
        }

        if cells.is_empty() {
            return Err(BuildError::TableIO("no SLRUnit blocks found".into()));
        }

        Ok(ParseTable {
            state_count: max_state + 1,
            cells,
            // Conflicts are a build-time concern; a table reloaded from
            // its textual form is taken as already resolved.
            shift_reduce_conflicts: Vec::new(),
        })
    }
}

fn resolve_symbol(name: &str, grammar: &Grammar, terminals: &BTreeMap<String, Symbol>) -> Symbol {
    if name == "$" {
        return Symbol::EndMarker;
    }
    if let Some(symbol) = terminals.get(name) {
        return symbol.clone();
    }
    if grammar.nonterminals.contains(&Symbol::nonterminal(name)) {
        return Symbol::nonterminal(name);
    }
    Symbol::terminal(name)
}

fn render_action(action: &ActionCell, grammar: &Grammar) -> String {
    match action {
        ActionCell::Shift(s) => format!("s{s}"),
        ActionCell::Goto(g) => g.to_string(),
        ActionCell::Accept => "ACCEPT".to_string(),
        ActionCell::Reduce(production_id) => {
            let production = &grammar.productions[*production_id];
            let rhs = if production.rhs.is_empty() {
                "@".to_string()
            } else {
                production
                    .rhs
                    .iter()
                    .map(Symbol::name)
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            format!("r({}->{rhs})", production.lhs.name())
        }
    }
}

fn parse_action(value: &str, grammar: &Grammar) -> Option<ActionCell> {
    if value == "ACCEPT" {
        return Some(ActionCell::Accept);
    }
    if let Some(rest) = value.strip_prefix('s') {
        return rest.parse().ok().map(ActionCell::Shift);
    }
    if let Some(rest) = value.strip_prefix("r(").and_then(|s| s.strip_suffix(')')) {
        let (lhs_name, rhs_text) = rest.split_once("->")?;
        let lhs = Symbol::nonterminal(lhs_name);
        let rhs: Vec<Symbol> = if rhs_text.trim() == "@" {
            Vec::new()
        } else {
            rhs_text
                .split_whitespace()
                .map(|tok| {
                    if grammar.nonterminals.contains(&Symbol::nonterminal(tok)) {
                        Symbol::nonterminal(tok)
                    } else {
                        Symbol::terminal(tok)
                    }
                })
                .collect()
        };
        let id = *grammar.by_signature.get(&(lhs, rhs))?;
        return Some(ActionCell::Reduce(id));
    }
    value.parse().ok().map(ActionCell::Goto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::loader::GrammarLoader;

    fn expr_grammar() -> Grammar {
        GrammarLoader::from_text(
            "E | T\n+ | id\nE -> E + T\nE -> T\nT -> id\n",
        )
        .unwrap()
    }

    #[test]
    fn round_trips_a_small_table() {
        let grammar = expr_grammar();
        let mut cells = BTreeMap::new();
        cells.insert((0, Symbol::terminal("id")), ActionCell::Shift(1));
        cells.insert((1, Symbol::EndMarker), ActionCell::Accept);
        cells.insert((2, Symbol::nonterminal("T")), ActionCell::Goto(3));
        cells.insert((4, Symbol::terminal("+")), ActionCell::Reduce(2));
        let table = ParseTable {
            state_count: 5,
            cells,
            shift_reduce_conflicts: Vec::new(),
        };

        let text = TableIo::export(&table, &grammar);
        assert!(text.contains("SLRUnit"));
        assert!(text.contains("Value: s1"));
        assert!(text.contains("Value: ACCEPT"));
        assert!(text.contains("Value: r(E->T)"));

        let mut terminals = BTreeMap::new();
        terminals.insert("id".to_string(), Symbol::terminal("id"));
        terminals.insert("+".to_string(), Symbol::terminal("+"));
        let restored = TableIo::import(&text, &grammar, &terminals).unwrap();
        assert_eq!(restored.get(0, &Symbol::terminal("id")), Some(ActionCell::Shift(1)));
        assert_eq!(restored.get(1, &Symbol::EndMarker), Some(ActionCell::Accept));
        assert_eq!(restored.get(2, &Symbol::nonterminal("T")), Some(ActionCell::Goto(3)));
        assert_eq!(restored.get(4, &Symbol::terminal("+")), Some(ActionCell::Reduce(2)));
    }

    #[test]
    fn rejects_empty_input() {
        let grammar = expr_grammar();
        assert!(matches!(
            TableIo::import("", &grammar, &BTreeMap::new()),
            Err(BuildError::TableIO(_))
        ));
    }
}
