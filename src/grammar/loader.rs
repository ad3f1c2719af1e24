//! Parses the textual grammar format into a [`Grammar`].
//!
//! Line 1: nonterminals, `|`-separated. Line 2: terminals, `|`-separated.
//! Every remaining non-blank line is one production, `lhs -> sym1 sym2
//! …` — the `|`-disjunction form is not accepted here; each alternative
//! gets its own line. `@` on the right-hand side denotes the empty
//! production. Tokens are whitespace-separated.
//!
//! The grammar's own start symbol is the lhs of the first production
//! line. If that symbol has more than one production, a synthetic
//! `S' -> start` is prepended as production 0 so an LR item set never
//! has to special-case "are we accepting" against the user's own start
//! symbol; a start symbol with a single production needs no such
//! wrapper, since reducing it already means the input is accepted.

use std::collections::BTreeSet;

use crate::error::BuildError;
use crate::grammar::{Grammar, Production};
use crate::symbol::Symbol;

pub struct GrammarLoader;

impl GrammarLoader {
    pub fn from_text(text: &str) -> Result<Grammar, BuildError> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        let nonterminal_line = lines
            .next()
            .ok_or_else(|| BuildError::MissingInput("grammar text is empty".into()))?;
        let terminal_line = lines.next().ok_or_else(|| {
            BuildError::GrammarSyntax("missing terminal declaration line".into())
        })?;

        let nonterminals: BTreeSet<Symbol> = split_declarations(nonterminal_line)
            .map(Symbol::nonterminal)
            .collect();
        let terminals: BTreeSet<Symbol> = split_declarations(terminal_line)
            .map(Symbol::terminal)
            .collect();

        let to_symbol = |name: &str| -> Result<Symbol, BuildError> {
            if nonterminals.contains(&Symbol::nonterminal(name)) {
                Ok(Symbol::nonterminal(name))
            } else if terminals.contains(&Symbol::terminal(name)) {
                Ok(Symbol::terminal(name))
            } else {
                Err(BuildError::GrammarSyntax(format!(
                    "'{name}' is neither a declared nonterminal nor a declared terminal"
                )))
            }
        };

        let mut raw_productions: Vec<(Symbol, Vec<Symbol>)> = Vec::new();
        for (line_no, line) in lines.enumerate() {
            let arrow = line.find("->").ok_or_else(|| {
                BuildError::GrammarSyntax(format!("line {}: missing '->'", line_no + 3))
            })?;
            let lhs_name = line[..arrow].trim();
            if lhs_name.is_empty() {
                return Err(BuildError::GrammarSyntax(format!(
                    "line {}: empty left-hand side",
                    line_no + 3
                )));
            }
            if !nonterminals.contains(&Symbol::nonterminal(lhs_name)) {
                return Err(BuildError::GrammarSyntax(format!(
                    "line {}: lhs '{lhs_name}' is not a declared nonterminal",
                    line_no + 3
                )));
            }
            let lhs = Symbol::nonterminal(lhs_name);

            let mut rhs = Vec::new();
            for token in line[arrow + 2..].split_whitespace() {
                if token == "@" {
                    continue;
                }
                rhs.push(to_symbol(token)?);
            }
            raw_productions.push((lhs, rhs));
        }

        if raw_productions.is_empty() {
            return Err(BuildError::GrammarSyntax(
                "grammar has no productions".into(),
            ));
        }

        let start = raw_productions[0].0.clone();
        let start_production_count = raw_productions
            .iter()
            .filter(|(lhs, _)| lhs == &start)
            .count();
        let augmented = start_production_count > 1;

        let mut productions = Vec::with_capacity(raw_productions.len() + augmented as usize);
        if augmented {
            productions.push(Production {
                lhs: Symbol::nonterminal("S'"),
                rhs: vec![start.clone()],
            });
        }
        for (lhs, rhs) in raw_productions {
            productions.push(Production { lhs, rhs });
        }

        let by_signature = productions
            .iter()
            .enumerate()
            .map(|(id, p)| ((p.lhs.clone(), p.rhs.clone()), id))
            .collect();

        Ok(Grammar {
            nonterminals,
            terminals,
            start,
            augmented,
            productions,
            by_signature,
        })
    }
}

fn split_declarations(line: &str) -> impl Iterator<Item = &str> {
    line.split('|').map(str::trim).filter(|s| !s.is_empty())
}
