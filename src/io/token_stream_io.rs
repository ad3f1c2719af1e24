//! Ingests a pre-tokenized stream in `<n>: <CLASS>, <lexeme>` form,
//! mapping each lexical class name to the grammar terminal it feeds the
//! parse driver.

use std::collections::BTreeMap;

use crate::error::BuildError;
use crate::symbol::Symbol;

pub struct TokenStreamIo;

impl TokenStreamIo {
    pub fn parse(
        text: &str,
        class_to_terminal: &BTreeMap<String, Symbol>,
    ) -> Result<Vec<(Symbol, String)>, BuildError> {
        let mut tokens = Vec::new();
        for (line_no, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            let colon = line.find(':').ok_or_else(|| {
                BuildError::TableIO(format!("line {}: missing ':'", line_no + 1))
            })?;
            let index_part = line[..colon].trim();
            index_part.parse::<usize>().map_err(|_| {
                BuildError::TableIO(format!(
                    "line {}: '{}' is not a token index",
                    line_no + 1,
                    index_part
                ))
            })?;

            let rest = line[colon + 1..].trim();
            let comma = rest.find(',').ok_or_else(|| {
                BuildError::TableIO(format!("line {}: missing ','", line_no + 1))
            })?;
            let class = rest[..comma].trim();
            let lexeme = rest[comma + 1..].trim();

            let symbol = class_to_terminal.get(class).cloned().ok_or_else(|| {
                BuildError::TableIO(format!(
                    "line {}: unknown token class '{class}'",
                    line_no + 1
                ))
            })?;
            tokens.push((symbol, lexeme.to_string()));
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_and_lexeme_per_line() {
        let mut classes = BTreeMap::new();
        classes.insert("ID".to_string(), Symbol::terminal("id"));
        classes.insert("PLUS".to_string(), Symbol::terminal("+"));

        let text = "0: ID, x1\n1: PLUS, +\n2: ID, x2\n";
        let tokens = TokenStreamIo::parse(text, &classes).unwrap();
        assert_eq!(
            tokens,
            vec![
                (Symbol::terminal("id"), "x1".to_string()),
                (Symbol::terminal("+"), "+".to_string()),
                (Symbol::terminal("id"), "x2".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_unknown_class() {
        let text = "0: MYSTERY, ?";
        let err = TokenStreamIo::parse(text, &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, BuildError::TableIO(_)));
    }
}
