//! Table-driven shift/reduce parser: three parallel stacks (states,
//! symbols, trees) walking an `ACTION`/`GOTO` table built by
//! [`crate::lr::slr1::Slr1TableBuilder`] or
//! [`crate::lr::lr1_table::Lr1TableBuilder`].

use crate::error::BuildError;
use crate::grammar::Grammar;
use crate::lr::{ActionCell, ParseTable};
use crate::parse_tree::ParseTree;
use crate::symbol::Symbol;

pub struct ParseDriver<'g> {
    table: &'g ParseTable,
    grammar: &'g Grammar,
}

impl<'g> ParseDriver<'g> {
    pub fn new(table: &'g ParseTable, grammar: &'g Grammar) -> Self {
        ParseDriver { table, grammar }
    }

    /// Parses a `(terminal symbol, lexeme)` stream into a [`ParseTree`].
    /// The caller does not append an explicit end marker; the driver
    /// supplies `Symbol::EndMarker` once the stream is exhausted.
    pub fn parse(&self, input: &[(Symbol, String)]) -> Result<ParseTree, BuildError> {
        let mut states: Vec<usize> = vec![0];
        let mut symbols: Vec<Symbol> = Vec::new();
        let mut trees: Vec<ParseTree> = Vec::new();
        let mut pos = 0usize;

        loop {
            let lookahead = input
                .get(pos)
                .map(|(s, _)| s.clone())
                .unwrap_or(Symbol::EndMarker);
            let state = *states.last().expect("state stack is never empty");

            match self.table.get(state, &lookahead) {
                Some(ActionCell::Shift(next)) => {
                    let lexeme = input.get(pos).map(|(_, l)| l.clone()).unwrap_or_default();
                    states.push(next);
                    symbols.push(lookahead.clone());
                    trees.push(ParseTree::leaf(lookahead, lexeme));
                    pos += 1;
                }
                Some(ActionCell::Reduce(production_index)) => {
                    let production = &self.grammar.productions[production_index];
                    let arity = production.rhs.len();
                    let mut children = Vec::with_capacity(arity);
                    for _ in 0..arity {
                        states.pop();
                        symbols.pop();
                        children.push(trees.pop().expect("stack underflow during reduce"));
                    }
                    children.reverse();

                    let goto_state = *states.last().expect("state stack is never empty");
                    let next = match self.table.get(goto_state, &production.lhs) {
                        Some(ActionCell::Goto(target)) => target,
                        _ => {
                            return Err(BuildError::ParseFailure {
                                pointer: pos,
                                message: format!(
                                    "missing GOTO for '{}' after reducing by rule {production_index}",
                                    production.lhs
                                ),
                            })
                        }
                    };
                    states.push(next);
                    symbols.push(production.lhs.clone());
                    trees.push(ParseTree::node(production.lhs.clone(), children));
                }
                Some(ActionCell::Accept) => {
                    return trees.pop().ok_or_else(|| BuildError::ParseFailure {
                        pointer: pos,
                        message: "accept reached with an empty tree stack".into(),
                    });
                }
                Some(ActionCell::Goto(_)) | None => {
                    return Err(BuildError::ParseFailure {
                        pointer: pos,
                        message: format!(
                            "no action for state {state} on lookahead '{lookahead}'"
                        ),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::loader::GrammarLoader;
    use crate::lr::slr1::Slr1TableBuilder;
    use crate::support::BuildLog;

    fn tok(symbol: &str, lexeme: &str) -> (Symbol, String) {
        (Symbol::terminal(symbol), lexeme.to_string())
    }

    #[test]
    fn parses_simple_expression() {
        let grammar = GrammarLoader::from_text(
            "E | T | F\n+ | * | ( | ) | id\nE -> E + T\nE -> T\nT -> T * F\nT -> F\nF -> ( E )\nF -> id\n",
        )
        .unwrap();
        let table = Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();
        let driver = ParseDriver::new(&table, &grammar);

        let input = vec![tok("id", "a"), tok("+", "+"), tok("id", "b")];
        let tree = driver.parse(&input).unwrap();
        assert_eq!(tree.symbol, Symbol::nonterminal("E"));
        assert_eq!(tree.children.len(), 3);
    }

    #[test]
    fn rejects_input_with_no_valid_action() {
        let grammar = GrammarLoader::from_text("E\nid\nE -> id\n").unwrap();
        let table = Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();
        let driver = ParseDriver::new(&table, &grammar);

        let input = vec![tok("+", "+")];
        let err = driver.parse(&input).unwrap_err();
        assert!(matches!(err, BuildError::ParseFailure { .. }));
    }

    #[test]
    fn parses_epsilon_production_as_childless_node() {
        let grammar = GrammarLoader::from_text("S | A\na\nS -> a A\nA -> @\n").unwrap();
        let table = Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();
        let driver = ParseDriver::new(&table, &grammar);

        let input = vec![tok("a", "a")];
        let tree = driver.parse(&input).unwrap();
        let a_node = &tree.children[1];
        assert_eq!(a_node.symbol, Symbol::nonterminal("A"));
        assert!(a_node.children.is_empty());
    }
}
