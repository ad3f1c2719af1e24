//! A small compiler front-end toolkit: build a lexer from a textual
//! regex spec, build an SLR(1) or LR(1) parser table from a textual
//! grammar, and drive both together to produce a parse tree.
//!
//! ```
//! use langforge::grammar::loader::GrammarLoader;
//! use langforge::lexer::LexerBuild;
//! use langforge::lr::slr1::Slr1TableBuilder;
//! use langforge::driver::ParseDriver;
//! use langforge::support::BuildLog;
//!
//! let lexical_spec = "\
//! letter = [A-Za-z]
//! digit = [0-9]
//! _ID100 = letter(letter|digit)*
//! _PLUS200 = \+
//! ";
//! let grammar_text = "E\n+ | id\nE -> E + id\nE -> id\n";
//!
//! let lexer = LexerBuild::from_spec(lexical_spec, BuildLog::None).unwrap();
//! let grammar = GrammarLoader::from_text(grammar_text).unwrap();
//! let table = Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();
//!
//! let tokens = lexer.tokenize("a+b").unwrap();
//! let input: Vec<_> = tokens
//!     .iter()
//!     .map(|t| {
//!         let name = if t.code == 200 { "+" } else { "id" };
//!         (langforge::symbol::Symbol::terminal(name), t.lexeme.clone())
//!     })
//!     .collect();
//!
//! let tree = ParseDriver::new(&table, &grammar).parse(&input).unwrap();
//! assert_eq!(tree.symbol, langforge::symbol::Symbol::nonterminal("E"));
//! ```

pub mod demos;
pub mod dfa;
pub mod driver;
pub mod error;
pub mod grammar;
pub mod io;
pub mod lexer;
pub mod lr;
pub mod nfa;
pub mod parse_tree;
pub mod regexp;
pub mod support;
pub mod symbol;

pub use error::BuildError;
