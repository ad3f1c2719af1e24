use std::collections::BTreeMap;

use crate::demos::dragon_book;
use crate::driver::ParseDriver;
use crate::grammar::loader::GrammarLoader;
use crate::io::tree_io::TreeIo;
use crate::lexer::LexerBuild;
use crate::lr::slr1::Slr1TableBuilder;
use crate::support::BuildLog;
use crate::symbol::Symbol;

fn terminal_for(code: i64) -> Symbol {
    match code {
        100 => Symbol::terminal("id"),
        200 => Symbol::terminal("+"),
        201 => Symbol::terminal("*"),
        202 => Symbol::terminal("("),
        203 => Symbol::terminal(")"),
        other => panic!("unexpected token code {other}"),
    }
}

#[test]
fn tokenizes_parses_and_exports_an_arithmetic_expression() {
    let lexer = LexerBuild::from_spec(dragon_book::lexical_spec(), BuildLog::None).unwrap();
    let grammar = GrammarLoader::from_text(dragon_book::grammar_text()).unwrap();
    let table = Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();

    let tokens = lexer
        .tokenize("a+b*c")
        .unwrap()
        .into_iter()
        .filter(|t| t.code != 900)
        .map(|t| (terminal_for(t.code), t.lexeme))
        .collect::<Vec<_>>();

    let tree = ParseDriver::new(&table, &grammar).parse(&tokens).unwrap();
    assert_eq!(tree.symbol, Symbol::nonterminal("E"));

    let mut codes = BTreeMap::new();
    codes.insert(Symbol::terminal("id"), 100);
    codes.insert(Symbol::terminal("+"), 200);
    codes.insert(Symbol::terminal("*"), 201);
    let exported = TreeIo::export(&tree, &codes);
    assert!(exported.contains("BTreeNode"));
}

#[test]
fn rejects_mismatched_parentheses() {
    let lexer = LexerBuild::from_spec(dragon_book::lexical_spec(), BuildLog::None).unwrap();
    let grammar = GrammarLoader::from_text(dragon_book::grammar_text()).unwrap();
    let table = Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();

    let tokens = lexer
        .tokenize("(a+b")
        .unwrap()
        .into_iter()
        .filter(|t| t.code != 900)
        .map(|t| (terminal_for(t.code), t.lexeme))
        .collect::<Vec<_>>();

    let result = ParseDriver::new(&table, &grammar).parse(&tokens);
    assert!(result.is_err());
}
