use std::collections::BTreeMap;

use langforge::driver::ParseDriver;
use langforge::grammar::loader::GrammarLoader;
use langforge::io::table_io::TableIo;
use langforge::io::token_stream_io::TokenStreamIo;
use langforge::io::tree_io::TreeIo;
use langforge::lexer::LexerBuild;
use langforge::lr::lr1_table::Lr1TableBuilder;
use langforge::lr::slr1::Slr1TableBuilder;
use langforge::support::BuildLog;
use langforge::symbol::Symbol;
use langforge::BuildError;

const EXPR_LEXICAL_SPEC: &str = "\
letter = [A-Za-z]
digit = [0-9]
_ID100 = letter(letter|digit)*
_PLUS200 = \+
_STAR201 = \*
_LPAREN202 = \(
_RPAREN203 = \)
";

const EXPR_GRAMMAR: &str = "\
E | T | F
+ | * | ( | ) | id
E -> E + T
E -> T
T -> T * F
T -> F
F -> ( E )
F -> id
";

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
fn arithmetic_expression_lexes_parses_and_exports_under_slr1() {
    let lexer = LexerBuild::from_spec(EXPR_LEXICAL_SPEC, BuildLog::None).unwrap();
    let grammar = GrammarLoader::from_text(EXPR_GRAMMAR).unwrap();
    let table = Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();

    let tokens: Vec<_> = lexer
        .tokenize("(a+b)*c")
        .unwrap()
        .into_iter()
        .map(|t| (terminal_for(t.code), t.lexeme))
        .collect();

    let tree = ParseDriver::new(&table, &grammar).parse(&tokens).unwrap();
    assert_eq!(tree.symbol, Symbol::nonterminal("E"));

    let mut codes = BTreeMap::new();
    codes.insert(Symbol::terminal("id"), 100);
    let exported = TreeIo::export(&tree, &codes);
    assert!(exported.contains("BTreeNode"));
    assert!(exported.contains('a'));
}

#[test]
fn lr1_resolves_cleanly_where_slr1_only_builds_via_shift_preference() {
    // The classic non-SLR-but-LR(1) grammar: state {S -> L . = R, R -> L .}
    // conflicts on '=' because FOLLOW(R) contains '=' (via S -> L = R),
    // even though no single item's own lookahead would shift there.
    let text = "S | L | R\n= | * | id\nS -> L = R\nS -> R\nL -> * R\nL -> id\nR -> L\n";
    let grammar = GrammarLoader::from_text(text).unwrap();

    let slr1_table = Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();
    assert!(!slr1_table.is_conflict_free());

    let table = Lr1TableBuilder::build(&grammar).unwrap();
    let input = vec![
        (Symbol::terminal("id"), "a".to_string()),
        (Symbol::terminal("="), "=".to_string()),
        (Symbol::terminal("id"), "b".to_string()),
    ];
    let tree = ParseDriver::new(&table, &grammar).parse(&input).unwrap();
    assert_eq!(tree.symbol, Symbol::nonterminal("S"));
}

#[test]
fn parse_table_round_trips_through_its_textual_form() {
    let grammar = GrammarLoader::from_text(EXPR_GRAMMAR).unwrap();
    let table = Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();

    let exported = TableIo::export(&table, &grammar);
    let mut terminals = BTreeMap::new();
    for name in ["id", "+", "*", "(", ")"] {
        terminals.insert(name.to_string(), Symbol::terminal(name));
    }
    terminals.insert("$".to_string(), Symbol::end_marker());

    let restored = TableIo::import(&exported, &grammar, &terminals).unwrap();
    assert_eq!(restored.cells.len(), table.cells.len());
    for (key, action) in &table.cells {
        assert_eq!(restored.cells.get(key), Some(action));
    }
}

#[test]
fn pretokenized_stream_feeds_the_driver_directly() {
    let grammar = GrammarLoader::from_text(EXPR_GRAMMAR).unwrap();
    let table = Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();

    let mut classes = BTreeMap::new();
    classes.insert("ID".to_string(), Symbol::terminal("id"));
    classes.insert("PLUS".to_string(), Symbol::terminal("+"));

    let stream = "0: ID, a\n1: PLUS, +\n2: ID, b\n";
    let tokens = TokenStreamIo::parse(stream, &classes).unwrap();

    let tree = ParseDriver::new(&table, &grammar).parse(&tokens).unwrap();
    assert_eq!(tree.symbol, Symbol::nonterminal("E"));
    assert_eq!(tree.children.len(), 3);
}

#[test]
fn unmatched_lexical_input_reports_its_position() {
    let lexer = LexerBuild::from_spec(EXPR_LEXICAL_SPEC, BuildLog::None).unwrap();
    let err = lexer.tokenize("a+#b").unwrap_err();
    assert!(matches!(err, BuildError::ParseFailure { pointer: 2, .. }));
}
