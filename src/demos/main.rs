use std::collections::BTreeMap;
use std::process::ExitCode;

use langforge::demos::dragon_book;
use langforge::driver::ParseDriver;
use langforge::grammar::loader::GrammarLoader;
use langforge::io::tree_io::TreeIo;
use langforge::lexer::LexerBuild;
use langforge::lr::lr1_table::Lr1TableBuilder;
use langforge::lr::slr1::Slr1TableBuilder;
use langforge::lr::ParseTable;
use langforge::support::BuildLog;
use langforge::symbol::Symbol;
use langforge::BuildError;

const WHITESPACE_CODE: i64 = 900;

fn terminal_for(code: i64) -> Option<Symbol> {
    Some(match code {
        100 => Symbol::terminal("id"),
        200 => Symbol::terminal("+"),
        201 => Symbol::terminal("*"),
        202 => Symbol::terminal("("),
        203 => Symbol::terminal(")"),
        WHITESPACE_CODE => return None,
        _ => return None,
    })
}

fn run() -> Result<(), BuildError> {
    let mut args = std::env::args().skip(1);
    let use_lr1 = args.any(|a| a == "--lr1");
    let expression = std::env::args()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .unwrap_or_else(|| "a+b*c".to_string());

    let lexer = LexerBuild::from_spec(dragon_book::lexical_spec(), BuildLog::None)?;
    let grammar = GrammarLoader::from_text(dragon_book::grammar_text())?;

    let table: ParseTable = if use_lr1 {
        Lr1TableBuilder::build(&grammar)?
    } else {
        Slr1TableBuilder::build(&grammar, BuildLog::Default)?
    };

    let tokens: Vec<(Symbol, String)> = lexer
        .tokenize(&expression)?
        .into_iter()
        .filter_map(|t| terminal_for(t.code).map(|symbol| (symbol, t.lexeme)))
        .collect();

    let tree = ParseDriver::new(&table, &grammar).parse(&tokens)?;
    tree.print().map_err(|e| BuildError::TableIO(e.to_string()))?;

    let mut terminal_codes = BTreeMap::new();
    terminal_codes.insert(Symbol::terminal("id"), 100);
    terminal_codes.insert(Symbol::terminal("+"), 200);
    terminal_codes.insert(Symbol::terminal("*"), 201);
    println!("{}", TreeIo::export(&tree, &terminal_codes));

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("langforge-demo: {err}");
            ExitCode::FAILURE
        }
    }
}
