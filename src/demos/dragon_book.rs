//! The textbook expression grammar `E -> E + T | T`, `T -> T * F | F`,
//! `F -> ( E ) | id`, paired with a lexical spec for `id`, `+`, `*`,
//! `(`, `)` and whitespace skipping.

pub fn lexical_spec() -> &'static str {
    "\
letter = [A-Za-z]
digit = [0-9]
_ID100 = letter(letter|digit)*
_PLUS200 = \+
_STAR201 = \*
_LPAREN202 = \(
_RPAREN203 = \)
_WS900 = [ \t\n]+
"
}

pub fn grammar_text() -> &'static str {
    "\
E | T | F
+ | * | ( | ) | id
E -> E + T
E -> T
T -> T * F
T -> F
F -> ( E )
F -> id
"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::loader::GrammarLoader;
    use crate::lexer::LexerBuild;
    use crate::lr::slr1::Slr1TableBuilder;
    use crate::support::BuildLog;

    #[test]
    fn lexer_and_grammar_build_cleanly() {
        let lexer = LexerBuild::from_spec(lexical_spec(), BuildLog::None).unwrap();
        let tokens = lexer.tokenize("a+b*c").unwrap();
        assert_eq!(tokens.len(), 5);

        let grammar = GrammarLoader::from_text(grammar_text()).unwrap();
        Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();
    }

    /// Cross-checks the `_ID100` rule's accepted lexemes against an
    /// independent matcher, catching a Thompson/subset-construction bug
    /// that a self-referential assertion against this crate's own lexer
    /// output couldn't.
    #[test]
    fn identifier_rule_agrees_with_an_independent_regex_matcher() {
        let lexer = LexerBuild::from_spec(lexical_spec(), BuildLog::None).unwrap();
        let reference = regex::Regex::new(r"^[A-Za-z][A-Za-z0-9]*").unwrap();

        for word in ["a", "x1", "countUp2", "Z"] {
            let ours = lexer.tokenize(word).unwrap();
            let theirs = reference.find(word).unwrap();
            assert_eq!(ours[0].code, 100);
            assert_eq!(ours[0].lexeme, theirs.as_str());
        }
    }
}
