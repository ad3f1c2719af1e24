//! A lexical spec exercising variable bindings (including a forward
//! reference), a multi-keyword rule expanding to successive token
//! codes, and a whitespace rule meant to be filtered out of the token
//! stream before it reaches a parser.

pub fn text() -> &'static str {
    "\
ident = letter(letter|digit)*
letter = [A-Za-z_]
digit = [0-9]
_KW10S = if | else | while
_ID100 = ident
_NUM300 = digit@digit*
_ASSIGN400 = =
_WS900 = [ \t\n]+
"
}

/// Token code assigned to the whitespace rule in [`text`]; not a grammar
/// terminal, filtered out of the token stream before parsing.
pub const WHITESPACE_CODE: i64 = 900;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexerBuild;
    use crate::support::BuildLog;

    #[test]
    fn keywords_take_the_first_three_codes_in_declaration_order() {
        let lexer = LexerBuild::from_spec(text(), BuildLog::None).unwrap();
        let tokens = lexer.tokenize("if").unwrap();
        assert_eq!(tokens[0].code, 10);

        let tokens = lexer.tokenize("while").unwrap();
        assert_eq!(tokens[0].code, 12);
    }

    #[test]
    fn forward_referenced_variable_resolves() {
        let lexer = LexerBuild::from_spec(text(), BuildLog::None).unwrap();
        let tokens = lexer.tokenize("count").unwrap();
        assert_eq!(tokens[0].code, 100);
    }

    #[test]
    fn whitespace_is_tokenized_as_its_own_class() {
        let lexer = LexerBuild::from_spec(text(), BuildLog::None).unwrap();
        let tokens = lexer.tokenize("x = 1").unwrap();
        let codes: Vec<i64> = tokens.iter().map(|t| t.code).collect();
        assert_eq!(codes, vec![100, WHITESPACE_CODE, 400, WHITESPACE_CODE, 300]);
    }
}
