//! Builds a [`MinDfa`] from a textual lexical spec and drives it over
//! input text with maximal munch.

use crate::dfa::minimize::DfaMinimizer;
use crate::dfa::subset::SubsetConstructor;
use crate::dfa::MinDfa;
use crate::error::BuildError;
use crate::nfa::{builder::NfaBuilder, union_tagged};
use crate::regexp::RegexPreprocessor;
use crate::support::{BuildLog, Code};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub code: i64,
    pub lexeme: String,
    pub start: usize,
}

pub struct LexerBuild {
    pub dfa: MinDfa,
}

impl LexerBuild {
    pub fn from_spec(spec_text: &str, log: BuildLog) -> Result<Self, BuildError> {
        let preprocessed = RegexPreprocessor::compile(spec_text)?;

        let mut fragments = Vec::with_capacity(preprocessed.patterns.len());
        for pattern in &preprocessed.patterns {
            let nfa = NfaBuilder::build(&pattern.regex, &preprocessed.variables)?;
            fragments.push((nfa, pattern.code));
        }

        let lexical = union_tagged(fragments);
        let dfa = SubsetConstructor::build(&lexical, log);
        let min_dfa = DfaMinimizer::minimize(&dfa, log);
        Ok(LexerBuild { dfa: min_dfa })
    }

    /// Greedily tokenizes `input` end to end, taking the longest match at
    /// every position. Returns a `ParseFailure` naming the position
    /// where no prefix of the remaining input matches any rule.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, BuildError> {
        let code_view = Code::from(input);
        let mut tokens = Vec::new();
        let mut pos = 0usize;
        while pos < input.len() {
            let remainder = &input[pos..];
            match self.dfa.longest_match(remainder) {
                Some((code, len)) if len > 0 => {
                    tokens.push(Token {
                        code,
                        lexeme: remainder[..len].to_string(),
                        start: pos,
                    });
                    pos += len;
                }
                _ => {
                    let position = code_view.position_at(pos);
                    return Err(BuildError::ParseFailure {
                        pointer: pos,
                        message: format!("no lexical rule matches input at {position}"),
                    });
                }
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_identifiers_and_numbers() {
        let spec = "letter = [A-Za-z]\ndigit = [0-9]\n_ID100 = letter(letter|digit)*\n_NUM300 = digit@digit*";
        let lexer = LexerBuild::from_spec(spec, BuildLog::None).unwrap();
        let tokens = lexer.tokenize("x1").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].code, 100);

        let tokens = lexer.tokenize("42").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].code, 300);
    }

    #[test]
    fn tokenizes_without_whitespace() {
        let spec = "letter = [A-Za-z]\ndigit = [0-9]\n_ID100 = letter(letter|digit)*\n_NUM300 = digit@digit*";
        let lexer = LexerBuild::from_spec(spec, BuildLog::None).unwrap();
        let tokens = lexer.tokenize("x1").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].code, 100);
        assert_eq!(tokens[0].lexeme, "x1");
    }

    #[test]
    fn keyword_rule_wins_over_identifier_rule_on_exact_match() {
        // maximal munch picks the longer lexeme, but "if" matches both
        // the identifier rule and the keyword rule at equal length, so
        // declaration order (lower token code) must decide.
        let spec = "letter = [A-Za-z]\n_KW50 = if\n_ID100 = letter letter*";
        let lexer = LexerBuild::from_spec(spec, BuildLog::None).unwrap();
        let tokens = lexer.tokenize("if").unwrap();
        assert_eq!(tokens[0].code, 50);
    }

    #[test]
    fn reports_position_of_unmatched_input() {
        let spec = "_ID100 = a";
        let lexer = LexerBuild::from_spec(spec, BuildLog::None).unwrap();
        let err = lexer.tokenize("ab").unwrap_err();
        assert!(matches!(err, BuildError::ParseFailure { pointer: 1, .. }));
    }
}
