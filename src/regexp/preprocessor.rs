//! `RegexPreprocessor`: turns a textual lexical spec into a set of token
//! patterns ready for Thompson construction.
//!
//! Declarations are collected in a first pass so variable bindings may be
//! referenced regardless of declaration order relative to the token rules
//! that use them; a second pass performs the whole-word substitution. A
//! circular variable definition is rejected explicitly rather than left to
//! recurse forever when [`crate::nfa::builder`] later resolves sentinel
//! bytes.

use std::collections::{HashMap, HashSet};

use crate::error::BuildError;
use crate::regexp::variables::{escape_sentinel, VariableTable};

/// One compiled alternative of a token rule, tagged with its token code.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    pub code: i64,
    /// The rule name this alternative belongs to (`_ID100`, `_KW200S`, ...).
    pub rule_name: String,
    /// Fully preprocessed regex: escapes and character classes expanded,
    /// `+` rewritten, explicit `@` concatenation inserted. Variable
    /// sentinel bytes that appear in it are resolved recursively against
    /// [`PreprocessedSpec::variables`] at NFA-build time.
    pub regex: String,
}

#[derive(Debug, Clone)]
pub struct PreprocessedSpec {
    pub variables: VariableTable,
    pub patterns: Vec<TokenPattern>,
    /// `(r1)|(r2)|...|(rn)` — every pattern combined into one display form.
    pub combined_regex: String,
}

struct Declaration {
    name: String,
    raw_rhs: String,
    is_token_rule: bool,
}

pub struct RegexPreprocessor;

impl RegexPreprocessor {
    pub fn compile(spec_text: &str) -> Result<PreprocessedSpec, BuildError> {
        if spec_text.trim().is_empty() {
            return Err(BuildError::MissingInput(
                "lexical spec is empty".to_string(),
            ));
        }

        let declarations = parse_declarations(spec_text)?;

        let mut variables = VariableTable::new();
        for decl in declarations.iter().filter(|d| !d.is_token_rule) {
            variables.define(&decl.name, &decl.raw_rhs)?;
        }

        check_no_cycles(&variables)?;

        let mut compiled_vars: HashMap<String, String> = HashMap::new();
        for decl in declarations.iter().filter(|d| !d.is_token_rule) {
            let substituted = strip_insignificant_whitespace(&substitute_variable_names(
                &decl.raw_rhs,
                &variables,
            ));
            let compiled = finish_compile(&substituted)?;
            compiled_vars.insert(decl.name.clone(), compiled);
        }
        variables.install_compiled(compiled_vars);

        let mut patterns = Vec::new();
        for decl in declarations.iter().filter(|d| d.is_token_rule) {
            let (base_name, first_code, multi) = parse_token_rule_name(&decl.name)?;
            let substituted = strip_insignificant_whitespace(&substitute_variable_names(
                &decl.raw_rhs,
                &variables,
            ));
            let alt_texts: Vec<String> = if multi {
                split_top_level_alternatives(&substituted)
            } else {
                vec![substituted]
            };
            if alt_texts.is_empty() {
                return Err(BuildError::SpecSyntax(format!(
                    "token rule '{}' has no alternatives",
                    decl.name
                )));
            }
            for (i, alt) in alt_texts.iter().enumerate() {
                let compiled = finish_compile(alt)?;
                if compiled.is_empty() {
                    return Err(BuildError::RegexSyntax(format!(
                        "token rule '{}' alternative {} compiles to an empty regex",
                        decl.name, i
                    )));
                }
                patterns.push(TokenPattern {
                    code: first_code + i as i64,
                    rule_name: format!("_{}{}", base_name, first_code),
                    regex: compiled,
                });
            }
        }

        if patterns.is_empty() {
            return Err(BuildError::SpecSyntax(
                "lexical spec has no compilable token rules (no name starting with '_')".into(),
            ));
        }

        let combined_regex = patterns
            .iter()
            .map(|p| format!("({})", p.regex))
            .collect::<Vec<_>>()
            .join("|");
        if combined_regex.is_empty() {
            return Err(BuildError::RegexSyntax("combined regex is empty".into()));
        }

        Ok(PreprocessedSpec {
            variables,
            patterns,
            combined_regex,
        })
    }
}

fn parse_declarations(spec_text: &str) -> Result<Vec<Declaration>, BuildError> {
    let mut decls = Vec::new();
    for (line_no, raw_line) in spec_text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let eq_pos = line.find('=').ok_or_else(|| {
            BuildError::SpecSyntax(format!("line {}: missing '=': {:?}", line_no + 1, line))
        })?;
        let name = line[..eq_pos].trim();
        let rhs = line[eq_pos + 1..].trim();
        if name.is_empty() {
            return Err(BuildError::SpecSyntax(format!(
                "line {}: empty declaration name",
                line_no + 1
            )));
        }
        if rhs.is_empty() {
            return Err(BuildError::SpecSyntax(format!(
                "line {}: empty right-hand side for '{}'",
                line_no + 1,
                name
            )));
        }
        let is_token_rule = name.starts_with('_');
        decls.push(Declaration {
            name: name.to_string(),
            raw_rhs: rhs.to_string(),
            is_token_rule,
        });
    }
    Ok(decls)
}

/// `_IDENTnumber` or `_IDENTnumberS` -> (IDENT, number, is_multi).
fn parse_token_rule_name(name: &str) -> Result<(String, i64, bool), BuildError> {
    let body = &name[1..]; // strip leading '_'
    let (body, multi) = match body.strip_suffix('S') {
        Some(rest) => (rest, true),
        None => (body, false),
    };
    let digits_start = body
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    let digits_start = digits_start.ok_or_else(|| {
        BuildError::SpecSyntax(format!(
            "token rule '{name}' is missing a numeric token code"
        ))
    })?;
    let ident = &body[..digits_start];
    let digits = &body[digits_start..];
    if ident.is_empty() {
        return Err(BuildError::SpecSyntax(format!(
            "token rule '{name}' is missing an identifier before its numeric code"
        )));
    }
    let code: i64 = digits.parse().map_err(|_| {
        BuildError::SpecSyntax(format!("token rule '{name}' has an invalid numeric code"))
    })?;
    Ok((ident.to_string(), code, multi))
}

/// Whitespace inside a right-hand side is a separator between adjacent
/// atoms (most usefully, between two variable references with no other
/// delimiter), never a literal character to match — except inside a
/// `[...]` character class, where it's ordinary class content (how a
/// lexical spec matches a literal space, tab, or newline).
fn strip_insignificant_whitespace(s: &str) -> String {
    let mut out = String::new();
    let mut in_class = false;
    for c in s.chars() {
        match c {
            '[' => {
                in_class = true;
                out.push(c);
            }
            ']' => {
                in_class = false;
                out.push(c);
            }
            c if c.is_whitespace() && !in_class => {}
            c => out.push(c),
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn substitute_variable_names(text: &str, variables: &VariableTable) -> String {
    let names = variables.names_longest_first();
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    'outer: while i < chars.len() {
        for name in &names {
            let name_chars: Vec<char> = name.chars().collect();
            let end = i + name_chars.len();
            if end <= chars.len() && chars[i..end] == name_chars[..] {
                let before_ok = i == 0 || !is_word_char(chars[i - 1]);
                let after_ok = end == chars.len() || !is_word_char(chars[end]);
                if before_ok && after_ok {
                    let byte = variables.byte_of(name).expect("name came from table");
                    out.push(byte as char);
                    i = end;
                    continue 'outer;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn check_no_cycles(variables: &VariableTable) -> Result<(), BuildError> {
    let names: Vec<&str> = variables.names_longest_first();
    let mut state: HashMap<&str, u8> = HashMap::new(); // 0 unvisited, 1 in-stack, 2 done

    fn visit<'a>(
        name: &'a str,
        variables: &'a VariableTable,
        state: &mut HashMap<&'a str, u8>,
    ) -> Result<(), BuildError> {
        match state.get(name) {
            Some(1) => {
                return Err(BuildError::SpecSyntax(format!(
                    "circular variable definition involving '{name}'"
                )))
            }
            Some(2) => return Ok(()),
            _ => {}
        }
        state.insert(name, 1);
        let rhs = variables.definition_of(name).unwrap_or("");
        let referenced = referenced_variable_names(rhs, variables);
        for r in referenced {
            visit(r, variables, state)?;
        }
        state.insert(name, 2);
        Ok(())
    }

    for name in names {
        visit(name, variables, &mut state)?;
    }
    Ok(())
}

fn referenced_variable_names<'a>(text: &str, variables: &'a VariableTable) -> Vec<&'a str> {
    let names = variables.names_longest_first();
    let chars: Vec<char> = text.chars().collect();
    let mut found = HashSet::new();
    let mut i = 0;
    'outer: while i < chars.len() {
        for name in &names {
            let name_chars: Vec<char> = name.chars().collect();
            let end = i + name_chars.len();
            if end <= chars.len() && chars[i..end] == name_chars[..] {
                let before_ok = i == 0 || !is_word_char(chars[i - 1]);
                let after_ok = end == chars.len() || !is_word_char(chars[end]);
                if before_ok && after_ok {
                    found.insert(*name);
                    i = end;
                    continue 'outer;
                }
            }
        }
        i += 1;
    }
    names.into_iter().filter(|n| found.contains(n)).collect()
}

/// Escapes, character classes, `+` expansion, and explicit concatenation,
/// applied in that order to an already variable-substituted right-hand
/// side.
fn finish_compile(substituted: &str) -> Result<String, BuildError> {
    if substituted.is_empty() {
        return Err(BuildError::RegexSyntax("empty regex".into()));
    }
    let escaped = replace_escapes(substituted)?;
    let classes_expanded = expand_char_classes(&escaped)?;
    let plus_expanded = expand_one_or_more(&classes_expanded)?;
    let with_concat = insert_concatenation(&plus_expanded);
    if with_concat.is_empty() {
        return Err(BuildError::RegexSyntax("empty regex".into()));
    }
    Ok(with_concat)
}

fn replace_escapes(input: &str) -> Result<String, BuildError> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' {
            let next = chars.get(i + 1).copied().ok_or_else(|| {
                BuildError::RegexSyntax("dangling backslash escape at end of regex".into())
            })?;
            let sentinel = escape_sentinel(next).ok_or_else(|| {
                BuildError::RegexSyntax(format!("unsupported escape '\\{next}'"))
            })?;
            out.push(sentinel as char);
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Ok(out)
}

fn expand_char_classes(input: &str) -> Result<String, BuildError> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '[' {
            let close = chars[i + 1..]
                .iter()
                .position(|c| *c == ']')
                .map(|p| p + i + 1)
                .ok_or_else(|| BuildError::RegexSyntax("unbalanced '[' in character class".into()))?;
            let body: Vec<char> = chars[i + 1..close].to_vec();
            let alts = expand_class_body(&body)?;
            out.push('(');
            out.push_str(&alts.join("|"));
            out.push(')');
            i = close + 1;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Ok(out)
}

fn expand_class_body(body: &[char]) -> Result<Vec<char>, BuildError> {
    if body.is_empty() {
        return Err(BuildError::RegexSyntax("empty character class '[]'".into()));
    }
    let mut out = Vec::new();
    let mut i = 0;
    while i < body.len() {
        if i + 2 < body.len() && body[i + 1] == '-' {
            let lo = body[i] as u32;
            let hi = body[i + 2] as u32;
            if hi < lo {
                return Err(BuildError::RegexSyntax(format!(
                    "invalid character range '{}-{}'",
                    body[i], body[i + 2]
                )));
            }
            for code in lo..=hi {
                out.push(char::from_u32(code).ok_or_else(|| {
                    BuildError::RegexSyntax("invalid character code in range".into())
                })?);
            }
            i += 3;
        } else {
            out.push(body[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// `X+` -> `XX*`, duplicating only the immediately preceding atom: a
/// single literal/escape/variable-sentinel byte, or a balanced
/// parenthesized group (character classes have already become groups by
/// the time this runs).
fn expand_one_or_more(input: &str) -> Result<String, BuildError> {
    let chars: Vec<char> = input.chars().collect();
    let mut out: Vec<char> = Vec::new();
    for &c in &chars {
        if c == '+' {
            let last = *out
                .last()
                .ok_or_else(|| BuildError::RegexSyntax("'+' with no preceding atom".into()))?;
            let atom: Vec<char> = if last == ')' {
                let mut depth = 0i32;
                let mut start = None;
                for j in (0..out.len()).rev() {
                    match out[j] {
                        ')' => depth += 1,
                        '(' => {
                            depth -= 1;
                            if depth == 0 {
                                start = Some(j);
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                let start = start.ok_or_else(|| {
                    BuildError::RegexSyntax("unbalanced parentheses before '+'".into())
                })?;
                out[start..].to_vec()
            } else {
                vec![last]
            };
            out.extend(atom.iter().copied());
            out.push('*');
        } else {
            out.push(c);
        }
    }
    Ok(out.into_iter().collect())
}

fn insert_concatenation(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    for i in 0..chars.len() {
        let c = chars[i];
        out.push(c);
        if i + 1 < chars.len() {
            let next = chars[i + 1];
            let left_ends_atom = !matches!(c, '(' | '|');
            let right_starts_atom = !matches!(next, ')' | '|' | '*' | '?');
            if left_ends_atom && right_starts_atom {
                out.push('@');
            }
        }
    }
    out
}

/// Splits on top-level `|` (not nested inside `(...)`), trimming
/// whitespace around each alternative, used for `_NAMEnumberS` rules.
fn split_top_level_alternatives(input: &str) -> Vec<String> {
    let mut alts = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                current.push(c);
            }
            '|' if depth == 0 => {
                alts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    alts.push(current.trim().to_string());
    alts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_spec() {
        assert!(matches!(
            RegexPreprocessor::compile("   \n  "),
            Err(BuildError::MissingInput(_))
        ));
    }

    #[test]
    fn whitespace_class_keeps_its_space_but_separator_space_is_dropped() {
        assert_eq!(strip_insignificant_whitespace("a [ \t] b"), "a[ \t]b");
    }

    #[test]
    fn rejects_missing_equals() {
        let err = RegexPreprocessor::compile("letter [A-Za-z]").unwrap_err();
        assert!(matches!(err, BuildError::SpecSyntax(_)));
    }

    #[test]
    fn rejects_spec_with_no_token_rules() {
        let err = RegexPreprocessor::compile("letter = [A-Za-z]").unwrap_err();
        assert!(matches!(err, BuildError::SpecSyntax(_)));
    }

    #[test]
    fn parses_single_code_rule() {
        let spec = RegexPreprocessor::compile("letter = [A-Za-z]\ndigit = [0-9]\n_ID100 = letter(letter|digit)*").unwrap();
        assert_eq!(spec.patterns.len(), 1);
        assert_eq!(spec.patterns[0].code, 100);
        assert_eq!(spec.patterns[0].rule_name, "_ID100");
    }

    #[test]
    fn multi_keyword_rule_assigns_successive_codes() {
        let spec = RegexPreprocessor::compile("_KW200S = if | then | else | end").unwrap();
        assert_eq!(spec.patterns.len(), 4);
        let codes: Vec<i64> = spec.patterns.iter().map(|p| p.code).collect();
        assert_eq!(codes, vec![200, 201, 202, 203]);
    }

    #[test]
    fn detects_variable_cycle() {
        let err = RegexPreprocessor::compile("a = b\nb = a\n_X1 = a").unwrap_err();
        assert!(matches!(err, BuildError::SpecSyntax(_)));
    }

    #[test]
    fn char_class_range_expands_byte_by_byte() {
        let spec = RegexPreprocessor::compile("_X1 = [a-c]").unwrap();
        // [a-c] -> (a|b|c), with explicit concatenation markers absent
        // (no adjacent atoms here), wrapped once by the `(...)` combiner.
        assert!(spec.patterns[0].regex.contains('|'));
    }

    #[test]
    fn plus_duplicates_single_literal() {
        let spec = RegexPreprocessor::compile("_X1 = a+").unwrap();
        assert_eq!(spec.patterns[0].regex, "a@a*");
    }

    #[test]
    fn plus_duplicates_balanced_group() {
        let spec = RegexPreprocessor::compile("_X1 = (ab)+").unwrap();
        assert_eq!(spec.patterns[0].regex, "(ab)@(ab)*");
    }

    #[test]
    fn rejects_unsupported_escape() {
        let err = RegexPreprocessor::compile("_X1 = \\z").unwrap_err();
        assert!(matches!(err, BuildError::RegexSyntax(_)));
    }

    #[test]
    fn forward_referenced_variable_is_resolved() {
        // two-pass design: _ID100 appears before `digit` is declared.
        let spec = RegexPreprocessor::compile("_ID100 = digit\ndigit = [0-9]").unwrap();
        assert_eq!(spec.patterns.len(), 1);
    }
}
