//! Shunting-yard Thompson construction: turns one preprocessed regex
//! string into an [`Nfa`], expanding variable sentinel bytes recursively
//! on the way.
//!
//! Operator precedence, low to high: `|` (union) < `@` (explicit
//! concatenation) < `*`/`?` (postfix, applied the instant they're seen
//! since nothing binds tighter). Parentheses override precedence as
//! usual.

use crate::error::BuildError;
use crate::nfa::{Nfa, NfaNodeId};
use crate::regexp::{escape_metachar, VariableTable, ESCAPABLE_METACHARS};

const MAX_VARIABLE_RECURSION: usize = 64;

pub struct NfaBuilder;

impl NfaBuilder {
    pub fn build(regex: &str, variables: &VariableTable) -> Result<Nfa, BuildError> {
        build_inner(regex, variables, 0)
    }
}

fn build_inner(regex: &str, variables: &VariableTable, depth: usize) -> Result<Nfa, BuildError> {
    if depth > MAX_VARIABLE_RECURSION {
        return Err(BuildError::RegexSyntax(
            "variable reference nesting too deep".into(),
        ));
    }

    let mut values: Vec<Nfa> = Vec::new();
    let mut ops: Vec<char> = Vec::new();

    for c in regex.chars() {
        match c {
            '(' => ops.push('('),
            ')' => {
                loop {
                    match ops.pop() {
                        Some('(') => break,
                        Some(op) => apply_binary(op, &mut values)?,
                        None => {
                            return Err(BuildError::RegexSyntax(
                                "unbalanced ')' in regex".into(),
                            ))
                        }
                    }
                }
            }
            '*' => {
                let a = values
                    .pop()
                    .ok_or_else(|| BuildError::RegexSyntax("'*' with no preceding atom".into()))?;
                values.push(Nfa::star(a));
            }
            '?' => {
                let a = values
                    .pop()
                    .ok_or_else(|| BuildError::RegexSyntax("'?' with no preceding atom".into()))?;
                values.push(Nfa::optional(a));
            }
            '@' | '|' => {
                while let Some(&top) = ops.last() {
                    if top != '(' && precedence(top) >= precedence(c) {
                        apply_binary(ops.pop().unwrap(), &mut values)?;
                    } else {
                        break;
                    }
                }
                ops.push(c);
            }
            atom => values.push(build_atom(atom, variables, depth)?),
        }
    }

    while let Some(op) = ops.pop() {
        if op == '(' {
            return Err(BuildError::RegexSyntax("unbalanced '(' in regex".into()));
        }
        apply_binary(op, &mut values)?;
    }

    values
        .pop()
        .filter(|_| values.is_empty())
        .ok_or_else(|| BuildError::RegexSyntax("malformed regex".into()))
}

fn precedence(op: char) -> u8 {
    match op {
        '|' => 1,
        '@' => 2,
        _ => 0,
    }
}

fn apply_binary(op: char, values: &mut Vec<Nfa>) -> Result<(), BuildError> {
    let b = values
        .pop()
        .ok_or_else(|| BuildError::RegexSyntax(format!("'{op}' missing right operand")))?;
    let a = values
        .pop()
        .ok_or_else(|| BuildError::RegexSyntax(format!("'{op}' missing left operand")))?;
    values.push(match op {
        '@' => Nfa::concat(a, b),
        '|' => Nfa::union(a, b),
        _ => unreachable!("only '@' and '|' are pushed onto the operator stack"),
    });
    Ok(())
}

fn build_atom(c: char, variables: &VariableTable, depth: usize) -> Result<Nfa, BuildError> {
    let byte = c as u32;
    if (0x01..=ESCAPABLE_METACHARS.len() as u32).contains(&byte) {
        let literal = escape_metachar(byte as u8)
            .ok_or_else(|| BuildError::RegexSyntax("unrecognized escape sentinel".into()))?;
        return Ok(Nfa::literal(literal));
    }
    if byte >= 0x80 && byte <= 0xFE {
        let sub_regex = variables.compiled_of_byte(byte as u8).ok_or_else(|| {
            BuildError::RegexSyntax("reference to an undefined variable sentinel".into())
        })?;
        return build_inner(sub_regex, variables, depth + 1);
    }
    Ok(Nfa::literal(c))
}

/// Node-id ordering over a freshly built fragment, used by callers that
/// want deterministic debug output without re-deriving it from the node
/// vector themselves.
pub fn node_ids_in_order(nfa: &Nfa) -> Vec<NfaNodeId> {
    (0..nfa.nodes.len()).map(NfaNodeId).collect()
}
