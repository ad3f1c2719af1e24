//! Sentinel-byte bookkeeping for variable bindings and escaped metacharacters.
//!
//! Both variable names (`letter`, `digit`, ...) and the ten escaped
//! metacharacters (`\+ \| \( \) \* \- \? \[ \] \~`) are represented, once
//! preprocessing has run, as single bytes outside the printable ASCII
//! range so that the shunting-yard parser in [`crate::nfa::builder`] never
//! confuses them with ordinary literal characters or with the `(`, `)`,
//! `|`, `*`, `?`, `@` operator bytes it already treats specially.

use std::collections::HashMap;

use crate::error::BuildError;

/// First byte of the reserved, non-printable range used for variable
/// sentinels. Escape-metacharacter sentinels live just below it.
const VARIABLE_RANGE_START: u8 = 0x80;
const VARIABLE_RANGE_END: u8 = 0xFE;

/// The ten metacharacters `preprocess` accepts a backslash escape for, in
/// the fixed order their sentinel bytes are assigned.
pub const ESCAPABLE_METACHARS: [char; 10] =
    ['+', '|', '(', ')', '*', '-', '?', '[', ']', '~'];

/// Sentinel byte for a two-character escape, e.g. `\+` -> some byte in
/// `0x01..=0x0A`. Escape sentinels are assigned once, in the fixed order
/// of [`ESCAPABLE_METACHARS`], and never collide with variable sentinels.
pub fn escape_sentinel(metachar: char) -> Option<u8> {
    ESCAPABLE_METACHARS
        .iter()
        .position(|c| *c == metachar)
        .map(|i| 0x01 + i as u8)
}

pub fn escape_metachar(sentinel: u8) -> Option<char> {
    if sentinel >= 0x01 && (sentinel as usize) <= ESCAPABLE_METACHARS.len() {
        Some(ESCAPABLE_METACHARS[(sentinel - 0x01) as usize])
    } else {
        None
    }
}

/// Bidirectional variable name <-> sentinel byte table, plus each
/// variable's (unexpanded, as-written) right-hand side.
#[derive(Debug, Default, Clone)]
pub struct VariableTable {
    name_to_byte: HashMap<String, u8>,
    byte_to_name: HashMap<u8, String>,
    definitions: HashMap<String, String>,
    compiled: HashMap<String, String>,
    next_byte: u8,
}

impl VariableTable {
    pub fn new() -> Self {
        Self {
            name_to_byte: HashMap::new(),
            byte_to_name: HashMap::new(),
            definitions: HashMap::new(),
            compiled: HashMap::new(),
            next_byte: VARIABLE_RANGE_START,
        }
    }

    /// Record a variable binding, assigning it a fresh sentinel byte.
    pub fn define(&mut self, name: &str, rhs: &str) -> Result<(), BuildError> {
        if self.name_to_byte.contains_key(name) {
            return Err(BuildError::SpecSyntax(format!(
                "variable '{name}' is defined more than once"
            )));
        }
        if self.next_byte > VARIABLE_RANGE_END {
            return Err(BuildError::SpecSyntax(
                "too many variable bindings; reserved sentinel range exhausted".into(),
            ));
        }
        let byte = self.next_byte;
        self.next_byte += 1;
        self.name_to_byte.insert(name.to_string(), byte);
        self.byte_to_name.insert(byte, name.to_string());
        self.definitions.insert(name.to_string(), rhs.to_string());
        Ok(())
    }

    pub fn byte_of(&self, name: &str) -> Option<u8> {
        self.name_to_byte.get(name).copied()
    }

    pub fn name_of(&self, byte: u8) -> Option<&str> {
        self.byte_to_name.get(&byte).map(String::as_str)
    }

    pub fn definition_of(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(String::as_str)
    }

    pub fn definition_of_byte(&self, byte: u8) -> Option<&str> {
        self.name_of(byte).and_then(|name| self.definition_of(name))
    }

    /// Record each variable's fully preprocessed regex (escapes and
    /// character classes expanded, `+` rewritten, concatenation inserted),
    /// still possibly containing other variables' sentinel bytes.
    pub fn install_compiled(&mut self, compiled: HashMap<String, String>) {
        self.compiled = compiled;
    }

    pub fn compiled_of(&self, name: &str) -> Option<&str> {
        self.compiled.get(name).map(String::as_str)
    }

    pub fn compiled_of_byte(&self, byte: u8) -> Option<&str> {
        self.name_of(byte).and_then(|name| self.compiled_of(name))
    }

    /// Every defined variable name, longest first, so substitution never
    /// lets a short name capture a prefix of a longer one.
    pub fn names_longest_first(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.name_to_byte.keys().map(String::as_str).collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_byte.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_distinct_bytes_in_reserved_range() {
        let mut table = VariableTable::new();
        table.define("letter", "[A-Za-z]").unwrap();
        table.define("digit", "[0-9]").unwrap();
        let lb = table.byte_of("letter").unwrap();
        let db = table.byte_of("digit").unwrap();
        assert_ne!(lb, db);
        assert!((VARIABLE_RANGE_START..=VARIABLE_RANGE_END).contains(&lb));
        assert_eq!(table.name_of(lb), Some("letter"));
    }

    #[test]
    fn rejects_duplicate_definition() {
        let mut table = VariableTable::new();
        table.define("letter", "[A-Za-z]").unwrap();
        assert!(table.define("letter", "[0-9]").is_err());
    }

    #[test]
    fn longest_first_ordering_protects_prefix_names() {
        let mut table = VariableTable::new();
        table.define("id", "x").unwrap();
        table.define("identifier", "y").unwrap();
        let names = table.names_longest_first();
        assert_eq!(names[0], "identifier");
    }

    #[test]
    fn escape_sentinel_roundtrips() {
        for c in ESCAPABLE_METACHARS {
            let s = escape_sentinel(c).unwrap();
            assert_eq!(escape_metachar(s), Some(c));
        }
    }
}
