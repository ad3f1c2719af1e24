//! `Code`: a byte-slice view of an input program with lazily computed
//! line-break positions, used to turn a byte pointer into a line/column
//! [`Position`] for error messages. The line-break index is memoized in
//! a `OnceCell` and looked up by binary search.

use once_cell::unsync::OnceCell;
use std::fmt;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

pub struct Code<'c> {
    pub value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
}

impl<'c> From<&'c [u8]> for Code<'c> {
    fn from(value: &'c [u8]) -> Self {
        Code::new(value)
    }
}
impl<'c> From<&'c str> for Code<'c> {
    fn from(value: &'c str) -> Self {
        Code::new(value.as_bytes())
    }
}

impl<'c> Code<'c> {
    pub fn new(value: &'c [u8]) -> Self {
        Self {
            value,
            line_breaks: OnceCell::new(),
        }
    }

    fn line_breaks(&self) -> &Vec<usize> {
        self.line_breaks.get_or_init(|| {
            self.value
                .iter()
                .enumerate()
                .filter_map(|(index, b)| if *b == b'\n' { Some(index) } else { None })
                .collect()
        })
    }

    /// Line/column position of a byte pointer into this code, 1-indexed.
    pub fn position_at(&self, pointer: usize) -> Position {
        let line_breaks = self.line_breaks();
        let index = match line_breaks.binary_search(&pointer) {
            Ok(index) | Err(index) => index,
        };

        if index == 0 {
            let s = unsafe { std::str::from_utf8_unchecked(&self.value[..pointer.min(self.value.len())]) };
            Position::new(1, s.chars().count() + 1)
        } else {
            let break_point = line_breaks[index - 1] + 1;
            let end = pointer.max(break_point).min(self.value.len());
            let s = unsafe { std::str::from_utf8_unchecked(&self.value[break_point..end]) };
            Position::new(index + 1, s.chars().count() + 1)
        }
    }
}
