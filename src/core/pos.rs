//! Source positions recovered from the YAML loader.

use std::fmt;

/// A 1-based line/column into a source YAML document.
///
/// `Pos::default()` (`0, 0`) means "no position available" — it is never
/// produced by the YAML loader itself, only used as a placeholder for
/// errors that originate outside any YAML node (e.g. a filesystem error
/// while copying a file that no longer traces back to a single spec line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.line != 0 || self.column != 0
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} col {}", self.line, self.column)
    }
}
