//! Error handling for the render engine.
//!
//! One enum, [`RenderError`], covers every failure kind the render engine
//! can raise. Each variant that can be traced back to a YAML node carries a
//! [`Pos`]; `Display` prefixes the message with `"at line L col C: "`
//! whenever that position is known, so the same string works whether the
//! error reached a terminal, a log line, or a test assertion.
//!
//! Causes are preserved with `#[source]` rather than flattened into a
//! string, so callers can still `matches!`/`downcast` the original error
//! kind after it has been wrapped.

use crate::core::Pos;
use thiserror::Error;

/// All failure kinds the render engine can produce.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The YAML document could not be parsed at all (bad syntax, not a map
    /// at the root, etc).
    #[error("{pos}: failed to parse YAML: {message}")]
    Parse { pos: Pos, message: String },

    /// A node decoded but violated the shape of its target type: an
    /// unknown field, a required field missing, or a field of the wrong
    /// type.
    #[error("{pos}: {message}")]
    Schema { pos: Pos, message: String },

    /// A node decoded and had the right shape, but violated a structural
    /// or cross-field rule (e.g. both `values` and `values_from` given).
    #[error("{pos}: {message}")]
    Validation { pos: Pos, message: String },

    /// A path contained `..` or otherwise attempted to escape its root.
    #[error("path escapes its root: {path}")]
    PathEscape { path: String },

    /// An include source, or a `walk_and_modify` target, does not exist.
    #[error("{pos}: path not found: {path}")]
    MissingPath { pos: Pos, path: String },

    /// A template referenced a scope variable that is not bound.
    #[error("{pos}: unknown variable {name:?} (available: {})", available.join(", "))]
    UnknownVar {
        pos: Pos,
        name: String,
        available: Vec<String>,
    },

    /// An expression failed to compile or to evaluate.
    #[error("{pos}: expression error: {message}")]
    Expr { pos: Pos, message: String },

    /// An expression evaluated, but its result could not be converted to
    /// the type the caller required.
    #[error("{pos}: cannot convert expression result to {target_type}: {engine_message}")]
    ExprConversion {
        pos: Pos,
        target_type: &'static str,
        engine_message: String,
    },

    /// Commit-time: a destination file would be overwritten without
    /// permission (neither `force_overwrite` nor `included_from_dest`).
    #[error("refusing to overwrite existing file without permission: {path}")]
    OverwriteRefused { path: String },

    /// A file/directory type mismatch at a target path (e.g. writing a
    /// file where a directory already exists).
    #[error("cannot overwrite a directory with a file: {path}")]
    DirFileConflict { path: String },

    /// A glob expression in `walk_and_modify` matched no files.
    #[error("{pos}: glob pattern matched no files: {pattern}")]
    GlobNoMatch { pos: Pos, pattern: String },

    /// Resolving `inputs` against user-supplied values failed: unknown
    /// keys, missing required keys, or a rule violation.
    #[error("invalid inputs: {message}")]
    Input { message: String },

    /// Any other filesystem failure not covered by a more specific kind.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The caller's cancellation token fired.
    #[error("render canceled")]
    Canceled,
}

impl RenderError {
    #[must_use]
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The position carried by this error, if any.
    #[must_use]
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Self::Parse { pos, .. }
            | Self::Schema { pos, .. }
            | Self::Validation { pos, .. }
            | Self::MissingPath { pos, .. }
            | Self::UnknownVar { pos, .. }
            | Self::Expr { pos, .. }
            | Self::ExprConversion { pos, .. }
            | Self::GlobNoMatch { pos, .. } => Some(*pos),
            _ => None,
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Wraps a primary error together with a cleanup error that happened while
/// trying to unwind after it, so both are reported instead of the cleanup
/// failure silently swallowing the original cause.
#[derive(Error, Debug)]
#[error("{primary}\n\nadditionally, cleanup failed: {cleanup}")]
pub struct JoinedError {
    #[source]
    pub primary: RenderError,
    pub cleanup: RenderError,
}

impl JoinedError {
    #[must_use]
    pub fn new(primary: RenderError, cleanup: RenderError) -> Self {
        Self { primary, cleanup }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_known_position() {
        let err = RenderError::UnknownVar {
            pos: Pos::new(4, 7),
            name: "foo".to_string(),
            available: vec!["bar".to_string(), "baz".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("line 4 col 7"));
        assert!(msg.contains("\"foo\""));
        assert!(msg.contains("bar, baz"));
    }

    #[test]
    fn joined_error_reports_both() {
        let primary = RenderError::Canceled;
        let cleanup = RenderError::io("scratch", std::io::Error::other("boom"));
        let joined = JoinedError::new(primary, cleanup);
        let msg = joined.to_string();
        assert!(msg.contains("canceled"));
        assert!(msg.contains("cleanup failed"));
    }
}
