//! Bounded filesystem operations.
//!
//! Everything the action executor and pipeline driver do to the scratch,
//! backup, and destination directories goes through this module instead of
//! calling `std::fs` directly, so path-escape checks and dry-run behavior
//! live in exactly one place.

pub mod copy;
pub mod paths;
pub mod walk;

pub use copy::{CopyHint, CopyParams, copy_recursive};
pub use paths::{mkdir_all_checked, safe_rel_path};
pub use walk::walk_and_modify;
