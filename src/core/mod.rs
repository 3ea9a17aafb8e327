//! Core types shared by every component of the render engine.
//!
//! This module defines the crate's single error enum and the `Pos` type
//! that nearly every other module threads through its public API. Keeping
//! them here (rather than duplicating a "location" concept per-component)
//! is what lets [`RenderError::Display`] always prefix a message with
//! `"at line L col C: "` when a position is known, regardless of which
//! component raised the error.

pub mod error;
pub mod pos;

pub use error::{JoinedError, RenderError, RenderResult};
pub use pos::Pos;
