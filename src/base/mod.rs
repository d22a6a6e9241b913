//! Foundation types for the cxxsema engine.
//!
//! This module provides the primitives used throughout the semantic model:
//! - [`TextRange`], [`TextSize`] - Source positions
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Ident`], [`Interner`] - Identifier-text interning
//!
//! This module has NO dependencies on other cxxsema modules.

mod intern;
mod span;

pub use intern::{Ident, Interner};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
