//! # cxxsema
//!
//! Core library for C++ semantic modeling and usage resolution: the engine
//! behind "find all usages" in a C++ tooling environment.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide     → find-usages engine (usage scanner + canonical matching)
//!   ↓
//! sema    → semantic model: names, symbol/scope graph, types, lookup,
//!           document/snapshot contracts
//!   ↓
//! ast     → tagged-union AST consumed by the scanner
//!   ↓
//! base    → primitives (spans, identifier interning)
//! ```
//!
//! ## Boundary
//!
//! Lexing and parsing are external: an upstream parser/binder produces a
//! [`sema::Document`] (tokens, AST, symbol table) and publishes it into a
//! [`sema::Snapshot`]. One call to [`ide::find_usages`] scans one
//! translation unit to completion, synchronously, and returns the usage
//! list; invoking it again with the same inputs returns the same list.

/// Foundation types: spans, identifier interning
pub mod base;

/// Tagged-union AST consumed by the usage scanner
pub mod ast;

/// Semantic model: names, symbols, scopes, types, lookup, snapshots
pub mod sema;

/// IDE features: find-usages
pub mod ide;

// Re-export commonly needed items
pub use ast::AstNode;
pub use base::{Ident, Interner, LineCol, LineIndex, TextRange, TextSize};
pub use ide::{Usage, UsageConfig, UsageSearch, find_usages, find_usages_in_snapshot};
pub use sema::{
    Document, LookupContext, Name, NullTypeOfExpression, Snapshot, SymbolId, SymbolKind, SymbolRef,
    SymbolTable, Type, TypeOfExpression,
};
