//! Semantic model — names, symbols, scopes, types, lookup, and the
//! parsed-document contracts.
//!
//! Layering inside this module:
//!
//! ```text
//! lookup    → LookupContext (name → candidate declarations)
//! snapshot  → Document / Snapshot / TypeOfExpression boundary
//! symbols   → SymbolTable arena, Scope, SymbolRef
//! types     → Type values
//! name      → Name values
//! ```

pub mod lookup;
pub mod name;
pub mod snapshot;
pub mod symbols;
pub mod types;

pub use lookup::LookupContext;
pub use name::Name;
pub use snapshot::{Document, NullTypeOfExpression, Snapshot, Token, TypeItem, TypeOfExpression};
pub use symbols::{
    ClassKey, ModelError, Scope, ScopeId, Symbol, SymbolId, SymbolKind, SymbolRef, SymbolTable,
};
pub use types::{Type, match_types};
