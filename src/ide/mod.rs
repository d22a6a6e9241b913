//! IDE-facing features built on the semantic model.
//!
//! Each function here is a pure query: data in, data out, no LSP or editor
//! types. The usage scanner is the core of "find all usages" and "rename";
//! the returned token indices let a rename collaborator re-enter the AST at
//! exactly the matched tokens.

mod usages;

pub use usages::{Usage, UsageConfig, UsageSearch, find_usages, find_usages_in_snapshot};
