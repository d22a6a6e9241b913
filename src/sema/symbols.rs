//! Symbol and scope graph.
//!
//! Declarations are stored in a per-document arena ([`SymbolTable`]) and
//! referenced by stable integer handles. Back-references (enclosing symbol,
//! scope owner) are handles, never owning pointers, so the hierarchy cannot
//! form ownership cycles.
//!
//! Ownership is strictly hierarchical: a child symbol belongs to exactly one
//! [`Scope`], and a scope belongs to exactly one scoped symbol. Scope member
//! lists preserve insertion order and permit duplicate names (overloads and
//! shadowing are legal).

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::base::LineCol;
use crate::sema::name::Name;
use crate::sema::types::Type;

/// A handle to a symbol within one [`SymbolTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub(crate) const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// A handle to a scope within one [`SymbolTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub(crate) const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// The class-key of a class-like declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassKey {
    Class,
    Struct,
    Union,
}

/// The kind of a declaration.
///
/// Declarations and arguments carry their declared type; functions carry a
/// return type. Class/enum/namespace/function/forward-declaration symbols
/// double as their own type (see [`SymbolTable::type_of`]).
#[derive(Clone, Debug, PartialEq)]
pub enum SymbolKind {
    Namespace,
    Class(ClassKey),
    ForwardClassDeclaration,
    Function { ret: Type },
    Enum,
    Enumerator,
    Declaration { ty: Type },
    Argument { ty: Type },
    Block,
    ObjcClass,
    ObjcProtocol,
    ObjcMethod,
}

impl SymbolKind {
    /// Whether a symbol of this kind owns a scope of child symbols.
    pub fn is_scoped(&self) -> bool {
        matches!(
            self,
            SymbolKind::Namespace
                | SymbolKind::Class(_)
                | SymbolKind::Function { .. }
                | SymbolKind::Enum
                | SymbolKind::Block
                | SymbolKind::ObjcClass
                | SymbolKind::ObjcProtocol
                | SymbolKind::ObjcMethod
        )
    }
}

/// One C++ declaration.
#[derive(Clone, Debug)]
pub struct Symbol {
    /// The declared name, if any (anonymous entities have none).
    pub name: Option<Name>,
    /// Position of the declaration's name token.
    pub start: LineCol,
    /// End of the declaration's extent. Equal to `start` for symbols
    /// without a body.
    pub end: LineCol,
    /// What kind of declaration this is.
    pub kind: SymbolKind,
    /// The innermost declaration this one is nested in. `None` only for the
    /// root (global namespace).
    pub enclosing: Option<SymbolId>,
    /// The scope of child symbols, for scoped kinds.
    pub scope: Option<ScopeId>,
}

impl Symbol {
    pub fn is_class(&self) -> bool {
        matches!(self.kind, SymbolKind::Class(_))
    }

    pub fn is_forward_class_declaration(&self) -> bool {
        matches!(self.kind, SymbolKind::ForwardClassDeclaration)
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self.kind, SymbolKind::Namespace)
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function { .. })
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, SymbolKind::Enum)
    }

    pub fn is_scoped(&self) -> bool {
        self.scope.is_some()
    }
}

/// An ordered container of symbols owned by exactly one scoped symbol.
#[derive(Clone, Debug)]
pub struct Scope {
    /// The symbol this scope belongs to.
    pub owner: SymbolId,
    /// Members in insertion order. Names are not required to be unique.
    pub members: Vec<SymbolId>,
}

/// Errors raised while building the symbol graph.
///
/// The engine's queries never produce these; only the construction API used
/// by the parser/binder collaborator does.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("symbol {0:?} cannot own members")]
    NotAScope(SymbolId),
    #[error("unknown symbol {0:?}")]
    UnknownSymbol(SymbolId),
}

/// Arena of all symbols and scopes of one translation unit.
///
/// Created once per parse by the external binder and structurally immutable
/// for the duration of a scan.
#[derive(Debug)]
pub struct SymbolTable {
    /// The file this table's declarations live in.
    file_name: Arc<str>,
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// Create a table holding only the root symbol: the unnamed global
    /// namespace, whose extent covers the entire file.
    pub fn new(file_name: impl Into<Arc<str>>) -> Self {
        let mut table = Self {
            file_name: file_name.into(),
            symbols: Vec::new(),
            scopes: Vec::new(),
        };
        let root = SymbolId::from_raw(0);
        table.symbols.push(Symbol {
            name: None,
            start: LineCol::new(0, 0),
            end: LineCol::new(u32::MAX, u32::MAX),
            kind: SymbolKind::Namespace,
            enclosing: None,
            scope: Some(ScopeId::from_raw(0)),
        });
        table.scopes.push(Scope {
            owner: root,
            members: Vec::new(),
        });
        table
    }

    /// The file this table belongs to.
    pub fn file_name(&self) -> &Arc<str> {
        &self.file_name
    }

    /// The root symbol (global namespace).
    pub fn root(&self) -> SymbolId {
        SymbolId::from_raw(0)
    }

    /// Add a declaration under `parent`, which must be a scoped symbol.
    ///
    /// The new symbol is appended to the parent's scope, preserving
    /// insertion order. Scoped kinds get a fresh, empty scope of their own.
    pub fn add(
        &mut self,
        parent: SymbolId,
        kind: SymbolKind,
        name: Option<Name>,
        start: LineCol,
        end: LineCol,
    ) -> Result<SymbolId, ModelError> {
        let parent_scope = self
            .get(parent)
            .ok_or(ModelError::UnknownSymbol(parent))?
            .scope
            .ok_or(ModelError::NotAScope(parent))?;

        let id = SymbolId::from_raw(self.symbols.len() as u32);
        let scope = kind.is_scoped().then(|| {
            let scope_id = ScopeId::from_raw(self.scopes.len() as u32);
            self.scopes.push(Scope {
                owner: id,
                members: Vec::new(),
            });
            scope_id
        });

        self.symbols.push(Symbol {
            name,
            start,
            end,
            kind,
            enclosing: Some(parent),
            scope,
        });
        self.scopes[parent_scope.index() as usize].members.push(id);
        Ok(id)
    }

    /// Look up a symbol. Handles are only minted by this table, so a miss
    /// means a foreign handle.
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index() as usize)
    }

    /// Look up a symbol, panicking on foreign handles.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index() as usize]
    }

    /// Look up a scope.
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index() as usize]
    }

    /// Members of a scope, in insertion order.
    pub fn members(&self, id: ScopeId) -> &[SymbolId] {
        &self.scopes[id.index() as usize].members
    }

    /// Iterate the enclosing chain of `id`, starting with `id` itself and
    /// ending at the root. Finite by construction: a parent must already
    /// exist in the arena when a child is added.
    pub fn ancestors(&self, id: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        std::iter::successors(Some(id), move |&cur| self.symbol(cur).enclosing)
    }

    /// Number of symbols (including the root).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate all symbols with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId::from_raw(i as u32), s))
    }

    /// The `Type` view of a symbol.
    ///
    /// Class/enum/namespace/function/forward-declaration symbols are their
    /// own type; declarations and arguments yield their declared type.
    pub fn type_of(&self, id: SymbolId) -> Type {
        match &self.symbol(id).kind {
            SymbolKind::Namespace
            | SymbolKind::Class(_)
            | SymbolKind::ForwardClassDeclaration
            | SymbolKind::Function { .. }
            | SymbolKind::Enum
            | SymbolKind::ObjcClass
            | SymbolKind::ObjcProtocol => Type::Entity(id),
            SymbolKind::Declaration { ty } | SymbolKind::Argument { ty } => ty.clone(),
            SymbolKind::Enumerator => self
                .symbol(id)
                .enclosing
                .map(Type::Entity)
                .unwrap_or(Type::Unknown),
            SymbolKind::Block | SymbolKind::ObjcMethod => Type::Unknown,
        }
    }
}

/// A symbol paired with the table it lives in.
///
/// Lets candidates and targets from different documents be compared safely:
/// identity is "same table and same handle".
#[derive(Copy, Clone)]
pub struct SymbolRef<'a> {
    pub table: &'a SymbolTable,
    pub id: SymbolId,
}

impl<'a> SymbolRef<'a> {
    pub fn new(table: &'a SymbolTable, id: SymbolId) -> Self {
        Self { table, id }
    }

    pub fn symbol(&self) -> &'a Symbol {
        self.table.symbol(self.id)
    }

    pub fn name(&self) -> Option<&'a Name> {
        self.symbol().name.as_ref()
    }

    pub fn file_name(&self) -> &'a Arc<str> {
        self.table.file_name()
    }

    pub fn enclosing(&self) -> Option<SymbolRef<'a>> {
        self.symbol()
            .enclosing
            .map(|id| SymbolRef::new(self.table, id))
    }

    /// Members of this symbol's scope, empty for unscoped symbols.
    pub fn members(&self) -> impl Iterator<Item = SymbolRef<'a>> + 'a {
        let table = self.table;
        self.symbol()
            .scope
            .into_iter()
            .flat_map(move |scope| table.members(scope).iter())
            .map(move |&id| SymbolRef::new(table, id))
    }

    /// Identity: same arena, same handle.
    pub fn same_symbol(&self, other: &SymbolRef<'_>) -> bool {
        std::ptr::eq(
            self.table as *const SymbolTable,
            other.table as *const SymbolTable,
        ) && self.id == other.id
    }

}

impl fmt::Debug for SymbolRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolRef")
            .field("file", &self.table.file_name())
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}
