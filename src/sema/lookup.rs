//! Name lookup — resolving a name at a source position to candidate
//! declarations.
//!
//! [`LookupContext`] is a pure function of its inputs: the innermost visible
//! symbol at the query point (the anchor), the working document, and the
//! snapshot of all parsed documents. It returns an ordered candidate list,
//! innermost scope first, mirroring C++ unqualified lookup. Qualified names
//! are narrowed one qualifier at a time into the candidates' scopes.
//!
//! Cross-file effects come from namespace reopening: when a lookup level is
//! a namespace, the equivalent namespace in every other snapshot document is
//! searched too. A file missing from the snapshot simply contributes no
//! candidates.

use tracing::trace;

use crate::sema::name::Name;
use crate::sema::snapshot::{Document, Snapshot};
use crate::sema::symbols::{SymbolId, SymbolRef};

/// The lookup context at one source position.
pub struct LookupContext<'a> {
    document: &'a Document,
    snapshot: &'a Snapshot,
    anchor: SymbolRef<'a>,
}

impl<'a> LookupContext<'a> {
    /// Build a context. `anchor` is the innermost visible symbol at the
    /// query point (from [`Document::find_symbol_at`]); `None` degrades to
    /// global-namespace resolution rather than failing.
    pub fn new(document: &'a Document, snapshot: &'a Snapshot, anchor: Option<SymbolId>) -> Self {
        let anchor = anchor
            .map(|id| SymbolRef::new(document.table(), id))
            .unwrap_or_else(|| document.root_ref());
        Self {
            document,
            snapshot,
            anchor,
        }
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn anchor(&self) -> SymbolRef<'a> {
        self.anchor
    }

    /// Resolve `name` to the ordered set of declarations it may denote.
    pub fn candidates(&self, name: &Name) -> Vec<SymbolRef<'a>> {
        let result = match name {
            Name::Qualified { components, global } => self.qualified(components, *global),
            unqualified => self.unqualified(unqualified),
        };
        trace!(
            name = ?name,
            count = result.len(),
            file = %self.document.file_name(),
            "lookup"
        );
        result
    }

    /// Members of `class` matching `name`; used for member-access
    /// resolution once the left operand's type is known.
    pub fn lookup_member(&self, class: SymbolRef<'a>, name: &Name) -> Vec<SymbolRef<'a>> {
        self.members_matching(class, name)
    }

    fn unqualified(&self, name: &Name) -> Vec<SymbolRef<'a>> {
        let mut out = self.scope_chain(name);

        // `~X` also yields the class named X, so that targeting either the
        // destructor or the class finds the token.
        if let Name::Destructor(id) = name {
            out.extend(self.scope_chain(&Name::Simple(*id)));
        }
        out
    }

    fn scope_chain(&self, name: &Name) -> Vec<SymbolRef<'a>> {
        let mut out = Vec::new();
        for id in self.anchor.table.ancestors(self.anchor.id) {
            let level = SymbolRef::new(self.anchor.table, id);
            if !level.symbol().is_scoped() {
                continue;
            }
            out.extend(self.members_matching(level, name));
            if level.symbol().is_namespace() {
                for reopened in self.equivalent_namespaces(level) {
                    out.extend(self.members_matching(reopened, name));
                }
            }
        }
        out
    }

    fn qualified(&self, components: &[Name], global: bool) -> Vec<SymbolRef<'a>> {
        let (first, rest) = match components.split_first() {
            Some(parts) => parts,
            None => return Vec::new(),
        };

        let mut current = if global {
            let mut roots = vec![self.document.root_ref()];
            roots.extend(self.equivalent_namespaces(self.document.root_ref()));
            roots
                .into_iter()
                .flat_map(|root| self.members_matching(root, first))
                .collect()
        } else {
            self.unqualified(first)
        };

        for component in rest {
            let mut next = Vec::new();
            for candidate in current {
                if !candidate.symbol().is_scoped() {
                    continue;
                }
                next.extend(self.members_matching(candidate, component));
                if candidate.symbol().is_namespace() {
                    for reopened in self.equivalent_namespaces(candidate) {
                        next.extend(self.members_matching(reopened, component));
                    }
                }
            }
            current = next;
        }
        current
    }

    /// Resolve one qualifier prefix of a qualified name: the components up
    /// to and including index `upto`.
    pub fn candidates_for_prefix(
        &self,
        components: &[Name],
        global: bool,
        upto: usize,
    ) -> Vec<SymbolRef<'a>> {
        if upto + 1 > components.len() {
            return Vec::new();
        }
        self.qualified(&components[..=upto], global)
    }

    /// Direct members of `scope` matching `name`, plus enumerators of
    /// member enums: unscoped enumerators are visible in the scope that
    /// contains their enum.
    fn members_matching(&self, scope: SymbolRef<'a>, name: &Name) -> Vec<SymbolRef<'a>> {
        let mut out: Vec<SymbolRef<'a>> = scope
            .members()
            .filter(|member| declared_matches(member, name))
            .collect();
        for member in scope.members() {
            if member.symbol().is_enum() {
                out.extend(member.members().filter(|e| declared_matches(e, name)));
            }
        }
        out
    }

    /// The same namespace reopened in other snapshot documents.
    ///
    /// Matched by walking each document's root along the enclosing name
    /// path. Anonymous namespaces have no cross-file equivalent.
    fn equivalent_namespaces(&self, namespace: SymbolRef<'a>) -> Vec<SymbolRef<'a>> {
        let path = match self.namespace_path(namespace) {
            Some(path) => path,
            None => return Vec::new(),
        };

        let mut out = Vec::new();
        for doc in self.snapshot.iter() {
            if std::ptr::eq(doc.table(), namespace.table) {
                continue;
            }
            let mut level = vec![doc.root_ref()];
            for segment in &path {
                let mut next = Vec::new();
                for ns in level {
                    next.extend(
                        self.members_matching(ns, segment)
                            .into_iter()
                            .filter(|m| m.symbol().is_namespace()),
                    );
                }
                level = next;
            }
            out.extend(level);
        }
        out
    }

    /// Names of the enclosing namespaces from just below the root down to
    /// `namespace` itself. Empty for the root. `None` if any level is
    /// anonymous.
    fn namespace_path(&self, namespace: SymbolRef<'a>) -> Option<Vec<Name>> {
        let mut path = Vec::new();
        let mut chain: Vec<SymbolRef<'a>> = namespace
            .table
            .ancestors(namespace.id)
            .map(|id| SymbolRef::new(namespace.table, id))
            .collect();
        chain.reverse();
        for level in chain {
            if level.symbol().enclosing.is_none() {
                continue; // unnamed global namespace
            }
            path.push(level.name()?.clone());
        }
        Some(path)
    }
}

fn declared_matches(member: &SymbolRef<'_>, name: &Name) -> bool {
    member
        .name()
        .is_some_and(|declared| declared.matches_unqualified(name))
}
