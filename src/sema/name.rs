//! Structural name values.
//!
//! A [`Name`] represents one C++ name as it appears in source: a plain
//! identifier, a destructor name, a template-id, or a qualified chain.
//! Names are immutable values compared by structure, never by identity;
//! two names with equal content are interchangeable.

use crate::base::Ident;
use crate::sema::types::Type;

/// A structural, comparable representation of a C++ name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Name {
    /// A plain identifier, e.g. `size`.
    Simple(Ident),
    /// A destructor name, e.g. `~Buffer`. The ident is the class identifier
    /// without the leading `~`.
    Destructor(Ident),
    /// A template-id, e.g. `vector<int>`. The argument list is ordered but
    /// ignored during lookup (see [`Name::matches_unqualified`]).
    TemplateId { ident: Ident, args: Vec<Type> },
    /// A qualified name, e.g. `N::C::m` or `::std::size_t`. The last
    /// component is the terminal unqualified name; earlier components are
    /// the nested-name qualifiers.
    Qualified { components: Vec<Name>, global: bool },
}

impl Name {
    /// Convenience constructor for a qualified name.
    pub fn qualified(components: Vec<Name>, global: bool) -> Name {
        Name::Qualified { components, global }
    }

    /// The identifier of an unqualified name; for a qualified name, the
    /// identifier of its terminal component. `None` only for a malformed
    /// empty qualified chain.
    pub fn ident(&self) -> Option<Ident> {
        match self {
            Name::Simple(id) | Name::Destructor(id) => Some(*id),
            Name::TemplateId { ident, .. } => Some(*ident),
            Name::Qualified { components, .. } => components.last()?.ident(),
        }
    }

    /// The terminal unqualified component of this name.
    ///
    /// For unqualified names this is the name itself.
    pub fn terminal(&self) -> Option<&Name> {
        match self {
            Name::Qualified { components, .. } => components.last()?.terminal(),
            other => Some(other),
        }
    }

    /// The qualifier components of a qualified name, without the terminal.
    pub fn qualifiers(&self) -> &[Name] {
        match self {
            Name::Qualified { components, .. } if !components.is_empty() => {
                &components[..components.len() - 1]
            }
            _ => &[],
        }
    }

    /// Whether this is a destructor name.
    pub fn is_destructor(&self) -> bool {
        match self {
            Name::Destructor(_) => true,
            Name::Qualified { components, .. } => {
                components.last().is_some_and(Name::is_destructor)
            }
            _ => false,
        }
    }

    /// The lookup equivalence between a declared name and a queried name.
    ///
    /// - `Simple` and `TemplateId` cross-match when the base identifiers are
    ///   equal; template argument lists are ignored entirely. Tightening this
    ///   would silently drop usages of template specializations, so the
    ///   recall-favoring behavior is kept on purpose.
    /// - `Destructor` matches only `Destructor` with the same identifier.
    /// - Qualified names delegate to their terminal component.
    pub fn matches_unqualified(&self, query: &Name) -> bool {
        let (a, b) = match (self.terminal(), query.terminal()) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        match (a, b) {
            (Name::Destructor(x), Name::Destructor(y)) => x == y,
            (Name::Destructor(_), _) | (_, Name::Destructor(_)) => false,
            _ => a.ident() == b.ident() && a.ident().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Interner;

    #[test]
    fn test_structural_equality() {
        let interner = Interner::new();
        let foo = interner.intern("Foo");

        let a = Name::Simple(foo);
        let b = Name::Simple(interner.intern("Foo"));
        assert_eq!(a, b);

        let c = Name::Destructor(foo);
        assert_ne!(a, c);
    }

    #[test]
    fn test_terminal_of_qualified() {
        let interner = Interner::new();
        let n = interner.intern("N");
        let m = interner.intern("m");

        let name = Name::qualified(vec![Name::Simple(n), Name::Simple(m)], false);
        assert_eq!(name.terminal(), Some(&Name::Simple(m)));
        assert_eq!(name.ident(), Some(m));
        assert_eq!(name.qualifiers(), &[Name::Simple(n)]);
    }

    #[test]
    fn test_template_id_matches_simple() {
        let interner = Interner::new();
        let vec_id = interner.intern("vector");

        let simple = Name::Simple(vec_id);
        let templated = Name::TemplateId {
            ident: vec_id,
            args: vec![Type::Unknown],
        };

        // Argument lists are ignored: base identifiers decide the match.
        assert!(simple.matches_unqualified(&templated));
        assert!(templated.matches_unqualified(&simple));
    }

    #[test]
    fn test_destructor_only_matches_destructor() {
        let interner = Interner::new();
        let foo = interner.intern("Foo");

        let dtor = Name::Destructor(foo);
        let simple = Name::Simple(foo);

        assert!(dtor.matches_unqualified(&Name::Destructor(foo)));
        assert!(!dtor.matches_unqualified(&simple));
        assert!(!simple.matches_unqualified(&dtor));
    }
}
