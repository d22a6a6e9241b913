//! Type values.
//!
//! A [`Type`] is a structural value, not a node in the symbol graph. A type
//! built from a name ([`Type::Named`]) is never authoritative; it must be
//! resolved through the lookup context before being treated as a concrete
//! entity.

use crate::sema::name::Name;
use crate::sema::symbols::{SymbolId, SymbolTable};

/// A C++ type, compared structurally.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// `T*`
    Pointer(Box<Type>),
    /// `T&`
    Reference(Box<Type>),
    /// `T C::*`
    PointerToMember { class: Name, ty: Box<Type> },
    /// A type referred to by name, unresolved until looked up.
    Named(Name),
    /// A symbol that doubles as its own type (class, enum, namespace,
    /// function, forward declaration). Only meaningful together with the
    /// table the handle was minted by.
    Entity(SymbolId),
    /// No type information.
    Unknown,
}

impl Type {
    pub fn pointer_to(ty: Type) -> Type {
        Type::Pointer(Box::new(ty))
    }

    pub fn reference_to(ty: Type) -> Type {
        Type::Reference(Box::new(ty))
    }

    pub fn named(name: Name) -> Type {
        Type::Named(name)
    }
}

/// Structural matcher used for parameter/argument matching.
///
/// Pointer identity is never the criterion: two entity types from different
/// arenas match when the named declarations have structurally equal names,
/// and an entity matches a named type naming the same declaration.
pub fn match_types(a: &Type, table_a: &SymbolTable, b: &Type, table_b: &SymbolTable) -> bool {
    match (a, b) {
        (Type::Pointer(x), Type::Pointer(y)) | (Type::Reference(x), Type::Reference(y)) => {
            match_types(x, table_a, y, table_b)
        }
        (
            Type::PointerToMember { class: ca, ty: ta },
            Type::PointerToMember { class: cb, ty: tb },
        ) => ca == cb && match_types(ta, table_a, tb, table_b),
        (Type::Named(x), Type::Named(y)) => x.matches_unqualified(y),
        (Type::Entity(x), Type::Entity(y)) => {
            if std::ptr::eq(table_a as *const SymbolTable, table_b as *const SymbolTable) {
                x == y
            } else {
                entity_name(table_a, *x)
                    .zip(entity_name(table_b, *y))
                    .is_some_and(|(na, nb)| na.matches_unqualified(nb))
            }
        }
        (Type::Entity(x), Type::Named(n)) => {
            entity_name(table_a, *x).is_some_and(|en| en.matches_unqualified(n))
        }
        (Type::Named(n), Type::Entity(y)) => {
            entity_name(table_b, *y).is_some_and(|en| n.matches_unqualified(en))
        }
        (Type::Unknown, Type::Unknown) => true,
        _ => false,
    }
}

fn entity_name(table: &SymbolTable, id: SymbolId) -> Option<&Name> {
    table.get(id)?.name.as_ref()
}
