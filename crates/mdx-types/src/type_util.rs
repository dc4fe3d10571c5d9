//! Helpers for function resolution over MDX types

use mdx_schema::Hierarchy;

use crate::{MemberType, OlapType};

/// Member type equivalent of a metadata type
///
/// A dimension, hierarchy or level expression used where a member is expected
/// denotes some member of it; the result keeps the same bindings. Returns
/// `None` for non-metadata types.
pub fn to_member_type(ty: &OlapType) -> Option<MemberType> {
    ty.metadata()
        .map(|(_, binding)| MemberType::from_binding(binding))
}

/// Element type of a set, or the type itself
pub fn strip_set(ty: &OlapType) -> &OlapType {
    match ty {
        OlapType::Set(set) => set.element_type(),
        _ => ty,
    }
}

pub fn is_set(ty: &OlapType) -> bool {
    matches!(ty, OlapType::Set(_))
}

/// Check whether an expression of this type can be used as a member
///
/// Hierarchies and dimensions stand for their current member.
pub fn could_be_member(ty: &OlapType) -> bool {
    matches!(
        ty,
        OlapType::Member(_) | OlapType::Hierarchy(_) | OlapType::Dimension(_)
    )
}

/// Hierarchy of each position of a member, tuple or set type
///
/// Positions without a known hierarchy are `None`.
pub fn hierarchies(ty: &OlapType) -> Vec<Option<Hierarchy>> {
    match strip_set(ty) {
        OlapType::Tuple(tuple) => tuple
            .elements()
            .iter()
            .map(|e| e.hierarchy().cloned())
            .collect(),
        other => vec![other.hierarchy().cloned()],
    }
}

/// Check whether two set types can be combined by a set union
///
/// Both must be sets whose elements have the same hierarchy in every
/// position.
pub fn is_union_compatible(a: &OlapType, b: &OlapType) -> bool {
    is_set(a) && is_set(b) && hierarchies(a) == hierarchies(b)
}
