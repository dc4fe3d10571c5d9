//! Type join
//!
//! Computes the most specific type two types can both be treated as, counting
//! the implicit conversions applied on the way. Used to type conditional
//! arms, set literals and other places where branches must agree.

use mdx_schema::Dimension;

use crate::metadata::join_metadata;
use crate::{MemberType, OlapType, OpaqueType, ScalarType, SetType, TupleType};

/// Result of a successful join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// The common type
    pub ty: OlapType,
    /// Widening, clearing and coercion steps applied to reach it
    pub conversions: u32,
}

impl OlapType {
    /// Join this type with another
    ///
    /// Returns `None` when the types have no common type, which is a normal
    /// outcome. Members and tuples evaluate to scalars, so the generic scalar
    /// absorbs them. Joining a type with itself always yields that type with zero
    /// conversions, and when both argument orders need zero conversions they
    /// yield the same type.
    pub fn join(&self, other: &OlapType) -> Option<Joined> {
        let mut conversions = 0;
        join_types(self, other, &mut conversions).map(|ty| Joined { ty, conversions })
    }

    /// Get the common type of this type and another, ignoring cost
    pub fn common_type(&self, other: &OlapType) -> Option<OlapType> {
        self.join(other).map(|joined| joined.ty)
    }
}

/// Find the common type of a list of types
///
/// Folds [`OlapType::join`] from the left. An empty list has no common type.
/// With `allow_conversions` unset, any join that needs a conversion fails the
/// whole list.
pub fn common_type_of(types: &[OlapType], allow_conversions: bool) -> Option<Joined> {
    let (first, rest) = types.split_first()?;
    let mut result = Joined {
        ty: first.clone(),
        conversions: 0,
    };
    for ty in rest {
        let joined = result.ty.join(ty)?;
        if !allow_conversions && joined.conversions > 0 {
            return None;
        }
        result = Joined {
            ty: joined.ty,
            conversions: result.conversions + joined.conversions,
        };
    }
    Some(result)
}

fn join_types(a: &OlapType, b: &OlapType, conversions: &mut u32) -> Option<OlapType> {
    if a == b {
        return Some(a.clone());
    }

    match (a, b) {
        (OlapType::Null, other) | (other, OlapType::Null) if other.is_scalar() => {
            Some(other.clone())
        }
        (OlapType::Scalar(x), OlapType::Scalar(y)) => x.join(y, conversions).map(OlapType::Scalar),
        (OlapType::Opaque(x), other) | (other, OlapType::Opaque(x)) => absorb(x, other, conversions),
        (OlapType::Tuple(x), OlapType::Tuple(y)) => join_tuples(x, y, conversions),
        (OlapType::Set(x), OlapType::Set(y)) => join_sets(x, y, conversions),
        (OlapType::Member(m), OlapType::Tuple(t)) | (OlapType::Tuple(t), OlapType::Member(m)) => {
            unwrap_singleton(m, t, conversions).or_else(|| {
                log::trace!("joining {} with {} as scalars", m, t);
                *conversions += 1;
                Some(OlapType::Scalar(ScalarType::Generic))
            })
        }
        (OlapType::Scalar(ScalarType::Generic), OlapType::Member(_) | OlapType::Tuple(_))
        | (OlapType::Member(_) | OlapType::Tuple(_), OlapType::Scalar(ScalarType::Generic)) => {
            *conversions += 1;
            Some(OlapType::SCALAR)
        }
        _ => {
            let (x, y) = (a.metadata()?, b.metadata()?);
            join_metadata(x, y, conversions)
        }
    }
}

/// Join two tuples position by position
fn join_tuples(x: &TupleType, y: &TupleType, conversions: &mut u32) -> Option<OlapType> {
    if x.arity() != y.arity() {
        return None;
    }
    let elements = x
        .elements()
        .iter()
        .zip(y.elements())
        .map(|(a, b)| join_types(a, b, conversions))
        .collect::<Option<Vec<_>>>()?;
    Some(OlapType::Tuple(TupleType::from_joined(elements)))
}

/// Join two sets through their elements
///
/// Member and tuple elements that cannot be unified degrade to an opaque
/// element instead of failing.
fn join_sets(x: &SetType, y: &SetType, conversions: &mut u32) -> Option<OlapType> {
    let element = match (x.element_type(), y.element_type()) {
        (OlapType::Member(m), OlapType::Tuple(t)) | (OlapType::Tuple(t), OlapType::Member(m)) => {
            unwrap_singleton(m, t, conversions).unwrap_or_else(|| {
                log::trace!("set elements {} and {} lose their structure", m, t);
                *conversions += 1;
                let mut dimensions = Vec::new();
                x.element_type().collect_dimensions(&mut dimensions);
                y.element_type().collect_dimensions(&mut dimensions);
                OlapType::Opaque(OpaqueType::new(dimensions))
            })
        }
        (a, b) => join_types(a, b, conversions)?,
    };
    Some(OlapType::Set(SetType::from_joined(element)))
}

/// Treat a 1-tuple as its only member
///
/// Succeeds when the tuple has arity 1 and its element joins with the member
/// to a member type. Conversions are only counted on success.
fn unwrap_singleton(member: &MemberType, tuple: &TupleType, conversions: &mut u32) -> Option<OlapType> {
    let [only] = tuple.elements() else {
        return None;
    };
    let mut local = 0;
    match join_types(&OlapType::Member(member.clone()), only, &mut local)? {
        joined @ OlapType::Member(_) => {
            *conversions += local;
            Some(joined)
        }
        _ => None,
    }
}

/// Widen an opaque element to cover another scalar-shaped type
fn absorb(opaque: &OpaqueType, other: &OlapType, conversions: &mut u32) -> Option<OlapType> {
    let mut dimensions: Vec<Dimension> = opaque.dimensions().to_vec();
    match other {
        OlapType::Scalar(_) | OlapType::Opaque(_) | OlapType::Member(_) | OlapType::Tuple(_) => {
            other.collect_dimensions(&mut dimensions);
        }
        _ => return None,
    }

    let joined = OlapType::Opaque(OpaqueType::new(dimensions));
    *conversions += u32::from(*other != joined) + u32::from(OlapType::Opaque(opaque.clone()) != joined);
    Some(joined)
}
