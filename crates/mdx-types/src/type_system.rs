//! MDX Type System
//!
//! This module defines the closed set of MDX expression types:
//! - Scalar types and the null type
//! - Metadata types (dimension, hierarchy, level, member) and cubes
//! - Tuples, sets and the opaque set element
//! - Structural accessors and the dimension-usage predicate

use mdx_schema::{Dimension, Hierarchy, Level};
use std::fmt;

use crate::metadata::Binding;
use crate::{
    CubeType, DimensionType, HierarchyType, LevelType, MemberType, MetadataKind, OpaqueType,
    ScalarType, SetType, TupleType, TypeResult,
};

/// The type of an MDX expression
///
/// Types are immutable values compared and hashed structurally. Composite
/// types share their element types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OlapType {
    /// The null literal; joins with any scalar
    Null,
    /// A scalar value
    Scalar(ScalarType),
    /// A dimension
    Dimension(DimensionType),
    /// A hierarchy
    Hierarchy(HierarchyType),
    /// A level
    Level(LevelType),
    /// A member
    Member(MemberType),
    /// A tuple of members or scalars
    Tuple(TupleType),
    /// A set of members, tuples or scalars
    Set(SetType),
    /// A cube
    Cube(CubeType),
    /// Set element whose member/tuple structure was lost
    Opaque(OpaqueType),
}

impl OlapType {
    pub const STRING: OlapType = OlapType::Scalar(ScalarType::String);
    pub const NUMERIC: OlapType = OlapType::Scalar(ScalarType::Numeric);
    pub const DATE_TIME: OlapType = OlapType::Scalar(ScalarType::DateTime);
    pub const BOOLEAN: OlapType = OlapType::Scalar(ScalarType::Boolean);
    pub const SYMBOL: OlapType = OlapType::Scalar(ScalarType::Symbol);
    pub const SCALAR: OlapType = OlapType::Scalar(ScalarType::Generic);

    // === Constructors ===

    /// Create a decimal type
    pub fn decimal(precision: u32, scale: u32) -> TypeResult<Self> {
        ScalarType::decimal(precision, scale).map(Self::Scalar)
    }

    /// Create a tuple type
    pub fn tuple(elements: Vec<OlapType>) -> TypeResult<Self> {
        TupleType::new(elements).map(Self::Tuple)
    }

    /// Create a set type
    pub fn set(element: OlapType) -> TypeResult<Self> {
        SetType::new(element).map(Self::Set)
    }

    // === Type Properties ===

    /// Check if this is the null type
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if values of this type are scalars (the null type excluded)
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Opaque(_))
    }

    /// Check if this is a dimension, hierarchy, level or member type
    pub fn is_metadata(&self) -> bool {
        self.metadata().is_some()
    }

    pub(crate) fn metadata(&self) -> Option<(MetadataKind, &Binding)> {
        match self {
            Self::Dimension(t) => Some((MetadataKind::Dimension, t.binding())),
            Self::Hierarchy(t) => Some((MetadataKind::Hierarchy, t.binding())),
            Self::Level(t) => Some((MetadataKind::Level, t.binding())),
            Self::Member(t) => Some((MetadataKind::Member, t.binding())),
            _ => None,
        }
    }

    /// Get the bound dimension
    ///
    /// Sets report their element's dimension; tuples and scalars have none.
    pub fn dimension(&self) -> Option<&Dimension> {
        match self {
            Self::Dimension(t) => t.dimension(),
            Self::Hierarchy(t) => t.dimension(),
            Self::Level(t) => t.dimension(),
            Self::Member(t) => t.dimension(),
            Self::Set(t) => t.element_type().dimension(),
            _ => None,
        }
    }

    /// Get the bound hierarchy
    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        match self {
            Self::Hierarchy(t) => t.hierarchy(),
            Self::Level(t) => t.hierarchy(),
            Self::Member(t) => t.hierarchy(),
            Self::Set(t) => t.element_type().hierarchy(),
            _ => None,
        }
    }

    /// Get the bound level
    pub fn level(&self) -> Option<&Level> {
        match self {
            Self::Level(t) => t.level(),
            Self::Member(t) => t.level(),
            Self::Set(t) => t.element_type().level(),
            _ => None,
        }
    }

    /// Number of positions in a value of this type
    ///
    /// Tuples have their element count, sets the arity of their element, and
    /// everything else arity 1.
    pub fn arity(&self) -> usize {
        match self {
            Self::Tuple(t) => t.arity(),
            Self::Set(t) => t.element_type().arity(),
            _ => 1,
        }
    }

    // === Dimension Usage ===

    /// Check whether this type's shape involves a dimension
    ///
    /// With `maybe` set, types whose structure was lost in a join answer
    /// `true` for any dimension they might involve; otherwise only certain
    /// usage counts. Unknown metadata types have nothing to test and answer
    /// `false`.
    pub fn uses_dimension(&self, dimension: &Dimension, maybe: bool) -> bool {
        match self {
            Self::Null | Self::Scalar(_) | Self::Cube(_) => false,
            Self::Dimension(_) | Self::Hierarchy(_) | Self::Level(_) | Self::Member(_) => {
                self.dimension() == Some(dimension)
            }
            Self::Tuple(t) => t
                .elements()
                .iter()
                .any(|e| e.uses_dimension(dimension, maybe)),
            Self::Set(t) => t.element_type().uses_dimension(dimension, maybe),
            Self::Opaque(t) => maybe && t.may_use(dimension),
        }
    }

    /// Collect every dimension this type's shape might involve
    pub(crate) fn collect_dimensions(&self, out: &mut Vec<Dimension>) {
        match self {
            Self::Null | Self::Scalar(_) | Self::Cube(_) => {}
            Self::Dimension(_) | Self::Hierarchy(_) | Self::Level(_) | Self::Member(_) => {
                out.extend(self.dimension().cloned());
            }
            Self::Tuple(t) => t.elements().iter().for_each(|e| e.collect_dimensions(out)),
            Self::Set(t) => t.element_type().collect_dimensions(out),
            Self::Opaque(t) => out.extend_from_slice(t.dimensions()),
        }
    }
}

impl fmt::Display for OlapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Scalar(t) => write!(f, "{}", t),
            Self::Dimension(t) => write!(f, "{}", t),
            Self::Hierarchy(t) => write!(f, "{}", t),
            Self::Level(t) => write!(f, "{}", t),
            Self::Member(t) => write!(f, "{}", t),
            Self::Tuple(t) => write!(f, "{}", t),
            Self::Set(t) => write!(f, "{}", t),
            Self::Cube(t) => write!(f, "{}", t),
            Self::Opaque(t) => write!(f, "{}", t),
        }
    }
}

macro_rules! impl_from_kind {
    ($($kind:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$kind> for OlapType {
                fn from(kind: $kind) -> Self {
                    Self::$variant(kind)
                }
            }
        )*
    };
}

impl_from_kind!(
    ScalarType => Scalar,
    DimensionType => Dimension,
    HierarchyType => Hierarchy,
    LevelType => Level,
    MemberType => Member,
    TupleType => Tuple,
    SetType => Set,
    CubeType => Cube,
    OpaqueType => Opaque,
);
