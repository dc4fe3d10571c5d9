//! Composite types: tuples, sets and the opaque set element

use mdx_schema::Dimension;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use crate::{OlapType, TypeError, TypeResult};

/// Type of a tuple: one element type per position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleType {
    elements: Arc<[OlapType]>,
}

impl TupleType {
    /// Create a tuple type
    ///
    /// Tuples need at least one element, and every element must be a
    /// metadata type, a scalar or null. Nested tuples, sets, cubes and opaque
    /// set elements are rejected.
    pub fn new(elements: Vec<OlapType>) -> TypeResult<Self> {
        if elements.is_empty() {
            return Err(TypeError::EmptyTuple);
        }
        if let Some(bad) = elements.iter().find(|e| {
            matches!(
                e,
                OlapType::Tuple(_) | OlapType::Set(_) | OlapType::Cube(_) | OlapType::Opaque(_)
            )
        }) {
            return Err(TypeError::InvalidElement {
                element: bad.to_string(),
                composite: "tuple",
            });
        }
        Ok(Self::from_joined(elements))
    }

    /// Wrap elements produced by joining two valid tuples
    pub(crate) fn from_joined(elements: Vec<OlapType>) -> Self {
        Self {
            elements: elements.into(),
        }
    }

    pub fn elements(&self) -> &[OlapType] {
        &self.elements
    }

    pub fn arity(&self) -> usize {
        self.elements.len()
    }
}

/// Type of a set: a collection of uniformly shaped elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetType {
    element: Arc<OlapType>,
}

impl SetType {
    /// Create a set type; sets of sets and sets of cubes are rejected
    pub fn new(element: OlapType) -> TypeResult<Self> {
        if matches!(element, OlapType::Set(_) | OlapType::Cube(_)) {
            return Err(TypeError::InvalidElement {
                element: element.to_string(),
                composite: "set",
            });
        }
        Ok(Self::from_joined(element))
    }

    pub(crate) fn from_joined(element: OlapType) -> Self {
        Self {
            element: Arc::new(element),
        }
    }

    pub fn element_type(&self) -> &OlapType {
        &self.element
    }
}

/// Scalar-shaped set element whose structure was lost in a join
///
/// Produced when a set of members is unified with a set of tuples. It carries
/// no dimension, hierarchy or level binding and has arity 1, but remembers
/// every dimension the replaced elements involved, so that it can still
/// answer "might this use dimension D?".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpaqueType {
    dimensions: SmallVec<[Dimension; 4]>,
}

impl OpaqueType {
    /// Create an opaque element that may involve the given dimensions
    pub fn new(dimensions: impl IntoIterator<Item = Dimension>) -> Self {
        let mut dimensions: SmallVec<[Dimension; 4]> = dimensions.into_iter().collect();
        dimensions.sort();
        dimensions.dedup();
        Self { dimensions }
    }

    /// Dimensions the element may involve, in schema order
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn may_use(&self, dimension: &Dimension) -> bool {
        self.dimensions.contains(dimension)
    }
}

impl fmt::Display for TupleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TupleType<")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", element)?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for SetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetType<{}>", self.element)
    }
}

impl fmt::Display for OpaqueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SCALAR<maybe")?;
        for (i, dimension) in self.dimensions.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{}", dimension)?;
        }
        f.write_str(">")
    }
}
