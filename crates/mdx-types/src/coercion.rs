//! MDX Type Coercion Rules
//!
//! This module implements the implicit conversions between type categories
//! used when matching arguments against function signatures. It provides:
//! - The category of each type
//! - The category conversion matrix with costs
//! - Type-aware conversion checks
//!
//! Overload resolution prefers the candidate whose arguments need the lowest
//! total cost.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::OlapType;

/// Coarse classification of types used by the conversion matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Member,
    Level,
    Hierarchy,
    Dimension,
    Tuple,
    Set,
    Numeric,
    String,
    DateTime,
    Logical,
    /// Any scalar value
    Value,
    Null,
    Symbol,
    Cube,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 14] = [
        Category::Member,
        Category::Level,
        Category::Hierarchy,
        Category::Dimension,
        Category::Tuple,
        Category::Set,
        Category::Numeric,
        Category::String,
        Category::DateTime,
        Category::Logical,
        Category::Value,
        Category::Null,
        Category::Symbol,
        Category::Cube,
    ];

    /// Check whether a value of this category converts implicitly to `to`
    ///
    /// Returns the cost of the conversion, or `None` when it is not
    /// permitted. The rules are:
    /// - Any category converts to itself for free
    /// - Null converts to the scalar categories for free and to Member or
    ///   Tuple at cost 1
    /// - Scalars widen to Value, and Value narrows back, at cost 1
    /// - Numeric and Logical interconvert at cost 2
    /// - Members, and tuples, evaluate to their value at cost 1
    /// - Metadata converts along its specialization chain at cost 1
    pub fn can_convert(self, to: Category) -> Option<u32> {
        use Category::{
            DateTime, Dimension, Hierarchy, Level, Logical, Member, Null, Numeric, Set, String,
            Symbol, Tuple, Value,
        };

        if self == to {
            return Some(0);
        }
        match (self, to) {
            (Null, Numeric | String | DateTime | Logical | Value | Symbol) => Some(0),
            (Null, Member | Tuple) => Some(1),

            (Numeric | String | DateTime | Logical | Symbol, Value) => Some(1),
            (Value, Numeric | String | DateTime | Logical) => Some(1),
            (Numeric, Logical) | (Logical, Numeric) => Some(2),

            // Member and tuple expressions evaluate against the current context
            (Member | Tuple, Numeric | String | DateTime | Logical | Value) => Some(1),
            (Member, Level | Hierarchy | Dimension | Tuple | Set) => Some(1),
            (Level, Hierarchy | Dimension) => Some(1),
            (Hierarchy, Dimension | Member) | (Dimension, Hierarchy | Member) => Some(1),
            (Hierarchy | Dimension, Tuple) => Some(2),

            (Tuple, Set) => Some(1),
            (Tuple, Member) => Some(2),

            _ => None,
        }
    }

    /// Get the category name as used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Category::Member => "Member",
            Category::Level => "Level",
            Category::Hierarchy => "Hierarchy",
            Category::Dimension => "Dimension",
            Category::Tuple => "Tuple",
            Category::Set => "Set",
            Category::Numeric => "Numeric",
            Category::String => "String",
            Category::DateTime => "DateTime",
            Category::Logical => "Logical",
            Category::Value => "Value",
            Category::Null => "Null",
            Category::Symbol => "Symbol",
            Category::Cube => "Cube",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl OlapType {
    /// Get the conversion category of this type
    pub fn category(&self) -> Category {
        use crate::ScalarType;

        match self {
            OlapType::Null => Category::Null,
            OlapType::Scalar(scalar) => match scalar {
                ScalarType::String => Category::String,
                ScalarType::Numeric | ScalarType::Decimal(_) => Category::Numeric,
                ScalarType::DateTime => Category::DateTime,
                ScalarType::Boolean => Category::Logical,
                ScalarType::Symbol => Category::Symbol,
                ScalarType::Generic => Category::Value,
            },
            OlapType::Opaque(_) => Category::Value,
            OlapType::Dimension(_) => Category::Dimension,
            OlapType::Hierarchy(_) => Category::Hierarchy,
            OlapType::Level(_) => Category::Level,
            OlapType::Member(_) => Category::Member,
            OlapType::Tuple(_) => Category::Tuple,
            OlapType::Set(_) => Category::Set,
            OlapType::Cube(_) => Category::Cube,
        }
    }
}

/// Cost of converting a value of type `from` to category `to`
///
/// Applies [`Category::can_convert`] to the category of `from`, except that
/// only a 1-tuple can stand in for a member.
pub fn conversion_cost(from: &OlapType, to: Category) -> Option<u32> {
    match from {
        OlapType::Tuple(tuple) if to == Category::Member && tuple.arity() > 1 => None,
        _ => from.category().can_convert(to),
    }
}
