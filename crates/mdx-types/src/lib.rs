//! MDX type system
//!
//! This crate defines the static types of MDX expressions including:
//! - Scalar types (String, Numeric, Decimal, DateTime, Boolean, Symbol) and Null
//! - Metadata types bound to cube structure, each with an unknown wildcard
//! - Tuple and set types
//! - The type join with its conversion count
//! - Category conversion rules for overload resolution

pub mod coercion;
pub mod composite;
pub mod error;
pub mod join;
pub mod metadata;
pub mod scalar;
pub mod type_system;
pub mod type_util;

#[cfg(test)]
mod test_schema;

pub use coercion::{conversion_cost, Category};
pub use composite::{OpaqueType, SetType, TupleType};
pub use error::{TypeError, TypeResult};
pub use join::{common_type_of, Joined};
pub use metadata::{CubeType, DimensionType, HierarchyType, LevelType, MemberType, MetadataKind};
pub use scalar::{DecimalType, ScalarType, MAX_DECIMAL_PRECISION};
pub use type_system::OlapType;
