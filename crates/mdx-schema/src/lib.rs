//! Cube metadata handles
//!
//! This crate provides the read-only view of cube structure that the MDX type
//! algebra binds its metadata types to:
//! - Cheap, cloneable handles for cubes, dimensions, hierarchies, levels and members
//! - Back-references from members up to their dimension
//! - A builder for assembling schemas in memory
//! - Lookup of members by unique-name segments

mod builder;
mod error;
mod handle;
mod schema;

pub use builder::*;
pub use error::*;
pub use handle::*;
pub use schema::{CubeId, DimensionId, HierarchyId, LevelId, MemberId, Schema};

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;
