//! Schema construction errors

use thiserror::Error;

/// Errors raised while assembling a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// An id handed to the builder does not exist
    #[error("Unknown {kind} id {id}")]
    UnknownId { kind: &'static str, id: usize },

    /// A name is already taken in its scope
    #[error("Duplicate {kind} '{name}' in {scope}")]
    Duplicate {
        kind: &'static str,
        name: String,
        scope: String,
    },

    /// A member's parent is not on the level directly above it
    #[error("Member '{member}' cannot be a child of '{parent}'")]
    InvalidParent { member: String, parent: String },

    /// A non-root member was added without a parent
    #[error("Member '{member}' on level '{level}' needs a parent")]
    MissingParent { member: String, level: String },

    /// An all level must be the first level of its hierarchy
    #[error("Hierarchy '{hierarchy}' already has levels; the all level must come first")]
    MisplacedAllLevel { hierarchy: String },

    /// The default member belongs to another hierarchy
    #[error("Member '{member}' is not in hierarchy '{hierarchy}'")]
    ForeignDefaultMember { member: String, hierarchy: String },

    /// A dimension was declared without hierarchies
    #[error("Dimension '{dimension}' has no hierarchies")]
    EmptyDimension { dimension: String },

    /// A hierarchy was declared without levels
    #[error("Hierarchy '{hierarchy}' has no levels")]
    EmptyHierarchy { hierarchy: String },
}
