//! Metadata handles
//!
//! Handles are opaque references into a [`Schema`](crate::Schema). Two handles
//! are equal when they refer to the same element of the same schema. They are
//! ordered by schema identity first and declaration order second, which gives
//! a stable order for sets of handles.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::schema::{
    CubeDef, CubeId, DimensionDef, DimensionId, HierarchyDef, HierarchyId, LevelDef, LevelId,
    MemberDef, MemberId, SchemaData,
};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $id:ident, $def:ident, $table:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            schema: Arc<SchemaData>,
            id: $id,
        }

        impl $name {
            pub(crate) fn new(schema: Arc<SchemaData>, id: $id) -> Self {
                Self { schema, id }
            }

            fn def(&self) -> &$def {
                &self.schema.$table[self.id.index()]
            }

            /// Get the id of this element within its schema
            pub fn id(&self) -> $id {
                self.id
            }

            fn key(&self) -> (usize, $id) {
                (Arc::as_ptr(&self.schema) as usize, self.id)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id && Arc::ptr_eq(&self.schema, &other.schema)
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.key().hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.key().cmp(&other.key())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

handle!(
    /// Handle to a cube
    Cube, CubeId, CubeDef, cubes
);
handle!(
    /// Handle to a dimension
    Dimension, DimensionId, DimensionDef, dimensions
);
handle!(
    /// Handle to a hierarchy
    Hierarchy, HierarchyId, HierarchyDef, hierarchies
);
handle!(
    /// Handle to a level
    Level, LevelId, LevelDef, levels
);
handle!(
    /// Handle to a member
    Member, MemberId, MemberDef, members
);

impl Cube {
    /// Get the cube name
    pub fn name(&self) -> &str {
        &self.def().name
    }

    /// Get the dimensions used by this cube, in declaration order
    pub fn dimensions(&self) -> Vec<Dimension> {
        self.def()
            .dimensions
            .iter()
            .map(|&id| Dimension::new(self.schema.clone(), id))
            .collect()
    }

    /// Find one of this cube's dimensions by name
    pub fn dimension(&self, name: &str) -> Option<Dimension> {
        self.dimensions().into_iter().find(|d| d.name() == name)
    }
}

impl Dimension {
    /// Get the dimension name
    pub fn name(&self) -> &str {
        &self.def().name
    }

    /// Get the unique name, e.g. `[Gender]`
    pub fn unique_name(&self) -> &str {
        &self.def().unique_name
    }

    /// Check if this is the measures dimension
    pub fn is_measures(&self) -> bool {
        self.def().measures
    }

    /// Get all hierarchies of this dimension, in declaration order
    pub fn hierarchies(&self) -> Vec<Hierarchy> {
        self.def()
            .hierarchies
            .iter()
            .map(|&id| Hierarchy::new(self.schema.clone(), id))
            .collect()
    }

    /// Get the first (default) hierarchy
    pub fn hierarchy(&self) -> Hierarchy {
        // Building rejects dimensions without hierarchies.
        Hierarchy::new(self.schema.clone(), self.def().hierarchies[0])
    }
}

impl Hierarchy {
    /// Get the hierarchy name
    pub fn name(&self) -> &str {
        &self.def().name
    }

    /// Get the unique name, e.g. `[Gender]` or `[Time.Weekly]`
    pub fn unique_name(&self) -> &str {
        &self.def().unique_name
    }

    /// Get the owning dimension
    pub fn dimension(&self) -> Dimension {
        Dimension::new(self.schema.clone(), self.def().dimension)
    }

    /// Get the levels of this hierarchy, from the root down
    pub fn levels(&self) -> Vec<Level> {
        self.def()
            .levels
            .iter()
            .map(|&id| Level::new(self.schema.clone(), id))
            .collect()
    }

    /// Get the default member, if the hierarchy has any members
    pub fn default_member(&self) -> Option<Member> {
        self.def()
            .default_member
            .map(|id| Member::new(self.schema.clone(), id))
    }

    /// Check if this hierarchy starts with an all level
    pub fn has_all(&self) -> bool {
        self.levels().first().is_some_and(Level::is_all)
    }
}

impl Level {
    /// Get the level name
    pub fn name(&self) -> &str {
        &self.def().name
    }

    /// Get the unique name, e.g. `[Customers].[State Province]`
    pub fn unique_name(&self) -> &str {
        &self.def().unique_name
    }

    /// Get the owning hierarchy
    pub fn hierarchy(&self) -> Hierarchy {
        Hierarchy::new(self.schema.clone(), self.def().hierarchy)
    }

    /// Get the owning dimension
    pub fn dimension(&self) -> Dimension {
        self.hierarchy().dimension()
    }

    /// Get the zero-based depth of this level in its hierarchy
    pub fn depth(&self) -> usize {
        self.def().depth
    }

    /// Check if this is an all level
    pub fn is_all(&self) -> bool {
        self.def().all
    }

    /// Get the members of this level, in declaration order
    pub fn members(&self) -> Vec<Member> {
        self.def()
            .members
            .iter()
            .map(|&id| Member::new(self.schema.clone(), id))
            .collect()
    }
}

impl Member {
    /// Get the member name
    pub fn name(&self) -> &str {
        &self.def().name
    }

    /// Get the unique name, e.g. `[Store].[USA].[CA]`
    pub fn unique_name(&self) -> &str {
        &self.def().unique_name
    }

    /// Get the level this member belongs to
    pub fn level(&self) -> Level {
        Level::new(self.schema.clone(), self.def().level)
    }

    /// Get the owning hierarchy
    pub fn hierarchy(&self) -> Hierarchy {
        self.level().hierarchy()
    }

    /// Get the owning dimension
    pub fn dimension(&self) -> Dimension {
        self.hierarchy().dimension()
    }

    /// Get the parent member, if any
    pub fn parent(&self) -> Option<Member> {
        self.def()
            .parent
            .map(|id| Member::new(self.schema.clone(), id))
    }

    /// Get the children of this member
    pub fn children(&self) -> Vec<Member> {
        self.def()
            .children
            .iter()
            .map(|&id| Member::new(self.schema.clone(), id))
            .collect()
    }

    /// Check if this is the all member of its hierarchy
    pub fn is_all(&self) -> bool {
        self.level().is_all()
    }

    /// Check if this member is a measure
    pub fn is_measure(&self) -> bool {
        self.dimension().is_measures()
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.name())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unique_name())
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unique_name())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unique_name())
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unique_name())
    }
}
