//! Schema storage and lookup
//!
//! All metadata of a schema lives in one shared arena. Handles point into it by
//! id, so they stay cheap to clone and never form reference cycles.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::{Cube, Dimension, Hierarchy, Level, Member};

macro_rules! define_ids {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(u32);

            impl $name {
                pub(crate) fn from_index(index: usize) -> Self {
                    Self(index as u32)
                }

                pub(crate) fn index(self) -> usize {
                    self.0 as usize
                }
            }
        )*
    };
}

define_ids!(
    /// Id of a cube within its schema
    CubeId,
    /// Id of a dimension within its schema
    DimensionId,
    /// Id of a hierarchy within its schema
    HierarchyId,
    /// Id of a level within its schema
    LevelId,
    /// Id of a member within its schema
    MemberId,
);

#[derive(Debug)]
pub struct CubeDef {
    pub name: String,
    pub dimensions: Vec<DimensionId>,
}

#[derive(Debug)]
pub struct DimensionDef {
    pub name: String,
    pub unique_name: String,
    pub hierarchies: Vec<HierarchyId>,
    pub measures: bool,
}

#[derive(Debug)]
pub struct HierarchyDef {
    pub name: String,
    pub unique_name: String,
    pub dimension: DimensionId,
    pub levels: Vec<LevelId>,
    pub default_member: Option<MemberId>,
}

#[derive(Debug)]
pub struct LevelDef {
    pub name: String,
    pub unique_name: String,
    pub hierarchy: HierarchyId,
    pub depth: usize,
    pub all: bool,
    pub members: Vec<MemberId>,
}

#[derive(Debug)]
pub struct MemberDef {
    pub name: String,
    pub unique_name: String,
    pub level: LevelId,
    pub parent: Option<MemberId>,
    pub children: Vec<MemberId>,
}

#[derive(Debug)]
pub struct SchemaData {
    pub name: String,
    pub cubes: Vec<CubeDef>,
    pub dimensions: Vec<DimensionDef>,
    pub hierarchies: Vec<HierarchyDef>,
    pub levels: Vec<LevelDef>,
    pub members: Vec<MemberDef>,
    pub members_by_unique_name: IndexMap<String, MemberId>,
}

/// An immutable, shareable schema
///
/// Cloning a schema is cheap; all clones and all handles obtained from them
/// share the same storage.
#[derive(Clone)]
pub struct Schema {
    data: Arc<SchemaData>,
}

impl Schema {
    pub(crate) fn new(data: SchemaData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    /// Get the schema name
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Iterate over all cubes in declaration order
    pub fn cubes(&self) -> impl Iterator<Item = Cube> + '_ {
        (0..self.data.cubes.len()).map(|i| Cube::new(self.data.clone(), CubeId::from_index(i)))
    }

    /// Iterate over all dimensions in declaration order
    pub fn dimensions(&self) -> impl Iterator<Item = Dimension> + '_ {
        (0..self.data.dimensions.len())
            .map(|i| Dimension::new(self.data.clone(), DimensionId::from_index(i)))
    }

    /// Find a cube by name
    pub fn find_cube(&self, name: &str) -> Option<Cube> {
        self.cubes().find(|c| c.name() == name)
    }

    /// Find a dimension by name
    pub fn find_dimension(&self, name: &str) -> Option<Dimension> {
        self.dimensions().find(|d| d.name() == name)
    }

    /// Find a hierarchy by its own name or by the name of its dimension
    ///
    /// A dimension name resolves to the dimension's first hierarchy.
    pub fn find_hierarchy(&self, name: &str) -> Option<Hierarchy> {
        if let Some(dimension) = self.find_dimension(name) {
            return Some(dimension.hierarchy());
        }
        self.data
            .hierarchies
            .iter()
            .position(|h| h.name == name)
            .map(|i| Hierarchy::new(self.data.clone(), HierarchyId::from_index(i)))
    }

    /// Get the cube with the given id
    pub fn cube(&self, id: CubeId) -> Option<Cube> {
        (id.index() < self.data.cubes.len()).then(|| Cube::new(self.data.clone(), id))
    }

    /// Get the dimension with the given id
    pub fn dimension(&self, id: DimensionId) -> Option<Dimension> {
        (id.index() < self.data.dimensions.len()).then(|| Dimension::new(self.data.clone(), id))
    }

    /// Get the hierarchy with the given id
    pub fn hierarchy(&self, id: HierarchyId) -> Option<Hierarchy> {
        (id.index() < self.data.hierarchies.len()).then(|| Hierarchy::new(self.data.clone(), id))
    }

    /// Get the level with the given id
    pub fn level(&self, id: LevelId) -> Option<Level> {
        (id.index() < self.data.levels.len()).then(|| Level::new(self.data.clone(), id))
    }

    /// Get the member with the given id
    pub fn member(&self, id: MemberId) -> Option<Member> {
        (id.index() < self.data.members.len()).then(|| Member::new(self.data.clone(), id))
    }

    /// Look up a member by its full unique name, e.g. `[Gender].[M]`
    pub fn member_by_unique_name(&self, unique_name: &str) -> Option<Member> {
        self.data
            .members_by_unique_name
            .get(unique_name)
            .map(|&id| Member::new(self.data.clone(), id))
    }

    /// Look up a member by name segments
    ///
    /// The first segment names a hierarchy (or a dimension, meaning its first
    /// hierarchy); the rest walk down the member tree. An all member may be
    /// skipped, so `["Gender", "M"]` and `["Gender", "All Gender", "M"]` find
    /// the same member.
    pub fn member_by_segments<S: AsRef<str>>(&self, segments: &[S]) -> Option<Member> {
        let (first, rest) = segments.split_first()?;
        let hierarchy = self.find_hierarchy(first.as_ref())?;
        let data = &self.data;
        let mut candidates: &[MemberId] = match data.hierarchies[hierarchy.id().index()]
            .levels
            .first()
        {
            Some(root) => &data.levels[root.index()].members,
            None => return None,
        };
        let mut found = None;

        for segment in rest {
            let name = segment.as_ref();
            let next = candidates
                .iter()
                .copied()
                .find(|m| data.members[m.index()].name == name)
                .or_else(|| {
                    candidates
                        .iter()
                        .filter(|m| data.levels[data.members[m.index()].level.index()].all)
                        .flat_map(|m| data.members[m.index()].children.iter().copied())
                        .find(|m| data.members[m.index()].name == name)
                })?;
            candidates = &data.members[next.index()].children;
            found = Some(next);
        }

        found.map(|id| Member::new(self.data.clone(), id))
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Schema {}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.data.name)
            .field("cubes", &self.data.cubes.len())
            .field("dimensions", &self.data.dimensions.len())
            .field("members", &self.data.members.len())
            .finish()
    }
}
