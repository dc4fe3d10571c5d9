//! In-memory schema builder

use indexmap::IndexMap;

use crate::schema::{
    CubeDef, CubeId, DimensionDef, DimensionId, HierarchyDef, HierarchyId, LevelDef, LevelId,
    MemberDef, MemberId, SchemaData,
};
use crate::{Result, Schema, SchemaError};

/// Name of the level that holds a hierarchy's all member
pub const ALL_LEVEL_NAME: &str = "(All)";

/// Name of the measures dimension and its hierarchy
pub const MEASURES_NAME: &str = "Measures";

/// Name of the single level of the measures hierarchy
pub const MEASURES_LEVEL_NAME: &str = "MeasuresLevel";

/// Assembles a [`Schema`] element by element
///
/// Elements are added top-down: dimensions, then hierarchies, levels and
/// members. Every `add_*` method validates its arguments immediately and
/// returns the id of the new element.
///
/// ```
/// use mdx_schema::SchemaBuilder;
///
/// let mut builder = SchemaBuilder::new("FoodMart");
/// let gender = builder.add_dimension("Gender")?;
/// let hierarchy = builder.add_hierarchy(gender, "Gender")?;
/// let (_, all) = builder.add_all_level(hierarchy, "All Gender")?;
/// let level = builder.add_level(hierarchy, "Gender")?;
/// builder.add_member(level, "M", Some(all))?;
/// builder.add_cube("Sales", &[gender])?;
///
/// let schema = builder.build()?;
/// let male = schema.member_by_segments(&["Gender", "M"]).unwrap();
/// assert_eq!(male.unique_name(), "[Gender].[M]");
/// # Ok::<(), mdx_schema::SchemaError>(())
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    data: SchemaData,
}

impl SchemaBuilder {
    /// Create an empty builder for a schema with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: SchemaData {
                name: name.into(),
                cubes: Vec::new(),
                dimensions: Vec::new(),
                hierarchies: Vec::new(),
                levels: Vec::new(),
                members: Vec::new(),
                members_by_unique_name: IndexMap::new(),
            },
        }
    }

    /// Add a regular dimension
    pub fn add_dimension(&mut self, name: impl Into<String>) -> Result<DimensionId> {
        self.push_dimension(name.into(), false)
    }

    /// Add the measures dimension with its single hierarchy and level
    ///
    /// Returns the dimension and its level; measures are added to the level
    /// with [`add_member`](Self::add_member) and no parent.
    pub fn add_measures(&mut self) -> Result<(DimensionId, LevelId)> {
        let dimension = self.push_dimension(MEASURES_NAME.to_string(), true)?;
        let hierarchy = self.add_hierarchy(dimension, MEASURES_NAME)?;
        let level = self.push_level(hierarchy, MEASURES_LEVEL_NAME.to_string(), false)?;
        Ok((dimension, level))
    }

    /// Add a hierarchy to a dimension
    ///
    /// A hierarchy named like its dimension gets the dimension's unique name;
    /// any other hierarchy is named `[Dimension.Hierarchy]`.
    pub fn add_hierarchy(
        &mut self,
        dimension: DimensionId,
        name: impl Into<String>,
    ) -> Result<HierarchyId> {
        let name = name.into();
        let dim = self.dimension_def(dimension)?;
        if dim
            .hierarchies
            .iter()
            .any(|h| self.data.hierarchies[h.index()].name == name)
        {
            return Err(SchemaError::Duplicate {
                kind: "hierarchy",
                name,
                scope: dim.unique_name.clone(),
            });
        }

        let unique_name = if name == dim.name {
            dim.unique_name.clone()
        } else {
            format!("[{}.{}]", dim.name, name)
        };
        let id = HierarchyId::from_index(self.data.hierarchies.len());
        self.data.hierarchies.push(HierarchyDef {
            name,
            unique_name,
            dimension,
            levels: Vec::new(),
            default_member: None,
        });
        self.data.dimensions[dimension.index()].hierarchies.push(id);
        Ok(id)
    }

    /// Add the all level and its single all member to an empty hierarchy
    pub fn add_all_level(
        &mut self,
        hierarchy: HierarchyId,
        all_member: impl Into<String>,
    ) -> Result<(LevelId, MemberId)> {
        let hier = self.hierarchy_def(hierarchy)?;
        if !hier.levels.is_empty() {
            return Err(SchemaError::MisplacedAllLevel {
                hierarchy: hier.unique_name.clone(),
            });
        }

        let level = self.push_level(hierarchy, ALL_LEVEL_NAME.to_string(), true)?;
        let member = self.push_member(level, all_member.into(), None)?;
        Ok((level, member))
    }

    /// Add a level below the existing levels of a hierarchy
    pub fn add_level(&mut self, hierarchy: HierarchyId, name: impl Into<String>) -> Result<LevelId> {
        self.push_level(hierarchy, name.into(), false)
    }

    /// Add a member to a level
    ///
    /// Members of the first level of a hierarchy have no parent. Members of
    /// deeper levels need a parent on the level directly above.
    pub fn add_member(
        &mut self,
        level: LevelId,
        name: impl Into<String>,
        parent: Option<MemberId>,
    ) -> Result<MemberId> {
        let name = name.into();
        let lvl = self.level_def(level)?;
        if lvl.all {
            return Err(SchemaError::Duplicate {
                kind: "all member",
                name,
                scope: lvl.unique_name.clone(),
            });
        }
        self.push_member(level, name, parent)
    }

    /// Override the default member of a hierarchy
    pub fn set_default_member(&mut self, hierarchy: HierarchyId, member: MemberId) -> Result<()> {
        self.hierarchy_def(hierarchy)?;
        let mem = self.member_def(member)?;
        if self.data.levels[mem.level.index()].hierarchy != hierarchy {
            return Err(SchemaError::ForeignDefaultMember {
                member: mem.unique_name.clone(),
                hierarchy: self.data.hierarchies[hierarchy.index()].unique_name.clone(),
            });
        }
        self.data.hierarchies[hierarchy.index()].default_member = Some(member);
        Ok(())
    }

    /// Add a cube over the given dimensions
    pub fn add_cube(&mut self, name: impl Into<String>, dimensions: &[DimensionId]) -> Result<CubeId> {
        let name = name.into();
        if self.data.cubes.iter().any(|c| c.name == name) {
            return Err(SchemaError::Duplicate {
                kind: "cube",
                name,
                scope: self.data.name.clone(),
            });
        }
        for &dimension in dimensions {
            self.dimension_def(dimension)?;
        }

        let id = CubeId::from_index(self.data.cubes.len());
        self.data.cubes.push(CubeDef {
            name,
            dimensions: dimensions.to_vec(),
        });
        Ok(id)
    }

    /// Finish the schema
    ///
    /// Hierarchies without an explicit default member default to the first
    /// member of their first level.
    pub fn build(mut self) -> Result<Schema> {
        if let Some(dim) = self.data.dimensions.iter().find(|d| d.hierarchies.is_empty()) {
            return Err(SchemaError::EmptyDimension {
                dimension: dim.unique_name.clone(),
            });
        }
        if let Some(hier) = self.data.hierarchies.iter().find(|h| h.levels.is_empty()) {
            return Err(SchemaError::EmptyHierarchy {
                hierarchy: hier.unique_name.clone(),
            });
        }

        for hierarchy in &mut self.data.hierarchies {
            if hierarchy.default_member.is_none() {
                hierarchy.default_member = self.data.levels[hierarchy.levels[0].index()]
                    .members
                    .first()
                    .copied();
            }
        }

        log::debug!(
            "built schema '{}': {} cubes, {} dimensions, {} hierarchies, {} levels, {} members",
            self.data.name,
            self.data.cubes.len(),
            self.data.dimensions.len(),
            self.data.hierarchies.len(),
            self.data.levels.len(),
            self.data.members.len()
        );
        Ok(Schema::new(self.data))
    }

    fn push_dimension(&mut self, name: String, measures: bool) -> Result<DimensionId> {
        if self.data.dimensions.iter().any(|d| d.name == name) {
            return Err(SchemaError::Duplicate {
                kind: "dimension",
                name,
                scope: self.data.name.clone(),
            });
        }

        let id = DimensionId::from_index(self.data.dimensions.len());
        self.data.dimensions.push(DimensionDef {
            unique_name: format!("[{}]", name),
            name,
            hierarchies: Vec::new(),
            measures,
        });
        Ok(id)
    }

    fn push_level(&mut self, hierarchy: HierarchyId, name: String, all: bool) -> Result<LevelId> {
        let hier = self.hierarchy_def(hierarchy)?;
        if hier
            .levels
            .iter()
            .any(|l| self.data.levels[l.index()].name == name)
        {
            return Err(SchemaError::Duplicate {
                kind: "level",
                name,
                scope: hier.unique_name.clone(),
            });
        }

        let id = LevelId::from_index(self.data.levels.len());
        let depth = hier.levels.len();
        let unique_name = format!("{}.[{}]", hier.unique_name, name);
        self.data.levels.push(LevelDef {
            unique_name,
            name,
            hierarchy,
            depth,
            all,
            members: Vec::new(),
        });
        self.data.hierarchies[hierarchy.index()].levels.push(id);
        Ok(id)
    }

    fn push_member(
        &mut self,
        level: LevelId,
        name: String,
        parent: Option<MemberId>,
    ) -> Result<MemberId> {
        let lvl = self.level_def(level)?;
        let hier = &self.data.hierarchies[lvl.hierarchy.index()];

        let prefix = match parent {
            None if lvl.depth == 0 => hier.unique_name.clone(),
            None => {
                return Err(SchemaError::MissingParent {
                    member: name,
                    level: lvl.unique_name.clone(),
                });
            }
            Some(parent) => {
                let parent_def = self.member_def(parent)?;
                let parent_level = &self.data.levels[parent_def.level.index()];
                if parent_level.hierarchy != lvl.hierarchy || parent_level.depth + 1 != lvl.depth {
                    return Err(SchemaError::InvalidParent {
                        member: name,
                        parent: parent_def.unique_name.clone(),
                    });
                }
                // Children of the all member are named from the hierarchy.
                if parent_level.all {
                    hier.unique_name.clone()
                } else {
                    parent_def.unique_name.clone()
                }
            }
        };

        let unique_name = format!("{}.[{}]", prefix, name);
        if self.data.members_by_unique_name.contains_key(&unique_name) {
            return Err(SchemaError::Duplicate {
                kind: "member",
                name,
                scope: lvl.unique_name.clone(),
            });
        }

        let id = MemberId::from_index(self.data.members.len());
        self.data
            .members_by_unique_name
            .insert(unique_name.clone(), id);
        self.data.members.push(MemberDef {
            name,
            unique_name,
            level,
            parent,
            children: Vec::new(),
        });
        self.data.levels[level.index()].members.push(id);
        if let Some(parent) = parent {
            self.data.members[parent.index()].children.push(id);
        }
        Ok(id)
    }

    fn dimension_def(&self, id: DimensionId) -> Result<&DimensionDef> {
        self.data
            .dimensions
            .get(id.index())
            .ok_or(SchemaError::UnknownId {
                kind: "dimension",
                id: id.index(),
            })
    }

    fn hierarchy_def(&self, id: HierarchyId) -> Result<&HierarchyDef> {
        self.data
            .hierarchies
            .get(id.index())
            .ok_or(SchemaError::UnknownId {
                kind: "hierarchy",
                id: id.index(),
            })
    }

    fn level_def(&self, id: LevelId) -> Result<&LevelDef> {
        self.data.levels.get(id.index()).ok_or(SchemaError::UnknownId {
            kind: "level",
            id: id.index(),
        })
    }

    fn member_def(&self, id: MemberId) -> Result<&MemberDef> {
        self.data.members.get(id.index()).ok_or(SchemaError::UnknownId {
            kind: "member",
            id: id.index(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_schema() -> Schema {
        let mut builder = SchemaBuilder::new("FoodMart");
        let store = builder.add_dimension("Store").unwrap();
        let hierarchy = builder.add_hierarchy(store, "Store").unwrap();
        let (_, all) = builder.add_all_level(hierarchy, "All Stores").unwrap();
        let country = builder.add_level(hierarchy, "Store Country").unwrap();
        let state = builder.add_level(hierarchy, "Store State").unwrap();
        let usa = builder.add_member(country, "USA", Some(all)).unwrap();
        builder.add_member(state, "CA", Some(usa)).unwrap();
        builder.add_member(state, "OR", Some(usa)).unwrap();
        builder.add_cube("Sales", &[store]).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_unique_names() {
        let schema = store_schema();
        let ca = schema.member_by_segments(&["Store", "USA", "CA"]).unwrap();

        assert_eq!(ca.unique_name(), "[Store].[USA].[CA]");
        assert_eq!(ca.level().unique_name(), "[Store].[Store State]");
        assert_eq!(ca.hierarchy().unique_name(), "[Store]");
        assert_eq!(ca.dimension().unique_name(), "[Store]");
        assert_eq!(ca.parent().unwrap().unique_name(), "[Store].[USA]");
    }

    #[test]
    fn test_default_member_is_all_member() {
        let schema = store_schema();
        let hierarchy = schema.find_dimension("Store").unwrap().hierarchy();
        let default = hierarchy.default_member().unwrap();

        assert!(default.is_all());
        assert_eq!(default.name(), "All Stores");
        assert!(hierarchy.has_all());
    }

    #[test]
    fn test_missing_parent_rejected() {
        let mut builder = SchemaBuilder::new("Test");
        let dim = builder.add_dimension("Product").unwrap();
        let hierarchy = builder.add_hierarchy(dim, "Product").unwrap();
        builder.add_level(hierarchy, "Family").unwrap();
        let department = builder.add_level(hierarchy, "Department").unwrap();

        let err = builder.add_member(department, "Beverages", None).unwrap_err();
        assert!(matches!(err, SchemaError::MissingParent { .. }));
    }

    #[test]
    fn test_parent_must_be_one_level_up() {
        let mut builder = SchemaBuilder::new("Test");
        let dim = builder.add_dimension("Product").unwrap();
        let hierarchy = builder.add_hierarchy(dim, "Product").unwrap();
        let family = builder.add_level(hierarchy, "Family").unwrap();
        builder.add_level(hierarchy, "Department").unwrap();
        let category = builder.add_level(hierarchy, "Category").unwrap();
        let drink = builder.add_member(family, "Drink", None).unwrap();

        let err = builder.add_member(category, "Beer", Some(drink)).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidParent { .. }));
    }

    #[test]
    fn test_all_level_must_come_first() {
        let mut builder = SchemaBuilder::new("Test");
        let dim = builder.add_dimension("Time").unwrap();
        let hierarchy = builder.add_hierarchy(dim, "Time").unwrap();
        builder.add_level(hierarchy, "Year").unwrap();

        let err = builder.add_all_level(hierarchy, "All Time").unwrap_err();
        assert!(matches!(err, SchemaError::MisplacedAllLevel { .. }));
    }

    #[test]
    fn test_empty_hierarchy_rejected_on_build() {
        let mut builder = SchemaBuilder::new("Test");
        let dim = builder.add_dimension("Time").unwrap();
        builder.add_hierarchy(dim, "Time").unwrap();

        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            SchemaError::EmptyHierarchy {
                hierarchy: "[Time]".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_dimension_rejected() {
        let mut builder = SchemaBuilder::new("Test");
        builder.add_dimension("Time").unwrap();

        let err = builder.add_dimension("Time").unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate { kind: "dimension", .. }));
    }

    #[test]
    fn test_named_hierarchy_unique_name() {
        let mut builder = SchemaBuilder::new("Test");
        let dim = builder.add_dimension("Time").unwrap();
        let weekly = builder.add_hierarchy(dim, "Weekly").unwrap();
        builder.add_level(weekly, "Year").unwrap();
        let schema = builder.build().unwrap();

        let hierarchy = schema.hierarchy(weekly).unwrap();
        assert_eq!(hierarchy.unique_name(), "[Time.Weekly]");
        assert_eq!(hierarchy.levels()[0].unique_name(), "[Time.Weekly].[Year]");
        assert!(hierarchy.default_member().is_none());
    }

    #[test]
    fn test_foreign_default_member_rejected() {
        let mut builder = SchemaBuilder::new("Test");
        let time = builder.add_dimension("Time").unwrap();
        let time_h = builder.add_hierarchy(time, "Time").unwrap();
        let year = builder.add_level(time_h, "Year").unwrap();
        builder.add_member(year, "1997", None).unwrap();
        let store = builder.add_dimension("Store").unwrap();
        let store_h = builder.add_hierarchy(store, "Store").unwrap();
        let country = builder.add_level(store_h, "Country").unwrap();
        let usa = builder.add_member(country, "USA", None).unwrap();

        let err = builder.set_default_member(time_h, usa).unwrap_err();
        assert!(matches!(err, SchemaError::ForeignDefaultMember { .. }));
    }

    #[test]
    fn test_measures_dimension() {
        let mut builder = SchemaBuilder::new("Test");
        let (measures, level) = builder.add_measures().unwrap();
        builder.add_member(level, "Unit Sales", None).unwrap();
        builder.add_cube("Sales", &[measures]).unwrap();
        let schema = builder.build().unwrap();

        let unit_sales = schema.member_by_unique_name("[Measures].[Unit Sales]").unwrap();
        assert!(unit_sales.is_measure());
        assert!(unit_sales.dimension().is_measures());
        assert_eq!(unit_sales.level().name(), MEASURES_LEVEL_NAME);
        assert_eq!(schema.dimension(measures), Some(unit_sales.dimension()));
    }
}
