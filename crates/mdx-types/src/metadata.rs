//! Metadata types
//!
//! An expression can evaluate to a piece of cube structure: a dimension, a
//! hierarchy, a level or a member. The four kinds form a specialization chain
//! (member ⊂ level ⊂ hierarchy ⊂ dimension) and each may be bound to concrete
//! metadata down to its own depth. An unbound instance is the kind's
//! `UNKNOWN` wildcard.

use mdx_schema::{Cube, Dimension, Hierarchy, Level, Member};
use std::fmt;

use crate::{OlapType, ScalarType, TypeError, TypeResult};

/// Specialization depth of a metadata kind, coarsest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataKind {
    Dimension,
    Hierarchy,
    Level,
    Member,
}

impl MetadataKind {
    const ALL: [MetadataKind; 4] = [
        MetadataKind::Dimension,
        MetadataKind::Hierarchy,
        MetadataKind::Level,
        MetadataKind::Member,
    ];

    /// Number of binding fields a kind of this depth carries
    pub const fn fields(self) -> usize {
        self as usize + 1
    }

    /// The kind whose deepest binding field has the given index
    fn of_field(index: usize) -> Option<MetadataKind> {
        Self::ALL.get(index).copied()
    }
}

/// Chain of metadata bindings, dimension first
///
/// Bound fields always form a prefix and every bound field belongs to the
/// one before it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Binding {
    dimension: Option<Dimension>,
    hierarchy: Option<Hierarchy>,
    level: Option<Level>,
    member: Option<Member>,
}

impl Binding {
    const UNBOUND: Binding = Binding {
        dimension: None,
        hierarchy: None,
        level: None,
        member: None,
    };

    /// Build a binding, deriving missing ancestors from the deepest binding
    fn resolve(
        dimension: Option<Dimension>,
        hierarchy: Option<Hierarchy>,
        level: Option<Level>,
        member: Option<Member>,
    ) -> TypeResult<Self> {
        let level = ancestor(level, member.as_ref(), Member::level)?;
        let hierarchy = ancestor(hierarchy, level.as_ref(), Level::hierarchy)?;
        let dimension = ancestor(dimension, hierarchy.as_ref(), Hierarchy::dimension)?;
        Ok(Self {
            dimension,
            hierarchy,
            level,
            member,
        })
    }

    fn of_member(member: &Member) -> Self {
        Self {
            member: Some(member.clone()),
            ..Self::of_level(&member.level())
        }
    }

    fn of_level(level: &Level) -> Self {
        Self {
            level: Some(level.clone()),
            ..Self::of_hierarchy(&level.hierarchy())
        }
    }

    fn of_hierarchy(hierarchy: &Hierarchy) -> Self {
        Self {
            hierarchy: Some(hierarchy.clone()),
            ..Self::of_dimension(&hierarchy.dimension())
        }
    }

    fn of_dimension(dimension: &Dimension) -> Self {
        Self {
            dimension: Some(dimension.clone()),
            ..Self::UNBOUND
        }
    }

    fn is_unknown(&self) -> bool {
        self.dimension.is_none()
    }

    fn bound(&self) -> [bool; 4] {
        [
            self.dimension.is_some(),
            self.hierarchy.is_some(),
            self.level.is_some(),
            self.member.is_some(),
        ]
    }

    /// Compare bindings field by field, dimension first
    ///
    /// Only fields bound on both sides are compared. The walk stops at the
    /// first field that is unbound on either side or bound to different
    /// elements.
    fn agreement(&self, other: &Binding) -> Agreement {
        let fields = [
            same(&self.dimension, &other.dimension),
            same(&self.hierarchy, &other.hierarchy),
            same(&self.level, &other.level),
            same(&self.member, &other.member),
        ];
        for (index, field) in fields.into_iter().enumerate() {
            match field {
                Some(true) => {}
                Some(false) => return Agreement { fields: index, conflict: true },
                None => return Agreement { fields: index, conflict: false },
            }
        }
        Agreement { fields: 4, conflict: false }
    }

    /// Keep the first `fields` bindings and clear the rest
    fn truncated(&self, fields: usize) -> Binding {
        Binding {
            dimension: self.dimension.clone().filter(|_| fields > 0),
            hierarchy: self.hierarchy.clone().filter(|_| fields > 1),
            level: self.level.clone().filter(|_| fields > 2),
            member: self.member.clone().filter(|_| fields > 3),
        }
    }

    fn describe(&self, kind: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(member) = &self.member {
            write!(f, "{}<member={}>", kind, member)
        } else if let Some(level) = &self.level {
            write!(f, "{}<level={}>", kind, level)
        } else if let Some(hierarchy) = &self.hierarchy {
            write!(f, "{}<hierarchy={}>", kind, hierarchy)
        } else if let Some(dimension) = &self.dimension {
            write!(f, "{}<dimension={}>", kind, dimension)
        } else {
            write!(f, "{}<>", kind)
        }
    }
}

/// Outcome of [`Binding::agreement`]
struct Agreement {
    /// Leading fields bound to the same element on both sides
    fields: usize,
    /// Whether the next field is bound on both sides to different elements
    conflict: bool,
}

/// Whether two bindings of one field match, or `None` if either is unbound
fn same<T: PartialEq>(a: &Option<T>, b: &Option<T>) -> Option<bool> {
    a.as_ref().zip(b.as_ref()).map(|(a, b)| a == b)
}

/// Fill in or check the parent of a binding
fn ancestor<P, C>(parent: Option<P>, child: Option<&C>, parent_of: fn(&C) -> P) -> TypeResult<Option<P>>
where
    P: PartialEq + fmt::Display,
    C: fmt::Display,
{
    match (parent, child) {
        (None, Some(child)) => Ok(Some(parent_of(child))),
        (Some(parent), Some(child)) if parent_of(child) != parent => {
            Err(TypeError::InconsistentBinding {
                binding: child.to_string(),
                parent: parent.to_string(),
            })
        }
        (parent, _) => Ok(parent),
    }
}

/// Join two metadata types given as (kind, binding) pairs
///
/// The result kind is the shallower of the two. An unknown operand agrees
/// with anything. Otherwise the result keeps the fields both operands bind to
/// the same elements; a field bound to different elements narrows the kind to
/// that field's kind, while a field left unbound by either operand keeps the
/// kind and clears everything below. Each binding cleared from either operand
/// counts as one conversion.
pub(crate) fn join_metadata(
    a: (MetadataKind, &Binding),
    b: (MetadataKind, &Binding),
    conversions: &mut u32,
) -> Option<OlapType> {
    let depth = a.0.min(b.0);
    let (kind, binding) = if a.1.is_unknown() {
        (depth, b.1.truncated(depth.fields()))
    } else if b.1.is_unknown() {
        (depth, a.1.truncated(depth.fields()))
    } else {
        let agreed = a.1.agreement(b.1);
        if agreed.fields == 0 {
            return None;
        }
        let kind = match MetadataKind::of_field(agreed.fields) {
            Some(field) if agreed.conflict => field.min(depth),
            _ => depth,
        };
        (kind, a.1.truncated(agreed.fields.min(kind.fields())))
    };

    let (left, right, joined) = (a.1.bound(), b.1.bound(), binding.bound());
    *conversions += (0..4)
        .filter(|&i| (left[i] || right[i]) && !joined[i])
        .count() as u32;

    Some(match kind {
        MetadataKind::Dimension => OlapType::Dimension(DimensionType(binding)),
        MetadataKind::Hierarchy => OlapType::Hierarchy(HierarchyType(binding)),
        MetadataKind::Level => OlapType::Level(LevelType(binding)),
        MetadataKind::Member => OlapType::Member(MemberType(binding)),
    })
}

/// Type of an expression that yields a dimension
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DimensionType(Binding);

impl DimensionType {
    /// Some dimension, not yet known which
    pub const UNKNOWN: DimensionType = DimensionType(Binding::UNBOUND);

    /// A specific dimension
    pub fn new(dimension: &Dimension) -> Self {
        Self(Binding::of_dimension(dimension))
    }

    pub fn dimension(&self) -> Option<&Dimension> {
        self.0.dimension.as_ref()
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_unknown()
    }

    pub(crate) fn binding(&self) -> &Binding {
        &self.0
    }
}

/// Type of an expression that yields a hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HierarchyType(Binding);

impl HierarchyType {
    /// Some hierarchy, not yet known which
    pub const UNKNOWN: HierarchyType = HierarchyType(Binding::UNBOUND);

    /// Create a hierarchy type from optional bindings
    ///
    /// A missing dimension is derived from the hierarchy; a dimension that
    /// does not own the hierarchy is rejected.
    pub fn new(dimension: Option<Dimension>, hierarchy: Option<Hierarchy>) -> TypeResult<Self> {
        Binding::resolve(dimension, hierarchy, None, None).map(Self)
    }

    /// A specific hierarchy
    pub fn of_hierarchy(hierarchy: &Hierarchy) -> Self {
        Self(Binding::of_hierarchy(hierarchy))
    }

    /// Some hierarchy of the given dimension
    pub fn of_dimension(dimension: &Dimension) -> Self {
        Self(Binding::of_dimension(dimension))
    }

    pub fn dimension(&self) -> Option<&Dimension> {
        self.0.dimension.as_ref()
    }

    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.0.hierarchy.as_ref()
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_unknown()
    }

    pub(crate) fn binding(&self) -> &Binding {
        &self.0
    }
}

/// Type of an expression that yields a level
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LevelType(Binding);

impl LevelType {
    /// Some level, not yet known which
    pub const UNKNOWN: LevelType = LevelType(Binding::UNBOUND);

    /// Create a level type from optional bindings
    pub fn new(
        dimension: Option<Dimension>,
        hierarchy: Option<Hierarchy>,
        level: Option<Level>,
    ) -> TypeResult<Self> {
        Binding::resolve(dimension, hierarchy, level, None).map(Self)
    }

    /// A specific level
    pub fn of_level(level: &Level) -> Self {
        Self(Binding::of_level(level))
    }

    /// Some level of the given hierarchy
    pub fn of_hierarchy(hierarchy: &Hierarchy) -> Self {
        Self(Binding::of_hierarchy(hierarchy))
    }

    pub fn dimension(&self) -> Option<&Dimension> {
        self.0.dimension.as_ref()
    }

    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.0.hierarchy.as_ref()
    }

    pub fn level(&self) -> Option<&Level> {
        self.0.level.as_ref()
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_unknown()
    }

    pub(crate) fn binding(&self) -> &Binding {
        &self.0
    }
}

/// Type of an expression that yields a member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberType(Binding);

impl MemberType {
    /// Some member, not yet known which
    pub const UNKNOWN: MemberType = MemberType(Binding::UNBOUND);

    /// Create a member type from optional bindings
    ///
    /// Ancestors missing from the arguments are derived from the deepest
    /// binding given; contradicting ancestors are rejected.
    pub fn new(
        dimension: Option<Dimension>,
        hierarchy: Option<Hierarchy>,
        level: Option<Level>,
        member: Option<Member>,
    ) -> TypeResult<Self> {
        Binding::resolve(dimension, hierarchy, level, member).map(Self)
    }

    /// A specific member
    pub fn of_member(member: &Member) -> Self {
        Self(Binding::of_member(member))
    }

    /// Some member of the given level
    pub fn of_level(level: &Level) -> Self {
        Self(Binding::of_level(level))
    }

    /// Some member of the given hierarchy
    pub fn of_hierarchy(hierarchy: &Hierarchy) -> Self {
        Self(Binding::of_hierarchy(hierarchy))
    }

    /// Some member of the given dimension
    pub fn of_dimension(dimension: &Dimension) -> Self {
        Self(Binding::of_dimension(dimension))
    }

    pub fn dimension(&self) -> Option<&Dimension> {
        self.0.dimension.as_ref()
    }

    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.0.hierarchy.as_ref()
    }

    pub fn level(&self) -> Option<&Level> {
        self.0.level.as_ref()
    }

    pub fn member(&self) -> Option<&Member> {
        self.0.member.as_ref()
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_unknown()
    }

    /// Member type carrying another metadata kind's bindings
    pub(crate) fn from_binding(binding: &Binding) -> Self {
        Self(binding.clone())
    }

    /// Type of the value a member of this type evaluates to
    ///
    /// Measures evaluate to numbers; any other member's value is some scalar.
    pub fn value_type(&self) -> ScalarType {
        match self.dimension() {
            Some(dimension) if dimension.is_measures() => ScalarType::Numeric,
            _ => ScalarType::Generic,
        }
    }

    pub(crate) fn binding(&self) -> &Binding {
        &self.0
    }
}

/// Type of an expression that yields a cube
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CubeType {
    cube: Cube,
}

impl CubeType {
    pub fn new(cube: &Cube) -> Self {
        Self { cube: cube.clone() }
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }
}

impl fmt::Display for DimensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.describe("DimensionType", f)
    }
}

impl fmt::Display for HierarchyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.describe("HierarchyType", f)
    }
}

impl fmt::Display for LevelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.describe("LevelType", f)
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.describe("MemberType", f)
    }
}

impl fmt::Display for CubeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CubeType<cube={}>", self.cube)
    }
}
