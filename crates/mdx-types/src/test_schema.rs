//! Small sales schema shared by the unit tests

use mdx_schema::{Cube, Dimension, Member, SchemaBuilder};

pub struct TestSchema {
    pub sales: Cube,
    pub gender: Dimension,
    pub store: Dimension,
    pub measures: Dimension,
    pub male: Member,
    pub female: Member,
    pub usa: Member,
    pub ca: Member,
    pub unit_sales: Member,
}

impl TestSchema {
    pub fn new() -> Self {
        let mut b = SchemaBuilder::new("Test");

        let gender = b.add_dimension("Gender").unwrap();
        let h = b.add_hierarchy(gender, "Gender").unwrap();
        let (_, all) = b.add_all_level(h, "All Gender").unwrap();
        let level = b.add_level(h, "Gender").unwrap();
        b.add_member(level, "F", Some(all)).unwrap();
        b.add_member(level, "M", Some(all)).unwrap();

        let store = b.add_dimension("Store").unwrap();
        let h = b.add_hierarchy(store, "Store").unwrap();
        let (_, all) = b.add_all_level(h, "All Stores").unwrap();
        let country = b.add_level(h, "Store Country").unwrap();
        let state = b.add_level(h, "Store State").unwrap();
        let usa = b.add_member(country, "USA", Some(all)).unwrap();
        b.add_member(state, "CA", Some(usa)).unwrap();
        b.add_member(state, "OR", Some(usa)).unwrap();

        let (measures, measures_level) = b.add_measures().unwrap();
        b.add_member(measures_level, "Unit Sales", None).unwrap();
        b.add_member(measures_level, "Store Sales", None).unwrap();

        b.add_cube("Sales", &[measures, gender, store]).unwrap();
        let schema = b.build().unwrap();

        let member = |segments: &[&str]| schema.member_by_segments(segments).unwrap();
        Self {
            sales: schema.find_cube("Sales").unwrap(),
            gender: schema.find_dimension("Gender").unwrap(),
            store: schema.find_dimension("Store").unwrap(),
            measures: schema.find_dimension("Measures").unwrap(),
            male: member(&["Gender", "M"]),
            female: member(&["Gender", "F"]),
            usa: member(&["Store", "USA"]),
            ca: member(&["Store", "USA", "CA"]),
            unit_sales: member(&["Measures", "Unit Sales"]),
        }
    }
}
