//! Common test utilities for MDX type tests
//!
//! This module provides shared testing infrastructure including:
//! - A FoodMart-style sales schema, built once per test binary
//! - The representative type corpus used by the algebraic checks

#![allow(dead_code)]

use mdx_schema::{Cube, Dimension, Member, Schema, SchemaBuilder};
use mdx_types::{
    CubeType, DimensionType, HierarchyType, LevelType, MemberType, OlapType, OpaqueType,
};
use once_cell::sync::Lazy;

/// Handles into the shared sales schema
pub struct FoodMart {
    pub schema: Schema,
    pub sales: Cube,
    pub customers: Dimension,
    pub gender: Dimension,
    pub store: Dimension,
    pub measures: Dimension,
    pub male: Member,
    pub female: Member,
    pub store_ca: Member,
    pub store_usa: Member,
    pub unit_sales: Member,
}

pub static FOODMART: Lazy<FoodMart> = Lazy::new(build_foodmart);

fn build_foodmart() -> FoodMart {
    let mut b = SchemaBuilder::new("FoodMart");

    let (measures, measures_level) = b.add_measures().unwrap();
    for name in ["Unit Sales", "Store Cost", "Store Sales"] {
        b.add_member(measures_level, name, None).unwrap();
    }

    let store = b.add_dimension("Store").unwrap();
    let h = b.add_hierarchy(store, "Store").unwrap();
    let (_, all) = b.add_all_level(h, "All Stores").unwrap();
    let country = b.add_level(h, "Store Country").unwrap();
    let state = b.add_level(h, "Store State").unwrap();
    let usa = b.add_member(country, "USA", Some(all)).unwrap();
    for name in ["CA", "OR", "WA"] {
        b.add_member(state, name, Some(usa)).unwrap();
    }

    let customers = b.add_dimension("Customers").unwrap();
    let h = b.add_hierarchy(customers, "Customers").unwrap();
    let (_, all) = b.add_all_level(h, "All Customers").unwrap();
    let country = b.add_level(h, "Country").unwrap();
    let state = b.add_level(h, "State Province").unwrap();
    let usa = b.add_member(country, "USA", Some(all)).unwrap();
    b.add_member(state, "CA", Some(usa)).unwrap();
    let mexico = b.add_member(country, "Mexico", Some(all)).unwrap();
    b.add_member(state, "Jalisco", Some(mexico)).unwrap();

    let gender = b.add_dimension("Gender").unwrap();
    let h = b.add_hierarchy(gender, "Gender").unwrap();
    let (_, all) = b.add_all_level(h, "All Gender").unwrap();
    let level = b.add_level(h, "Gender").unwrap();
    b.add_member(level, "F", Some(all)).unwrap();
    b.add_member(level, "M", Some(all)).unwrap();

    b.add_cube("Sales", &[measures, store, customers, gender])
        .unwrap();
    let schema = b.build().unwrap();

    let member = |segments: &[&str]| schema.member_by_segments(segments).unwrap();
    FoodMart {
        sales: schema.find_cube("Sales").unwrap(),
        customers: schema.find_dimension("Customers").unwrap(),
        gender: schema.find_dimension("Gender").unwrap(),
        store: schema.find_dimension("Store").unwrap(),
        measures: schema.find_dimension("Measures").unwrap(),
        male: member(&["Gender", "M"]),
        female: member(&["Gender", "F"]),
        store_ca: member(&["Store", "All Stores", "USA", "CA"]),
        store_usa: member(&["Store", "USA"]),
        unit_sales: member(&["Measures", "Unit Sales"]),
        schema,
    }
}

/// Member type bound to a member and all its ancestors
pub fn member(member: &Member) -> OlapType {
    MemberType::of_member(member).into()
}

pub fn tuple(elements: Vec<OlapType>) -> OlapType {
    OlapType::tuple(elements).unwrap()
}

pub fn set(element: OlapType) -> OlapType {
    OlapType::set(element).unwrap()
}

pub fn decimal(precision: u32, scale: u32) -> OlapType {
    OlapType::decimal(precision, scale).unwrap()
}

/// Representative types, all metadata bound to the Customers dimension
///
/// Every kind appears at least once, including each unknown wildcard, so the
/// corpus exercises every pair of categories.
pub fn corpus() -> Vec<OlapType> {
    let fm = &*FOODMART;
    let hierarchy = fm.customers.hierarchy();
    let default = hierarchy.default_member().unwrap();
    let level = default.level();

    let member_type = member(&default);
    let tuple_type = tuple(vec![member_type.clone(), MemberType::UNKNOWN.into()]);

    vec![
        member_type.clone(),
        LevelType::of_level(&level).into(),
        HierarchyType::of_hierarchy(&hierarchy).into(),
        DimensionType::new(&fm.customers).into(),
        OlapType::NUMERIC,
        OlapType::DATE_TIME,
        decimal(10, 2),
        decimal(7, 0),
        OlapType::SCALAR,
        OlapType::Null,
        OlapType::STRING,
        OlapType::BOOLEAN,
        OlapType::SYMBOL,
        tuple_type.clone(),
        set(tuple_type),
        set(member_type),
        DimensionType::UNKNOWN.into(),
        HierarchyType::UNKNOWN.into(),
        LevelType::UNKNOWN.into(),
        MemberType::UNKNOWN.into(),
        OpaqueType::new([fm.customers.clone()]).into(),
        CubeType::new(&fm.sales).into(),
    ]
}
