//! Question domain: entities, value objects, bulk grammar, validation.

pub mod bulk_parser;
pub mod entities;
pub mod validation;
pub mod value_objects;
