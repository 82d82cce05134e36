//! Infrastructure layer - store implementations and import file handling

pub mod import;
pub mod persistence;
