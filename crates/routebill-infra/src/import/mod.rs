//! Bulk import from CSV and spreadsheet files

pub mod records;
pub mod tabular;
pub mod templates;

pub use tabular::{read_rows, FileFormat, Row};
pub use templates::ImportTable;
