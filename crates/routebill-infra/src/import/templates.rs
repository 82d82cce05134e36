//! Import targets and their template headers

use std::path::{Path, PathBuf};

use routebill_types::Result;

/// A table that can be bulk imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportTable {
    Routes,
    Vendors,
    Items,
    Bills,
    BillItems,
}

impl ImportTable {
    /// Import order; later tables resolve names created by earlier ones
    pub const ALL: [ImportTable; 5] = [
        ImportTable::Routes,
        ImportTable::Vendors,
        ImportTable::Items,
        ImportTable::Bills,
        ImportTable::BillItems,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            ImportTable::Routes => "routes",
            ImportTable::Vendors => "vendors",
            ImportTable::Items => "items",
            ImportTable::Bills => "bills",
            ImportTable::BillItems => "bill_items",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImportTable::Routes => "Routes",
            ImportTable::Vendors => "Vendors",
            ImportTable::Items => "Items",
            ImportTable::Bills => "Bills",
            ImportTable::BillItems => "Bill Items",
        }
    }

    /// Column headers of the downloadable template
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            ImportTable::Routes => &["name"],
            ImportTable::Vendors => &["name", "route_name", "contact", "address"],
            ImportTable::Items => &[
                "name_en",
                "name_gu",
                "rate",
                "has_gst",
                "gst_percentage",
                "category",
            ],
            ImportTable::Bills => &["vendor_name", "date"],
            ImportTable::BillItems => &["bill_id", "item_name_en", "quantity"],
        }
    }

    pub fn template_file_name(&self) -> String {
        format!("{}_template.csv", self.table_name())
    }

    /// Write `<table>_template.csv` into `dir`, returning its path
    pub fn write_template(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.template_file_name());
        let mut writer = csv::Writer::from_path(&path).map_err(std::io::Error::from)?;
        writer
            .write_record(self.headers())
            .map_err(std::io::Error::from)?;
        writer.flush()?;
        Ok(path)
    }
}

impl std::fmt::Display for ImportTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::read_rows;
    use tempfile::tempdir;

    #[test]
    fn test_write_template_header_line() {
        let dir = tempdir().unwrap();
        let path = ImportTable::Vendors.write_template(dir.path()).unwrap();
        assert!(path.ends_with("vendors_template.csv"));
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "name,route_name,contact,address\n");
    }

    #[test]
    fn test_every_template_reads_back_with_no_rows() {
        let dir = tempdir().unwrap();
        for table in ImportTable::ALL {
            let path = table.write_template(dir.path()).unwrap();
            assert!(read_rows(&path).unwrap().is_empty(), "{}", table);
            let mut reader = csv::Reader::from_path(&path).unwrap();
            let headers: Vec<_> = reader.headers().unwrap().iter().map(str::to_string).collect();
            assert_eq!(headers, table.headers());
        }
    }

    #[test]
    fn test_import_order_starts_with_routes() {
        assert_eq!(ImportTable::ALL[0], ImportTable::Routes);
        assert_eq!(ImportTable::ALL[4].table_name(), "bill_items");
    }
}
