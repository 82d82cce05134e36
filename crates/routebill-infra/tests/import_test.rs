//! Integration tests for reading import files

use std::fs;

use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

use routebill_infra::import::{read_rows, records, ImportTable};

#[test]
fn test_read_csv_template_round_trip() {
    let dir = tempdir().unwrap();
    let path = ImportTable::Items.write_template(dir.path()).unwrap();
    let mut text = fs::read_to_string(&path).unwrap();
    text.push_str("Papad,પાપડ,20,false,,Fryums\nSev,સેવ,40,true,5,namkeen\n");
    fs::write(&path, text).unwrap();

    let rows = read_rows(&path).unwrap();
    let items = records::to_items(&rows).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name_gu, "પાપડ");
    assert_eq!(items[0].gst_percentage, None);
    assert_eq!(items[1].gst_percentage, Some(5.0));
}

#[test]
fn test_read_xlsx_first_sheet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bills.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Vendor Name").unwrap();
    sheet.write_string(0, 1, "Date").unwrap();
    sheet.write_string(1, 0, "Patel Stores").unwrap();
    sheet.write_string(1, 1, "2024-02-10").unwrap();
    // row 3 left blank
    sheet.write_number(3, 0, 42).unwrap();
    workbook.save(&path).unwrap();

    let rows = read_rows(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["vendor_name"], "Patel Stores");
    assert_eq!(rows[0]["date"], "2024-02-10");
    assert_eq!(rows[1]["vendor_name"], "42");
    assert_eq!((rows[0].line, rows[1].line), (2, 4));
}

#[test]
fn test_unsupported_extension_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("routes.txt");
    fs::write(&path, "name\nNorth\n").unwrap();
    assert!(read_rows(&path).is_err());
}
