//! Integration tests for bulk import

mod common;

use std::fs;

use tempfile::tempdir;

use common::FlakyStore;
use routebill_app::import_service::{run_import, write_templates, ImportOutcome, ImportSelection};
use routebill_domain::repository::{BillRepository, ItemRepository, RouteRepository, VendorRepository};
use routebill_infra::import::ImportTable;

fn write(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_tables_run_in_order_and_resolve_names() {
    let dir = tempdir().unwrap();
    let store = FlakyStore::new();

    let mut selection = ImportSelection::new();
    // Selected out of order on purpose
    selection.set(
        ImportTable::Vendors,
        write(dir.path(), "vendors.csv", "name,route_name,contact,address\nPatel Stores,Tejgadh,98250,\n"),
    );
    selection.set(ImportTable::Routes, write(dir.path(), "routes.csv", "name\nTejgadh\nBodeli\n"));
    selection.set(
        ImportTable::Bills,
        write(dir.path(), "bills.csv", "vendor_name,date\nPatel Stores,2024-02-01\n"),
    );

    let reports = run_import(&store, &selection);
    let tables: Vec<ImportTable> = reports.iter().map(|r| r.table).collect();
    assert_eq!(tables, vec![ImportTable::Routes, ImportTable::Vendors, ImportTable::Bills]);
    assert!(reports.iter().all(|r| r.outcome.is_success()));
    assert_eq!(reports[0].outcome, ImportOutcome::Success { count: 2 });

    assert_eq!(store.list_routes().unwrap().len(), 2);
    assert_eq!(store.list_vendors().unwrap()[0].contact.as_deref(), Some("98250"));
    assert_eq!(store.list_bills().unwrap().len(), 1);
}

#[test]
fn test_rejected_table_does_not_block_others() {
    let dir = tempdir().unwrap();
    let store = FlakyStore::new();
    store.fail_writes("items");

    let mut selection = ImportSelection::new();
    selection.set(ImportTable::Routes, write(dir.path(), "routes.csv", "name\nTejgadh\n"));
    selection.set(
        ImportTable::Items,
        write(
            dir.path(),
            "items.csv",
            "name_en,name_gu,rate,has_gst,gst_percentage,category\nPapad,પાપડ,20,false,,Fryums\n",
        ),
    );

    let reports = run_import(&store, &selection);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].outcome, ImportOutcome::Success { count: 1 });
    assert!(matches!(reports[1].outcome, ImportOutcome::Failure { .. }));
    assert!(store.list_items().unwrap().is_empty());
    assert_eq!(store.list_routes().unwrap().len(), 1);
}

#[test]
fn test_bad_row_fails_table_without_writing() {
    let dir = tempdir().unwrap();
    let store = FlakyStore::new();

    let mut selection = ImportSelection::new();
    selection.set(
        ImportTable::Items,
        write(
            dir.path(),
            "items.csv",
            "name_en,name_gu,rate\nPapad,પાપડ,20\nSev,સેવ,twenty\n",
        ),
    );

    let reports = run_import(&store, &selection);
    match &reports[0].outcome {
        ImportOutcome::Failure { message } => assert!(message.contains("Row 3")),
        other => panic!("unexpected {other:?}"),
    }
    assert!(store.list_items().unwrap().is_empty());
}

#[test]
fn test_bad_row_after_blank_line_reports_file_line() {
    let dir = tempdir().unwrap();
    let store = FlakyStore::new();

    let mut selection = ImportSelection::new();
    selection.set(
        ImportTable::Items,
        write(
            dir.path(),
            "items.csv",
            "name_en,name_gu,rate\nPapad,P,20\n,,\nSev,S,twenty\n",
        ),
    );

    let reports = run_import(&store, &selection);
    match &reports[0].outcome {
        ImportOutcome::Failure { message } => {
            assert!(message.contains("Row 4"), "{message}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_write_templates_for_every_table() {
    let dir = tempdir().unwrap();
    let paths = write_templates(dir.path()).unwrap();
    assert_eq!(paths.len(), 5);
    let bill_items = fs::read_to_string(dir.path().join("bill_items_template.csv")).unwrap();
    assert_eq!(bill_items.trim(), "bill_id,item_name_en,quantity");
}
