//! Integration tests for PDF and spreadsheet export

mod common;

use std::path::Path;

use tempfile::tempdir;

use common::{bill_for, new_item, seed_directory, FlakyStore};
use routebill_app::config::BusinessProfiles;
use routebill_app::export::{
    export_summary_workbook, render_bill_pdf, write_bill_pdf, write_summary_pdf, ExportContext,
};
use routebill_domain::model::Category;
use routebill_domain::repository::{BillRepository, ItemRepository, VendorRepository};
use routebill_types::Language;

#[test]
fn test_bill_and_summary_pdfs_are_written() {
    let dir = tempdir().unwrap();
    let store = FlakyStore::new();
    let (_, vendor) = seed_directory(store.inner());
    let item = store
        .inner()
        .create_items(&[new_item("Papad", 20.0, Some(5.0), Category::Fryums)])
        .unwrap()
        .remove(0);
    bill_for(store.inner(), &vendor, &item, 2, 20.0);
    bill_for(store.inner(), &vendor, &item, 3, 18.0);

    let items = store.list_items().unwrap();
    let vendors = store.list_vendors().unwrap();
    let bills = store.list_bills().unwrap();
    let profiles = BusinessProfiles::default();
    let ctx = ExportContext {
        items: &items,
        vendors: &vendors,
        business: profiles.for_language(Language::En),
        language: Language::En,
        gujarati_font: None,
    };

    let bill_path = write_bill_pdf(&ctx, &bills[0], dir.path()).unwrap();
    assert!(bill_path.ends_with("bill_Patel Stores_01-04-2024_en.pdf"));
    let bytes = std::fs::read(&bill_path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let summary_path = write_summary_pdf(&ctx, &bills, dir.path()).unwrap();
    assert!(summary_path.ends_with("summary_en.pdf"));
}

#[test]
fn test_gujarati_pdf_falls_back_when_font_missing() {
    let store = FlakyStore::new();
    let (_, vendor) = seed_directory(store.inner());
    let item = store
        .inner()
        .create_items(&[new_item("Papad", 20.0, None, Category::Fryums)])
        .unwrap()
        .remove(0);
    let bill = bill_for(store.inner(), &vendor, &item, 1, 20.0);

    let items = store.list_items().unwrap();
    let vendors = store.list_vendors().unwrap();
    let profiles = BusinessProfiles::default();
    let ctx = ExportContext {
        items: &items,
        vendors: &vendors,
        business: profiles.for_language(Language::Gu),
        language: Language::Gu,
        gujarati_font: Some(Path::new("/nonexistent/NotoSansGujarati-Regular.ttf")),
    };

    let bytes = render_bill_pdf(&ctx, &bill).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_many_lines_span_pages() {
    let store = FlakyStore::new();
    let (_, vendor) = seed_directory(store.inner());
    let new_items: Vec<_> = (0..60)
        .map(|i| new_item(&format!("Item {}", i), 10.0, None, Category::Others))
        .collect();
    let items = store.inner().create_items(&new_items).unwrap();
    for item in &items {
        bill_for(store.inner(), &vendor, item, 1, 10.0);
    }

    let vendors = store.list_vendors().unwrap();
    let bills = store.list_bills().unwrap();
    let profiles = BusinessProfiles::default();
    let ctx = ExportContext {
        items: &items,
        vendors: &vendors,
        business: &profiles.en,
        language: Language::En,
        gujarati_font: None,
    };
    let dir = tempdir().unwrap();
    let path = write_summary_pdf(&ctx, &bills, dir.path()).unwrap();
    assert!(std::fs::metadata(path).unwrap().len() > 0);
}

#[test]
fn test_summary_workbook_is_written() {
    let dir = tempdir().unwrap();
    let store = FlakyStore::new();
    let (_, vendor) = seed_directory(store.inner());
    let item = store
        .inner()
        .create_items(&[new_item("Sev", 40.0, Some(5.0), Category::Namkeen)])
        .unwrap()
        .remove(0);
    bill_for(store.inner(), &vendor, &item, 4, 40.0);

    let items = store.list_items().unwrap();
    let vendors = store.list_vendors().unwrap();
    let bills = store.list_bills().unwrap();
    let profiles = BusinessProfiles::default();
    let ctx = ExportContext {
        items: &items,
        vendors: &vendors,
        business: &profiles.en,
        language: Language::En,
        gujarati_font: None,
    };

    let path = dir.path().join("out").join("summary.xlsx");
    export_summary_workbook(&ctx, &bills, &path).unwrap();
    assert!(path.exists());
}
