//! Integration tests for the screen controllers

mod common;

use chrono::NaiveDate;

use common::{bill_for, new_item, seed_directory, FlakyStore};
use routebill_app::controller::{BillsController, DirectoryController, ItemsController};
use routebill_domain::model::{Category, NewVendor};
use routebill_domain::repository::{BillRepository, ItemRepository};
use routebill_domain::service::BillDraft;
use routebill_types::Error;

#[test]
fn test_add_item_failure_restores_list() {
    let store = FlakyStore::new();
    store
        .inner()
        .create_items(&[new_item("Papad", 20.0, None, Category::Fryums)])
        .unwrap();
    let mut items = ItemsController::load(&store).unwrap();
    let before = items.items().to_vec();

    store.fail_writes("items");
    let err = items
        .add(&store, new_item("Sev", 40.0, Some(5.0), Category::Namkeen))
        .unwrap_err();

    assert!(matches!(err, Error::Store(_)));
    assert_eq!(items.items(), before.as_slice());
}

#[test]
fn test_add_item_replaces_temporary_id() {
    let store = FlakyStore::new();
    let mut items = ItemsController::load(&store).unwrap();
    let stored = items
        .add(&store, new_item("Sev", 40.0, Some(5.0), Category::Namkeen))
        .unwrap();

    assert_eq!(items.items().len(), 1);
    assert_eq!(items.items()[0].id, stored.id);
    assert!(!stored.id.starts_with("temp_"));
}

#[test]
fn test_delete_item_on_bill_is_rejected_and_kept() {
    let store = FlakyStore::new();
    let (_, vendor) = seed_directory(store.inner());
    let item = store
        .inner()
        .create_items(&[new_item("Papad", 20.0, None, Category::Fryums)])
        .unwrap()
        .remove(0);
    bill_for(store.inner(), &vendor, &item, 2, 20.0);

    let mut items = ItemsController::load(&store).unwrap();
    let err = items.delete(&store, &item.id).unwrap_err();

    assert!(err.is_foreign_key());
    assert_eq!(
        err.user_message(),
        "Cannot delete this item because it is part of one or more bills. \
         Please remove it from all bills first."
    );
    assert_eq!(items.items().len(), 1);
    assert_eq!(store.list_items().unwrap().len(), 1);
}

#[test]
fn test_bulk_rate_update_namkeen() {
    let store = FlakyStore::new();
    store
        .inner()
        .create_items(&[
            new_item("Sev", 30.0, None, Category::Namkeen),
            new_item("Gathiya", 36.0, None, Category::Namkeen),
            new_item("Papad", 20.0, None, Category::Fryums),
            new_item("Soap", 10.0, None, Category::Others),
        ])
        .unwrap();
    let mut items = ItemsController::load(&store).unwrap();

    let count = items.bulk_update_rate(&store, Category::Namkeen, 50.0).unwrap();
    assert_eq!(count, 2);

    for item in items.items().iter().chain(store.list_items().unwrap().iter()) {
        match item.category {
            Category::Namkeen => assert_eq!(item.rate, 50.0),
            Category::Fryums => assert_eq!(item.rate, 20.0),
            Category::Others => assert_eq!(item.rate, 10.0),
        }
    }
}

#[test]
fn test_bulk_rate_failure_reverts_local_rates() {
    let store = FlakyStore::new();
    store
        .inner()
        .create_items(&[new_item("Sev", 30.0, None, Category::Namkeen)])
        .unwrap();
    let mut items = ItemsController::load(&store).unwrap();
    store.fail_writes("items");

    assert!(items.bulk_update_rate(&store, Category::Namkeen, 50.0).is_err());
    assert_eq!(items.items()[0].rate, 30.0);
}

#[test]
fn test_change_category_persists() {
    let store = FlakyStore::new();
    let item = store
        .inner()
        .create_items(&[new_item("Chips", 15.0, None, Category::Others)])
        .unwrap()
        .remove(0);
    let mut items = ItemsController::load(&store).unwrap();

    items.change_category(&store, &item.id, Category::Fryums).unwrap();
    assert_eq!(store.list_items().unwrap()[0].category, Category::Fryums);
}

#[test]
fn test_vendor_delete_with_bills_reverts() {
    let store = FlakyStore::new();
    let (route, vendor) = seed_directory(store.inner());
    let item = store
        .inner()
        .create_items(&[new_item("Papad", 20.0, None, Category::Fryums)])
        .unwrap()
        .remove(0);
    bill_for(store.inner(), &vendor, &item, 1, 20.0);

    let mut directory = DirectoryController::load(&store).unwrap();
    assert!(directory.delete_vendor(&store, &vendor.id).is_err());
    assert_eq!(directory.vendors().len(), 1);

    directory
        .add_vendor(
            &store,
            NewVendor {
                name: "Shah Traders".to_string(),
                route_id: route.id.clone(),
                contact: Some(" ".to_string()),
                address: None,
            },
        )
        .unwrap();
    assert_eq!(directory.vendors().len(), 2);
    assert!(directory.vendors().iter().all(|v| !v.id.starts_with("temp_")));
    assert_eq!(directory.route_name(&route.id), Some("Tejgadh"));
}

#[test]
fn test_submit_draft_and_delete_all() {
    let store = FlakyStore::new();
    let (route, vendor) = seed_directory(store.inner());
    let item = store
        .inner()
        .create_items(&[new_item("Papad", 20.0, Some(5.0), Category::Fryums)])
        .unwrap()
        .remove(0);

    let mut bills = BillsController::load(&store).unwrap();
    let mut draft = BillDraft::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert!(bills.submit(&store, &draft).is_err());

    draft.select_route(Some(route.id.clone()));
    draft.vendor_id = Some(vendor.id.clone());
    draft.add_item(&item, 2).unwrap();
    draft.add_item(&item, 3).unwrap();

    let bill = bills.submit(&store, &draft).unwrap();
    assert_eq!(bill.items.len(), 1);
    assert_eq!(bill.items[0].quantity, 5);
    assert_eq!(bill.items[0].price, Some(20.0));
    assert_eq!(bills.bills().len(), 1);

    store.fail_writes("bills");
    assert!(bills.delete_all(&store).is_err());
    assert_eq!(bills.bills().len(), 1);
}

#[test]
fn test_delete_line_refreshes_bill() {
    let store = FlakyStore::new();
    let (_, vendor) = seed_directory(store.inner());
    let item = store
        .inner()
        .create_items(&[new_item("Papad", 20.0, None, Category::Fryums)])
        .unwrap()
        .remove(0);
    let bill = bill_for(store.inner(), &vendor, &item, 2, 20.0);

    let mut bills = BillsController::load(&store).unwrap();
    bills.delete_line(&store, &bill.items[0].id).unwrap();
    assert!(bills.bills()[0].items.is_empty());

    bills.delete_bill(&store, &bill.id).unwrap();
    assert!(bills.bills().is_empty());
    assert!(store.list_bills().unwrap().is_empty());
}
