//! Shared test store: a file store whose writes can be made to fail per table

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;

use chrono::NaiveDate;
use tempfile::TempDir;

use routebill_domain::model::{
    Bill, Category, Item, NewBill, NewBillItem, NewBillLine, NewItem, NewRoute, NewVendor, Route,
    Vendor,
};
use routebill_domain::repository::{
    BillRepository, ItemRepository, RouteRepository, VendorRepository,
};
use routebill_infra::persistence::FileStore;
use routebill_types::{Result, StoreError};

pub struct FlakyStore {
    inner: FileStore,
    failing: RefCell<HashSet<&'static str>>,
    _dir: TempDir,
}

impl FlakyStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let inner = FileStore::open(dir.path().to_path_buf()).unwrap();
        Self {
            inner,
            failing: RefCell::new(HashSet::new()),
            _dir: dir,
        }
    }

    pub fn fail_writes(&self, table: &'static str) {
        self.failing.borrow_mut().insert(table);
    }

    pub fn inner(&self) -> &FileStore {
        &self.inner
    }

    fn check(&self, table: &str) -> Result<()> {
        if self.failing.borrow().contains(table) {
            return Err(StoreError::Remote {
                status: 503,
                code: None,
                message: format!("{} unavailable", table),
            }
            .into());
        }
        Ok(())
    }
}

impl RouteRepository for FlakyStore {
    fn list_routes(&self) -> Result<Vec<Route>> {
        self.inner.list_routes()
    }
    fn create_routes(&self, routes: &[NewRoute]) -> Result<Vec<Route>> {
        self.check("routes")?;
        self.inner.create_routes(routes)
    }
    fn update_route(&self, route: &Route) -> Result<Route> {
        self.check("routes")?;
        self.inner.update_route(route)
    }
    fn delete_route(&self, id: &str) -> Result<()> {
        self.check("routes")?;
        self.inner.delete_route(id)
    }
}

impl VendorRepository for FlakyStore {
    fn list_vendors(&self) -> Result<Vec<Vendor>> {
        self.inner.list_vendors()
    }
    fn create_vendors(&self, vendors: &[NewVendor]) -> Result<Vec<Vendor>> {
        self.check("vendors")?;
        self.inner.create_vendors(vendors)
    }
    fn update_vendor(&self, vendor: &Vendor) -> Result<Vendor> {
        self.check("vendors")?;
        self.inner.update_vendor(vendor)
    }
    fn delete_vendor(&self, id: &str) -> Result<()> {
        self.check("vendors")?;
        self.inner.delete_vendor(id)
    }
}

impl ItemRepository for FlakyStore {
    fn list_items(&self) -> Result<Vec<Item>> {
        self.inner.list_items()
    }
    fn create_items(&self, items: &[NewItem]) -> Result<Vec<Item>> {
        self.check("items")?;
        self.inner.create_items(items)
    }
    fn update_item(&self, item: &Item) -> Result<Item> {
        self.check("items")?;
        self.inner.update_item(item)
    }
    fn delete_item(&self, id: &str) -> Result<()> {
        self.check("items")?;
        self.inner.delete_item(id)
    }
    fn bulk_update_rate(&self, category: Category, rate: f64) -> Result<usize> {
        self.check("items")?;
        self.inner.bulk_update_rate(category, rate)
    }
}

impl BillRepository for FlakyStore {
    fn list_bills(&self) -> Result<Vec<Bill>> {
        self.inner.list_bills()
    }
    fn create_bills(&self, bills: &[NewBill]) -> Result<Vec<Bill>> {
        self.check("bills")?;
        self.inner.create_bills(bills)
    }
    fn create_bill_items(&self, lines: &[NewBillItem]) -> Result<usize> {
        self.check("bill_items")?;
        self.inner.create_bill_items(lines)
    }
    fn delete_bill(&self, id: &str) -> Result<()> {
        self.check("bills")?;
        self.inner.delete_bill(id)
    }
    fn delete_bill_item(&self, id: &str) -> Result<()> {
        self.check("bill_items")?;
        self.inner.delete_bill_item(id)
    }
    fn delete_all_bills(&self) -> Result<()> {
        self.check("bills")?;
        self.inner.delete_all_bills()
    }
}

pub fn new_item(name: &str, rate: f64, gst: Option<f64>, category: Category) -> NewItem {
    NewItem {
        name_en: name.to_string(),
        name_gu: format!("{}-gu", name),
        rate,
        has_gst: gst.is_some(),
        gst_percentage: gst,
        category,
    }
}

/// One route, one vendor, returns (route, vendor)
pub fn seed_directory(store: &FileStore) -> (Route, Vendor) {
    let route = store
        .create_routes(&[NewRoute {
            name: "Tejgadh".to_string(),
        }])
        .unwrap()
        .remove(0);
    let vendor = store
        .create_vendors(&[NewVendor {
            name: "Patel Stores".to_string(),
            route_id: route.id.clone(),
            contact: Some("98250".to_string()),
            address: Some("Station Road".to_string()),
        }])
        .unwrap()
        .remove(0);
    (route, vendor)
}

pub fn bill_for(store: &FileStore, vendor: &Vendor, item: &Item, quantity: u32, price: f64) -> Bill {
    store
        .create_bill(&NewBill {
            vendor_id: vendor.id.clone(),
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            items: vec![NewBillLine {
                item_id: item.id.clone(),
                quantity,
                price,
            }],
        })
        .unwrap()
}
