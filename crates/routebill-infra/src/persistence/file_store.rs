//! File-based store implementation
//!
//! All five tables live in a single `routebill.json` inside the data
//! directory. Writes go to a working copy of the tables and are only kept
//! when the whole operation succeeds and has been persisted.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use routebill_domain::model::{
    Bill, BillLineItem, Category, Item, NewBill, NewBillItem, NewItem, NewRoute, NewVendor, Route,
    Vendor,
};
use routebill_domain::repository::{
    BillRepository, ItemRepository, RouteRepository, VendorRepository,
};
use routebill_types::{Error, Result, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BillRow {
    id: String,
    vendor_id: String,
    date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    #[serde(default)]
    routes: Vec<Route>,
    #[serde(default)]
    vendors: Vec<Vendor>,
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    bills: Vec<BillRow>,
    #[serde(default)]
    bill_items: Vec<BillLineItem>,
}

impl Tables {
    fn require_route(&self, table: &str, id: &str) -> Result<()> {
        if self.routes.iter().any(|r| r.id == id) {
            Ok(())
        } else {
            Err(missing_reference(table, "route_id", id))
        }
    }

    fn require_vendor(&self, table: &str, id: &str) -> Result<()> {
        if self.vendors.iter().any(|v| v.id == id) {
            Ok(())
        } else {
            Err(missing_reference(table, "vendor_id", id))
        }
    }

    fn require_item(&self, table: &str, id: &str) -> Result<()> {
        if self.items.iter().any(|i| i.id == id) {
            Ok(())
        } else {
            Err(missing_reference(table, "item_id", id))
        }
    }

    fn require_bill(&self, table: &str, id: &str) -> Result<()> {
        if self.bills.iter().any(|b| b.id == id) {
            Ok(())
        } else {
            Err(missing_reference(table, "bill_id", id))
        }
    }

    fn push_line(&mut self, bill_id: &str, item_id: &str, quantity: u32, price: f64) -> Result<BillLineItem> {
        self.require_bill("bill_items", bill_id)?;
        self.require_item("bill_items", item_id)?;
        if quantity == 0 {
            return Err(StoreError::Invalid {
                table: "bill_items".to_string(),
                message: "quantity must be positive".to_string(),
            }
            .into());
        }
        let line = BillLineItem {
            id: new_id(),
            bill_id: bill_id.to_string(),
            item_id: item_id.to_string(),
            quantity,
            price: Some(price),
        };
        self.bill_items.push(line.clone());
        Ok(line)
    }

    fn assemble_bill(&self, row: &BillRow) -> Bill {
        Bill {
            id: row.id.clone(),
            vendor_id: row.vendor_id.clone(),
            date: row.date,
            items: self
                .bill_items
                .iter()
                .filter(|l| l.bill_id == row.id)
                .cloned()
                .collect(),
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn missing_reference(table: &str, column: &str, id: &str) -> Error {
    StoreError::MissingReference {
        table: table.to_string(),
        column: column.to_string(),
        id: id.to_string(),
    }
    .into()
}

fn referenced(table: &str, id: &str) -> Error {
    StoreError::Referenced {
        table: table.to_string(),
        id: id.to_string(),
    }
    .into()
}

fn not_found(table: &str, id: &str) -> Error {
    StoreError::NotFound {
        table: table.to_string(),
        id: id.to_string(),
    }
    .into()
}

fn invalid(table: &str, message: &str) -> Error {
    StoreError::Invalid {
        table: table.to_string(),
        message: message.to_string(),
    }
    .into()
}

/// JSON file implementation of the repository traits
pub struct FileStore {
    store_path: PathBuf,
    tables: RefCell<Tables>,
}

impl FileStore {
    /// Create or load a store in `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("routebill.json");

        let tables = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)?
        } else {
            Tables::default()
        };

        debug!(path = %store_path.display(), "Opened file store");
        Ok(Self {
            store_path,
            tables: RefCell::new(tables),
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    fn persist(&self, tables: &Tables) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, tables)?;
        Ok(())
    }

    /// Run a write against a working copy; keep it only if it succeeds
    fn write<R>(&self, op: impl FnOnce(&mut Tables) -> Result<R>) -> Result<R> {
        let mut working = self.tables.borrow().clone();
        let out = op(&mut working)?;
        self.persist(&working)?;
        *self.tables.borrow_mut() = working;
        Ok(out)
    }
}

impl RouteRepository for FileStore {
    fn list_routes(&self) -> Result<Vec<Route>> {
        Ok(self.tables.borrow().routes.clone())
    }

    fn create_routes(&self, routes: &[NewRoute]) -> Result<Vec<Route>> {
        self.write(|t| {
            let mut created = Vec::with_capacity(routes.len());
            for new in routes {
                if new.name.trim().is_empty() {
                    return Err(Error::MissingField("name".to_string()));
                }
                let route = Route {
                    id: new_id(),
                    name: new.name.trim().to_string(),
                };
                t.routes.push(route.clone());
                created.push(route);
            }
            Ok(created)
        })
    }

    fn update_route(&self, route: &Route) -> Result<Route> {
        self.write(|t| {
            let slot = t
                .routes
                .iter_mut()
                .find(|r| r.id == route.id)
                .ok_or_else(|| not_found("routes", &route.id))?;
            *slot = route.clone();
            Ok(route.clone())
        })
    }

    fn delete_route(&self, id: &str) -> Result<()> {
        self.write(|t| {
            if t.vendors.iter().any(|v| v.route_id == id) {
                return Err(referenced("routes", id));
            }
            t.routes.retain(|r| r.id != id);
            Ok(())
        })
    }
}

impl VendorRepository for FileStore {
    fn list_vendors(&self) -> Result<Vec<Vendor>> {
        Ok(self.tables.borrow().vendors.clone())
    }

    fn create_vendors(&self, vendors: &[NewVendor]) -> Result<Vec<Vendor>> {
        self.write(|t| {
            let mut created = Vec::with_capacity(vendors.len());
            for new in vendors {
                let new = new.clone().normalized();
                if new.name.is_empty() {
                    return Err(Error::MissingField("name".to_string()));
                }
                t.require_route("vendors", &new.route_id)?;
                let vendor = Vendor {
                    id: new_id(),
                    name: new.name,
                    route_id: new.route_id,
                    contact: new.contact,
                    address: new.address,
                };
                t.vendors.push(vendor.clone());
                created.push(vendor);
            }
            Ok(created)
        })
    }

    fn update_vendor(&self, vendor: &Vendor) -> Result<Vendor> {
        self.write(|t| {
            t.require_route("vendors", &vendor.route_id)?;
            let slot = t
                .vendors
                .iter_mut()
                .find(|v| v.id == vendor.id)
                .ok_or_else(|| not_found("vendors", &vendor.id))?;
            *slot = vendor.clone();
            Ok(vendor.clone())
        })
    }

    fn delete_vendor(&self, id: &str) -> Result<()> {
        self.write(|t| {
            if t.bills.iter().any(|b| b.vendor_id == id) {
                return Err(referenced("vendors", id));
            }
            t.vendors.retain(|v| v.id != id);
            Ok(())
        })
    }
}

impl ItemRepository for FileStore {
    fn list_items(&self) -> Result<Vec<Item>> {
        Ok(self.tables.borrow().items.clone())
    }

    fn create_items(&self, items: &[NewItem]) -> Result<Vec<Item>> {
        self.write(|t| {
            let mut created = Vec::with_capacity(items.len());
            for new in items {
                new.validate()?;
                let item = new.clone().into_item(new_id());
                t.items.push(item.clone());
                created.push(item);
            }
            Ok(created)
        })
    }

    fn update_item(&self, item: &Item) -> Result<Item> {
        self.write(|t| {
            if !item.rate.is_finite() || item.rate < 0.0 {
                return Err(invalid("items", "rate must be a non-negative number"));
            }
            let slot = t
                .items
                .iter_mut()
                .find(|i| i.id == item.id)
                .ok_or_else(|| not_found("items", &item.id))?;
            *slot = item.clone();
            Ok(item.clone())
        })
    }

    fn delete_item(&self, id: &str) -> Result<()> {
        self.write(|t| {
            if t.bill_items.iter().any(|l| l.item_id == id) {
                return Err(referenced("items", id));
            }
            t.items.retain(|i| i.id != id);
            Ok(())
        })
    }

    fn bulk_update_rate(&self, category: Category, rate: f64) -> Result<usize> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(Error::InvalidNumber {
                field: "rate".to_string(),
                value: rate.to_string(),
            });
        }
        self.write(|t| {
            let mut count = 0;
            for item in t.items.iter_mut().filter(|i| i.category == category) {
                item.rate = rate;
                count += 1;
            }
            Ok(count)
        })
    }
}

impl BillRepository for FileStore {
    fn list_bills(&self) -> Result<Vec<Bill>> {
        let tables = self.tables.borrow();
        Ok(tables.bills.iter().map(|b| tables.assemble_bill(b)).collect())
    }

    fn create_bills(&self, bills: &[NewBill]) -> Result<Vec<Bill>> {
        self.write(|t| {
            let mut created = Vec::with_capacity(bills.len());
            for new in bills {
                t.require_vendor("bills", &new.vendor_id)?;
                let row = BillRow {
                    id: new_id(),
                    vendor_id: new.vendor_id.clone(),
                    date: new.date,
                };
                t.bills.push(row.clone());
                for line in &new.items {
                    t.push_line(&row.id, &line.item_id, line.quantity, line.price)?;
                }
                created.push(t.assemble_bill(&row));
            }
            Ok(created)
        })
    }

    fn create_bill_items(&self, lines: &[NewBillItem]) -> Result<usize> {
        self.write(|t| {
            for line in lines {
                t.push_line(&line.bill_id, &line.item_id, line.quantity, line.price)?;
            }
            Ok(lines.len())
        })
    }

    fn delete_bill(&self, id: &str) -> Result<()> {
        self.write(|t| {
            t.bill_items.retain(|l| l.bill_id != id);
            t.bills.retain(|b| b.id != id);
            Ok(())
        })
    }

    fn delete_bill_item(&self, id: &str) -> Result<()> {
        self.write(|t| {
            t.bill_items.retain(|l| l.id != id);
            Ok(())
        })
    }

    fn delete_all_bills(&self) -> Result<()> {
        self.write(|t| {
            t.bill_items.clear();
            t.bills.clear();
            Ok(())
        })
    }
}
