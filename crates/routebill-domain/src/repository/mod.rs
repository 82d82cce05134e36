//! Repository trait definitions for the record store
//!
//! Every method maps to a single request against the backing store.

use routebill_types::Result;

use crate::model::{
    Bill, Category, Item, NewBill, NewBillItem, NewItem, NewRoute, NewVendor, Route, Vendor,
};

/// Repository for delivery routes
pub trait RouteRepository {
    fn list_routes(&self) -> Result<Vec<Route>>;

    /// Insert all rows in one request
    fn create_routes(&self, routes: &[NewRoute]) -> Result<Vec<Route>>;

    fn update_route(&self, route: &Route) -> Result<Route>;

    /// Fails with a referential-integrity error while vendors use the route
    fn delete_route(&self, id: &str) -> Result<()>;
}

/// Repository for vendors
pub trait VendorRepository {
    fn list_vendors(&self) -> Result<Vec<Vendor>>;

    /// Vendors belonging to one route
    fn list_vendors_by_route(&self, route_id: &str) -> Result<Vec<Vendor>> {
        Ok(self
            .list_vendors()?
            .into_iter()
            .filter(|v| v.route_id == route_id)
            .collect())
    }

    fn create_vendors(&self, vendors: &[NewVendor]) -> Result<Vec<Vendor>>;

    fn update_vendor(&self, vendor: &Vendor) -> Result<Vendor>;

    /// Fails with a referential-integrity error while bills reference the vendor
    fn delete_vendor(&self, id: &str) -> Result<()>;
}

/// Repository for catalog items
pub trait ItemRepository {
    fn list_items(&self) -> Result<Vec<Item>>;

    fn create_items(&self, items: &[NewItem]) -> Result<Vec<Item>>;

    fn update_item(&self, item: &Item) -> Result<Item>;

    /// Fails with a referential-integrity error while any bill line uses the item
    fn delete_item(&self, id: &str) -> Result<()>;

    /// Set `rate` on every item of a category, returning how many changed
    fn bulk_update_rate(&self, category: Category, rate: f64) -> Result<usize>;
}

/// Repository for bills and bill line items
pub trait BillRepository {
    /// All bills with their lines embedded
    fn list_bills(&self) -> Result<Vec<Bill>>;

    /// Create bills (with any lines they carry)
    fn create_bills(&self, bills: &[NewBill]) -> Result<Vec<Bill>>;

    fn create_bill(&self, bill: &NewBill) -> Result<Bill> {
        self.create_bills(std::slice::from_ref(bill))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                routebill_types::StoreError::Invalid {
                    table: "bills".to_string(),
                    message: "store returned no bill".to_string(),
                }
                .into()
            })
    }

    /// Attach lines to existing bills
    fn create_bill_items(&self, lines: &[NewBillItem]) -> Result<usize>;

    /// Delete a bill and its lines
    fn delete_bill(&self, id: &str) -> Result<()>;

    fn delete_bill_item(&self, id: &str) -> Result<()>;

    /// Delete every bill and line
    fn delete_all_bills(&self) -> Result<()>;
}

/// Everything the application needs from a backing store
pub trait Store: RouteRepository + VendorRepository + ItemRepository + BillRepository {}

impl<T> Store for T where T: RouteRepository + VendorRepository + ItemRepository + BillRepository {}
