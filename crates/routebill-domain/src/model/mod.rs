//! Domain model types

pub mod bill;
pub mod item;
pub mod route;
pub mod vendor;

pub use bill::{parse_bill_date, Bill, BillLineItem, NewBill, NewBillItem, NewBillLine};
pub use item::{Category, Item, NewItem};
pub use route::{NewRoute, Route};
pub use vendor::{NewVendor, Vendor};
