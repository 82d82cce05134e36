//! In-progress bill on the billing form

use chrono::NaiveDate;

use routebill_types::{Error, Result};

use crate::model::{Category, Item, NewBill, NewBillLine, Vendor};
use crate::service::aggregation::LineAmounts;

/// A line captured from the catalog at the moment it was added
#[derive(Debug, Clone, PartialEq)]
pub struct DraftLine {
    pub item_id: String,
    pub name: String,
    pub rate: f64,
    pub gst_percentage: f64,
    pub category: Category,
    pub quantity: u32,
}

impl DraftLine {
    pub fn amounts(&self) -> LineAmounts {
        LineAmounts::compute(self.rate, f64::from(self.quantity), self.gst_percentage)
    }
}

#[derive(Debug, Clone)]
pub struct BillDraft {
    pub route_id: Option<String>,
    pub vendor_id: Option<String>,
    pub date: NaiveDate,
    lines: Vec<DraftLine>,
}

impl BillDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            route_id: None,
            vendor_id: None,
            date,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Changing the route clears the vendor choice
    pub fn select_route(&mut self, route_id: Option<String>) {
        if self.route_id != route_id {
            self.vendor_id = None;
        }
        self.route_id = route_id;
    }

    /// Vendors selectable for the current route; none until a route is chosen
    pub fn selectable_vendors<'a>(&self, vendors: &'a [Vendor]) -> Vec<&'a Vendor> {
        match &self.route_id {
            Some(route_id) => vendors.iter().filter(|v| &v.route_id == route_id).collect(),
            None => Vec::new(),
        }
    }

    /// Add `quantity` of an item, merging into an existing line for the same item
    pub fn add_item(&mut self, item: &Item, quantity: i64) -> Result<()> {
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| Error::InvalidNumber {
                field: "quantity".to_string(),
                value: quantity.to_string(),
            })?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            return Ok(());
        }

        self.lines.push(DraftLine {
            item_id: item.id.clone(),
            name: item.name_en.clone(),
            rate: item.rate,
            gst_percentage: item.gst_rate(),
            category: item.category,
            quantity,
        });
        Ok(())
    }

    pub fn remove_item(&mut self, item_id: &str) {
        self.lines.retain(|l| l.item_id != item_id);
    }

    /// Lines of one category, in entry order
    pub fn lines_in(&self, category: Category) -> impl Iterator<Item = &DraftLine> {
        self.lines.iter().filter(move |l| l.category == category)
    }

    pub fn totals(&self) -> LineAmounts {
        self.lines.iter().map(DraftLine::amounts).sum()
    }

    /// Build the create request; vendor and at least one line are required
    pub fn to_new_bill(&self) -> Result<NewBill> {
        let vendor_id = self
            .vendor_id
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::MissingField("vendor".to_string()))?;
        if self.lines.is_empty() {
            return Err(Error::MissingField("items".to_string()));
        }

        Ok(NewBill {
            vendor_id,
            date: self.date,
            items: self
                .lines
                .iter()
                .map(|l| NewBillLine {
                    item_id: l.item_id.clone(),
                    quantity: l.quantity,
                    price: l.rate,
                })
                .collect(),
        })
    }

    /// Clear vendor and lines after a successful submit, keeping the route
    pub fn reset(&mut self, date: NaiveDate) {
        self.vendor_id = None;
        self.date = date;
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, rate: f64, gst: Option<f64>, category: Category) -> Item {
        Item {
            id: id.to_string(),
            name_en: id.to_uppercase(),
            name_gu: String::new(),
            rate,
            has_gst: gst.is_some(),
            gst_percentage: gst,
            category,
        }
    }

    fn draft() -> BillDraft {
        BillDraft::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    #[test]
    fn test_add_same_item_merges_quantity() {
        let mut d = draft();
        let papad = item("papad", 20.0, None, Category::Fryums);
        d.add_item(&papad, 2).unwrap();
        d.add_item(&papad, 3).unwrap();
        assert_eq!(d.lines().len(), 1);
        assert_eq!(d.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut d = draft();
        let papad = item("papad", 20.0, None, Category::Fryums);
        assert!(d.add_item(&papad, 0).is_err());
        assert!(d.add_item(&papad, -2).is_err());
        assert!(d.is_empty());
    }

    #[test]
    fn test_line_captures_rate_at_add_time() {
        let mut d = draft();
        let mut sev = item("sev", 40.0, Some(5.0), Category::Namkeen);
        d.add_item(&sev, 1).unwrap();
        sev.rate = 99.0;
        assert_eq!(d.lines()[0].rate, 40.0);
    }

    #[test]
    fn test_totals() {
        let mut d = draft();
        d.add_item(&item("a", 100.0, Some(5.0), Category::Namkeen), 2).unwrap();
        d.add_item(&item("b", 50.0, None, Category::Others), 1).unwrap();
        let t = d.totals();
        assert!((t.without_tax - 250.0).abs() < 1e-9);
        assert!((t.tax_amount - 10.0).abs() < 1e-9);
        assert!((t.with_tax - 260.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_new_bill_requires_vendor_and_lines() {
        let mut d = draft();
        assert!(matches!(d.to_new_bill(), Err(Error::MissingField(f)) if f == "vendor"));
        d.vendor_id = Some("v1".to_string());
        assert!(matches!(d.to_new_bill(), Err(Error::MissingField(f)) if f == "items"));
        d.add_item(&item("a", 10.0, None, Category::Others), 4).unwrap();
        let bill = d.to_new_bill().unwrap();
        assert_eq!(bill.items[0].price, 10.0);
        assert_eq!(bill.items[0].quantity, 4);
    }

    #[test]
    fn test_route_change_clears_vendor() {
        let mut d = draft();
        d.select_route(Some("r1".to_string()));
        d.vendor_id = Some("v1".to_string());
        d.select_route(Some("r1".to_string()));
        assert!(d.vendor_id.is_some());
        d.select_route(Some("r2".to_string()));
        assert!(d.vendor_id.is_none());
    }
}
