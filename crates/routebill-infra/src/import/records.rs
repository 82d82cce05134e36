//! Convert imported rows into records for each table
//!
//! Every conversion is all-or-nothing: the first bad row fails the table
//! with the file line it was read from (header is row 1).

use routebill_domain::model::{
    parse_bill_date, Category, Item, NewBill, NewBillItem, NewItem, NewRoute, NewVendor, Route,
    Vendor,
};
use routebill_types::{ImportError, Result};

use super::tabular::Row;

struct Cells<'a> {
    row: &'a Row,
}

impl<'a> Cells<'a> {
    fn new(row: &'a Row) -> Self {
        Self { row }
    }

    fn fail(&self, message: impl Into<String>) -> ImportError {
        ImportError::Row {
            row: self.row.line,
            message: message.into(),
        }
    }

    fn optional(&self, column: &str) -> Option<&'a str> {
        self.row
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, column: &str) -> std::result::Result<&'a str, ImportError> {
        self.optional(column)
            .ok_or_else(|| self.fail(format!("missing {}", column)))
    }

    fn number(&self, column: &str) -> std::result::Result<Option<f64>, ImportError> {
        match self.optional(column) {
            None => Ok(None),
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
                _ => Err(self.fail(format!("invalid number for {}: {}", column, raw))),
            },
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

pub fn to_routes(rows: &[Row]) -> Result<Vec<NewRoute>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let cells = Cells::new(row);
        out.push(NewRoute {
            name: cells.required("name")?.to_string(),
        });
    }
    Ok(out)
}

/// Vendors name their route by `route_name`, or by `route_id` directly
pub fn to_vendors(rows: &[Row], routes: &[Route]) -> Result<Vec<NewVendor>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let cells = Cells::new(row);
        let name = cells.required("name")?;
        let route_id = match cells.optional("route_id") {
            Some(id) => id.to_string(),
            None => {
                let route_name = cells.required("route_name")?;
                routes
                    .iter()
                    .find(|r| same_name(&r.name, route_name))
                    .map(|r| r.id.clone())
                    .ok_or_else(|| cells.fail(format!("unknown route: {}", route_name)))?
            }
        };
        out.push(
            NewVendor {
                name: name.to_string(),
                route_id,
                contact: cells.optional("contact").map(str::to_string),
                address: cells.optional("address").map(str::to_string),
            }
            .normalized(),
        );
    }
    Ok(out)
}

pub fn to_items(rows: &[Row]) -> Result<Vec<NewItem>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let cells = Cells::new(row);
        let has_gst = match cells.optional("has_gst") {
            None => false,
            Some(raw) => {
                parse_flag(raw).ok_or_else(|| cells.fail(format!("invalid has_gst: {}", raw)))?
            }
        };
        let category = match cells.optional("category") {
            None => Category::Others,
            Some(raw) => Category::parse(raw)
                .ok_or_else(|| cells.fail(format!("unknown category: {}", raw)))?,
        };
        let rate = cells
            .number("rate")?
            .ok_or_else(|| cells.fail("missing rate"))?;
        out.push(NewItem {
            name_en: cells.required("name_en")?.to_string(),
            name_gu: cells.required("name_gu")?.to_string(),
            rate,
            has_gst,
            gst_percentage: cells.number("gst_percentage")?,
            category,
        });
    }
    Ok(out)
}

/// Bills name their vendor by `vendor_name`, or by `vendor_id` directly
pub fn to_bills(rows: &[Row], vendors: &[Vendor]) -> Result<Vec<NewBill>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let cells = Cells::new(row);
        let vendor_id = match cells.optional("vendor_id") {
            Some(id) => id.to_string(),
            None => {
                let vendor_name = cells.required("vendor_name")?;
                vendors
                    .iter()
                    .find(|v| same_name(&v.name, vendor_name))
                    .map(|v| v.id.clone())
                    .ok_or_else(|| cells.fail(format!("unknown vendor: {}", vendor_name)))?
            }
        };
        let raw_date = cells.required("date")?;
        let date = parse_bill_date(raw_date)
            .ok_or_else(|| cells.fail(format!("invalid date: {}", raw_date)))?;
        out.push(NewBill {
            vendor_id,
            date,
            items: Vec::new(),
        });
    }
    Ok(out)
}

/// Lines take the item's current rate as their captured price
pub fn to_bill_items(rows: &[Row], items: &[Item]) -> Result<Vec<NewBillItem>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let cells = Cells::new(row);
        let bill_id = cells.required("bill_id")?;
        let item = match cells.optional("item_id") {
            Some(id) => items.iter().find(|i| i.id == id),
            None => {
                let name = cells.required("item_name_en")?;
                items.iter().find(|i| same_name(&i.name_en, name))
            }
        }
        .ok_or_else(|| cells.fail("unknown item"))?;

        let raw_qty = cells.required("quantity")?;
        let quantity = raw_qty
            .parse::<f64>()
            .ok()
            .filter(|q| q.fract() == 0.0 && *q >= 1.0 && *q <= u32::MAX as f64)
            .map(|q| q as u32)
            .ok_or_else(|| cells.fail(format!("invalid quantity: {}", raw_qty)))?;

        out.push(NewBillItem {
            bill_id: bill_id.to_string(),
            item_id: item.id.clone(),
            quantity,
            price: item.rate,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::tabular::parse_csv;
    use routebill_types::Error;

    fn row(line: usize, pairs: &[(&str, &str)]) -> Row {
        let cells = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Row::new(line, cells)
    }

    fn row_number(err: Error) -> usize {
        match err {
            Error::Import(ImportError::Row { row, .. }) => row,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_vendors_resolve_route_by_name() {
        let routes = vec![Route {
            id: "r1".to_string(),
            name: "Tejgadh".to_string(),
        }];
        let rows = vec![row(
            2,
            &[("name", "Patel Stores"), ("route_name", " tejgadh "), ("contact", "")],
        )];
        let vendors = to_vendors(&rows, &routes).unwrap();
        assert_eq!(vendors[0].route_id, "r1");
        assert_eq!(vendors[0].contact, None);
    }

    #[test]
    fn test_unknown_route_reports_row_number() {
        let rows = vec![
            row(2, &[("name", "A"), ("route_id", "r1")]),
            row(3, &[("name", "B"), ("route_name", "Nowhere")]),
        ];
        let err = to_vendors(&rows, &[]).unwrap_err();
        assert_eq!(row_number(err), 3);
    }

    #[test]
    fn test_items_defaults_and_flags() {
        let rows = vec![row(2, &[
            ("name_en", "Sev"),
            ("name_gu", "સેવ"),
            ("rate", "45.5"),
            ("has_gst", "Yes"),
            ("gst_percentage", "5"),
        ])];
        let items = to_items(&rows).unwrap();
        assert_eq!(items[0].category, Category::Others);
        assert!(items[0].has_gst);
        assert_eq!(items[0].gst_percentage, Some(5.0));
        assert_eq!(items[0].rate, 45.5);
    }

    #[test]
    fn test_items_bad_rate_fails() {
        let rows = vec![row(2, &[("name_en", "Sev"), ("name_gu", "સેવ"), ("rate", "abc")])];
        assert_eq!(row_number(to_items(&rows).unwrap_err()), 2);
    }

    #[test]
    fn test_bill_items_capture_current_rate() {
        let items = vec![Item {
            id: "i1".to_string(),
            name_en: "Papad".to_string(),
            name_gu: "પાપડ".to_string(),
            rate: 12.0,
            has_gst: false,
            gst_percentage: None,
            category: Category::Fryums,
        }];
        let rows = vec![row(2, &[("bill_id", "b1"), ("item_name_en", "PAPAD"), ("quantity", "3")])];
        let lines = to_bill_items(&rows, &items).unwrap();
        assert_eq!(lines[0].item_id, "i1");
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].price, 12.0);

        let bad = vec![row(2, &[("bill_id", "b1"), ("item_name_en", "Papad"), ("quantity", "0")])];
        assert!(to_bill_items(&bad, &items).is_err());
    }

    #[test]
    fn test_bills_parse_date() {
        let vendors = vec![Vendor {
            id: "v1".to_string(),
            name: "Shop".to_string(),
            route_id: "r1".to_string(),
            contact: None,
            address: None,
        }];
        let rows = vec![row(2, &[("vendor_name", "shop"), ("date", "2024-01-31")])];
        let bills = to_bills(&rows, &vendors).unwrap();
        assert_eq!(bills[0].vendor_id, "v1");
        assert_eq!(bills[0].date.to_string(), "2024-01-31");

        let bad = vec![row(2, &[("vendor_name", "shop"), ("date", "31/01/2024")])];
        assert!(to_bills(&bad, &vendors).is_err());
    }

    #[test]
    fn test_row_number_counts_skipped_blank_records() {
        let rows =
            parse_csv(b"name_en,name_gu,rate\nPapad,P,20\n,,\nSev,S,twenty\n").unwrap();
        assert_eq!(row_number(to_items(&rows).unwrap_err()), 4);
    }
}
