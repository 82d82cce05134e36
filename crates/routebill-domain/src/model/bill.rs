//! Bills and their line items

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub vendor_id: String,
    #[serde(deserialize_with = "deserialize_bill_date")]
    pub date: NaiveDate,
    /// Lines in entry order
    #[serde(default, deserialize_with = "deserialize_lines")]
    pub items: Vec<BillLineItem>,
}

impl Bill {
    /// Bill date as dd/mm/yyyy
    pub fn display_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLineItem {
    pub id: String,
    #[serde(default)]
    pub bill_id: String,
    pub item_id: String,
    pub quantity: u32,
    /// Unit price captured when the bill was made
    #[serde(default)]
    pub price: Option<f64>,
}

impl BillLineItem {
    pub fn unit_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

/// One line of a bill being created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBillLine {
    pub item_id: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBill {
    pub vendor_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<NewBillLine>,
}

/// A `bill_items` row attached to an existing bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBillItem {
    pub bill_id: String,
    pub item_id: String,
    pub quantity: u32,
    pub price: f64,
}

/// Accept plain dates and full timestamps
fn deserialize_bill_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_bill_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

fn deserialize_lines<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<BillLineItem>, D::Error> {
    Ok(Option::<Vec<BillLineItem>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse `YYYY-MM-DD`, `YYYY/MM/DD` or an RFC 3339 timestamp
pub fn parse_bill_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_with_embedded_lines() {
        let json = r#"{
            "id": "b1",
            "vendor_id": "v1",
            "date": "2024-03-05",
            "items": [{"id": "l1", "bill_id": "b1", "item_id": "i1", "quantity": 2, "price": null}]
        }"#;
        let bill: Bill = serde_json::from_str(json).unwrap();
        assert_eq!(bill.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(bill.items.len(), 1);
        assert_eq!(bill.items[0].unit_price(), 0.0);
        assert_eq!(bill.display_date(), "05/03/2024");
    }

    #[test]
    fn test_bill_timestamp_date_and_null_items() {
        let json = r#"{"id":"b1","vendor_id":"v1","date":"2024-03-05T10:00:00+05:30","items":null}"#;
        let bill: Bill = serde_json::from_str(json).unwrap();
        assert_eq!(bill.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert!(bill.items.is_empty());
    }

    #[test]
    fn test_parse_bill_date_rejects_garbage() {
        assert!(parse_bill_date("05-03-2024x").is_none());
        assert_eq!(
            parse_bill_date("2024/12/31"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
    }
}
