//! Hosted store over a PostgREST-style HTTP API
//!
//! Tables are addressed as `{base}/rest/v1/{table}`, filters go in the query
//! string (`id=eq.<id>`), and writes ask for the stored rows back.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use routebill_domain::model::{
    Bill, Category, Item, NewBill, NewBillItem, NewItem, NewRoute, NewVendor, Route, Vendor,
};
use routebill_domain::repository::{
    BillRepository, ItemRepository, RouteRepository, VendorRepository,
};
use routebill_types::{Error, Result, StoreError};

/// Postgres error code for a foreign key violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Turn a failed response body into a store error
///
/// Foreign key violations on delete become `Referenced`; on insert or
/// update they become `MissingReference`. Anything else is `Remote`.
pub fn classify_error_body(status: u16, body: &str, table: &str, id: &str) -> StoreError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code.clone());
    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| body.trim().to_string());
    let details = parsed.as_ref().and_then(|b| b.details.clone()).unwrap_or_default();

    let lower = message.to_lowercase();
    let is_fk = code.as_deref() == Some(FOREIGN_KEY_VIOLATION) || lower.contains("foreign key constraint");
    if is_fk {
        if lower.contains("update or delete") {
            return StoreError::Referenced {
                table: table.to_string(),
                id: id.to_string(),
            };
        }
        return StoreError::MissingReference {
            table: table.to_string(),
            column: fk_column(&details).unwrap_or_else(|| "unknown".to_string()),
            id: id.to_string(),
        };
    }

    StoreError::Remote {
        status,
        code,
        message,
    }
}

/// Pull the column out of `Key (vendor_id)=(...) is not present ...`
fn fk_column(details: &str) -> Option<String> {
    let start = details.find("Key (")? + "Key (".len();
    let end = details[start..].find(')')? + start;
    Some(details[start..end].to_string())
}

#[derive(Serialize)]
struct BillInsert<'a> {
    vendor_id: &'a str,
    date: String,
}

#[derive(Deserialize)]
struct BillRowOut {
    id: String,
}

/// HTTP implementation of the repository traits
pub struct RestStore {
    client: Client,
    base_url: String,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| StoreError::Transport(format!("invalid API key header: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| StoreError::Transport(format!("invalid API key header: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(transport)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn send(&self, request: RequestBuilder, table: &str, id: &str) -> Result<Response> {
        let response = request.send().map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        let err = classify_error_body(status.as_u16(), &body, table, id);
        warn!(table, status = status.as_u16(), error = %err, "Store request failed");
        Err(err.into())
    }

    fn fetch<T: DeserializeOwned>(&self, table: &str, select: &str) -> Result<Vec<T>> {
        debug!(table, "GET");
        let request = self
            .client
            .get(self.table_url(table))
            .query(&[("select", select)]);
        decode(self.send(request, table, "")?)
    }

    fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(&self, table: &str, body: &B) -> Result<Vec<T>> {
        debug!(table, "POST");
        let request = self.client.post(self.table_url(table)).json(body);
        decode(self.send(request, table, "")?)
    }

    fn patch_by_id<T: DeserializeOwned>(&self, table: &str, id: &str, body: serde_json::Value) -> Result<T> {
        debug!(table, id, "PATCH");
        let request = self
            .client
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .json(&body);
        let rows: Vec<T> = decode(self.send(request, table, id)?)?;
        rows.into_iter().next().ok_or_else(|| {
            StoreError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            }
            .into()
        })
    }

    fn delete_where(&self, table: &str, column: &str, filter: String, id: &str) -> Result<()> {
        debug!(table, column, "DELETE");
        let request = self
            .client
            .delete(self.table_url(table))
            .query(&[(column, filter)]);
        self.send(request, table, id)?;
        Ok(())
    }
}

fn transport(err: reqwest::Error) -> Error {
    StoreError::Transport(err.to_string()).into()
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<Vec<T>> {
    let text = response.text().map_err(transport)?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&text)?)
}

/// Serialize a record for PATCH without its primary key
fn without_id<T: Serialize>(record: &T) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(record)?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("id");
    }
    Ok(value)
}

impl RouteRepository for RestStore {
    fn list_routes(&self) -> Result<Vec<Route>> {
        self.fetch("routes", "*")
    }

    fn create_routes(&self, routes: &[NewRoute]) -> Result<Vec<Route>> {
        self.insert("routes", routes)
    }

    fn update_route(&self, route: &Route) -> Result<Route> {
        self.patch_by_id("routes", &route.id, without_id(route)?)
    }

    fn delete_route(&self, id: &str) -> Result<()> {
        self.delete_where("routes", "id", format!("eq.{}", id), id)
    }
}

impl VendorRepository for RestStore {
    fn list_vendors(&self) -> Result<Vec<Vendor>> {
        self.fetch("vendors", "*")
    }

    fn create_vendors(&self, vendors: &[NewVendor]) -> Result<Vec<Vendor>> {
        let rows: Vec<NewVendor> = vendors.iter().cloned().map(NewVendor::normalized).collect();
        self.insert("vendors", &rows)
    }

    fn update_vendor(&self, vendor: &Vendor) -> Result<Vendor> {
        self.patch_by_id("vendors", &vendor.id, without_id(vendor)?)
    }

    fn delete_vendor(&self, id: &str) -> Result<()> {
        self.delete_where("vendors", "id", format!("eq.{}", id), id)
    }
}

impl ItemRepository for RestStore {
    fn list_items(&self) -> Result<Vec<Item>> {
        self.fetch("items", "*")
    }

    fn create_items(&self, items: &[NewItem]) -> Result<Vec<Item>> {
        for item in items {
            item.validate()?;
        }
        self.insert("items", items)
    }

    fn update_item(&self, item: &Item) -> Result<Item> {
        self.patch_by_id("items", &item.id, without_id(item)?)
    }

    fn delete_item(&self, id: &str) -> Result<()> {
        self.delete_where("items", "id", format!("eq.{}", id), id)
    }

    fn bulk_update_rate(&self, category: Category, rate: f64) -> Result<usize> {
        debug!(category = %category, rate, "PATCH items by category");
        let request = self
            .client
            .patch(self.table_url("items"))
            .query(&[("category", format!("eq.{}", category.as_str()))])
            .json(&json!({ "rate": rate }));
        let rows: Vec<Item> = decode(self.send(request, "items", "")?)?;
        Ok(rows.len())
    }
}

impl BillRepository for RestStore {
    fn list_bills(&self) -> Result<Vec<Bill>> {
        self.fetch("bills", "*,items:bill_items(*)")
    }

    /// Inserts the bill rows, then their lines, then reads them back
    fn create_bills(&self, bills: &[NewBill]) -> Result<Vec<Bill>> {
        let rows: Vec<BillInsert> = bills
            .iter()
            .map(|b| BillInsert {
                vendor_id: &b.vendor_id,
                date: b.date.format("%Y-%m-%d").to_string(),
            })
            .collect();
        let created: Vec<BillRowOut> = self.insert("bills", &rows)?;
        if created.len() != bills.len() {
            return Err(StoreError::Invalid {
                table: "bills".to_string(),
                message: format!("expected {} bills back, got {}", bills.len(), created.len()),
            }
            .into());
        }

        let lines: Vec<NewBillItem> = created
            .iter()
            .zip(bills)
            .flat_map(|(row, bill)| {
                bill.items.iter().map(move |line| NewBillItem {
                    bill_id: row.id.clone(),
                    item_id: line.item_id.clone(),
                    quantity: line.quantity,
                    price: line.price,
                })
            })
            .collect();
        if !lines.is_empty() {
            self.create_bill_items(&lines)?;
        }

        let ids: Vec<&str> = created.iter().map(|r| r.id.as_str()).collect();
        let request = self
            .client
            .get(self.table_url("bills"))
            .query(&[
                ("select", "*,items:bill_items(*)".to_string()),
                ("id", format!("in.({})", ids.join(","))),
            ]);
        decode(self.send(request, "bills", "")?)
    }

    fn create_bill_items(&self, lines: &[NewBillItem]) -> Result<usize> {
        let created: Vec<serde_json::Value> = self.insert("bill_items", lines)?;
        Ok(created.len())
    }

    fn delete_bill(&self, id: &str) -> Result<()> {
        self.delete_where("bill_items", "bill_id", format!("eq.{}", id), id)?;
        self.delete_where("bills", "id", format!("eq.{}", id), id)
    }

    fn delete_bill_item(&self, id: &str) -> Result<()> {
        self.delete_where("bill_items", "id", format!("eq.{}", id), id)
    }

    fn delete_all_bills(&self) -> Result<()> {
        self.delete_where("bill_items", "id", "not.is.null".to_string(), "")?;
        self.delete_where("bills", "id", "not.is.null".to_string(), "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_violation_is_referenced() {
        let body = r#"{"code":"23503","details":"Key (id)=(i1) is still referenced from table \"bill_items\".","message":"update or delete on table \"items\" violates foreign key constraint \"bill_items_item_id_fkey\" on table \"bill_items\""}"#;
        let err = classify_error_body(409, body, "items", "i1");
        assert!(matches!(err, StoreError::Referenced { ref table, ref id } if table == "items" && id == "i1"));
    }

    #[test]
    fn test_insert_violation_names_column() {
        let body = r#"{"code":"23503","details":"Key (vendor_id)=(v9) is not present in table \"vendors\".","message":"insert or update on table \"bills\" violates foreign key constraint \"bills_vendor_id_fkey\""}"#;
        let err = classify_error_body(409, body, "bills", "");
        assert!(matches!(err, StoreError::MissingReference { ref column, .. } if column == "vendor_id"));
    }

    #[test]
    fn test_message_text_alone_detects_foreign_key() {
        let body = r#"{"message":"update or delete on table \"vendors\" violates foreign key constraint"}"#;
        let err = classify_error_body(400, body, "vendors", "v1");
        assert!(matches!(err, StoreError::Referenced { .. }));
    }

    #[test]
    fn test_other_failures_are_remote() {
        let err = classify_error_body(500, "gateway exploded", "routes", "");
        match err {
            StoreError::Remote { status, code, message } => {
                assert_eq!(status, 500);
                assert!(code.is_none());
                assert_eq!(message, "gateway exploded");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_without_id_strips_primary_key() {
        let route = Route {
            id: "r1".to_string(),
            name: "North".to_string(),
        };
        let value = without_id(&route).unwrap();
        assert_eq!(value, json!({ "name": "North" }));
    }
}
