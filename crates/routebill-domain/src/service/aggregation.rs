//! Bill aggregation and GST computation
//!
//! Per-bill figures use the unit price captured on each line. The item-wise
//! summary recomputes its tax columns from each item's *current* rate and GST
//! percentage, so it can differ from the sum of the per-bill figures once a
//! rate has changed. Nothing here rounds; formatting happens at display time.

use std::collections::HashMap;
use std::iter::Sum;
use std::ops::AddAssign;

use crate::model::{Bill, BillLineItem, Item};

/// Pre-tax, tax and post-tax amounts for a line or a total
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineAmounts {
    pub without_tax: f64,
    pub tax_amount: f64,
    pub with_tax: f64,
}

impl LineAmounts {
    pub fn compute(unit_price: f64, quantity: f64, gst_percentage: f64) -> Self {
        let without_tax = unit_price * quantity;
        let tax_amount = without_tax * (gst_percentage / 100.0);
        Self {
            without_tax,
            tax_amount,
            with_tax: without_tax + tax_amount,
        }
    }
}

impl AddAssign for LineAmounts {
    fn add_assign(&mut self, rhs: Self) {
        self.without_tax += rhs.without_tax;
        self.tax_amount += rhs.tax_amount;
        self.with_tax += rhs.with_tax;
    }
}

impl Sum for LineAmounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(LineAmounts::default(), |mut acc, x| {
            acc += x;
            acc
        })
    }
}

/// Item lookup by identifier
pub struct ItemLookup<'a> {
    by_id: HashMap<&'a str, &'a Item>,
}

impl<'a> ItemLookup<'a> {
    pub fn new(items: &'a [Item]) -> Self {
        Self {
            by_id: items.iter().map(|i| (i.id.as_str(), i)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Item> {
        self.by_id.get(id).copied()
    }

    /// GST percentage for an item, 0 when missing or unset
    pub fn gst_percentage(&self, id: &str) -> f64 {
        self.get(id).map(Item::gst_rate).unwrap_or(0.0)
    }
}

/// Computed figures for one bill line
#[derive(Debug, Clone)]
pub struct LineBreakdown<'a> {
    pub line: &'a BillLineItem,
    /// `None` when the item was deleted; render as N/A
    pub item: Option<&'a Item>,
    pub unit_price: f64,
    pub gst_percentage: f64,
    pub amounts: LineAmounts,
}

#[derive(Debug, Clone)]
pub struct BillBreakdown<'a> {
    pub bill: &'a Bill,
    pub lines: Vec<LineBreakdown<'a>>,
    pub totals: LineAmounts,
}

pub fn line_breakdown<'a>(line: &'a BillLineItem, lookup: &ItemLookup<'a>) -> LineBreakdown<'a> {
    let item = lookup.get(&line.item_id);
    let unit_price = line.unit_price();
    let gst_percentage = item.map(Item::gst_rate).unwrap_or(0.0);
    LineBreakdown {
        line,
        item,
        unit_price,
        gst_percentage,
        amounts: LineAmounts::compute(unit_price, f64::from(line.quantity), gst_percentage),
    }
}

pub fn bill_breakdown<'a>(bill: &'a Bill, lookup: &ItemLookup<'a>) -> BillBreakdown<'a> {
    let lines: Vec<_> = bill.items.iter().map(|l| line_breakdown(l, lookup)).collect();
    let totals = lines.iter().map(|l| l.amounts).sum();
    BillBreakdown { bill, lines, totals }
}

/// One row of the cross-bill item-wise summary
#[derive(Debug, Clone)]
pub struct ItemSummaryRow<'a> {
    pub item: &'a Item,
    pub quantity: u64,
    /// Σ captured price × quantity
    pub historical_amount: f64,
    pub current_rate: f64,
    pub gst_percentage: f64,
    /// Computed from `current_rate`, not from captured prices
    pub amounts: LineAmounts,
}

#[derive(Debug, Clone, Default)]
pub struct ItemWiseSummary<'a> {
    /// Rows in order of first appearance across the bills
    pub rows: Vec<ItemSummaryRow<'a>>,
    pub totals: LineAmounts,
}

impl ItemWiseSummary<'_> {
    /// Σ historical amounts; what was actually billed for the summarized items
    pub fn billed_total(&self) -> f64 {
        self.rows.iter().map(|r| r.historical_amount).sum()
    }
}

/// Group all bill lines by item id. Lines whose item no longer exists are skipped.
pub fn item_wise_summary<'a>(bills: &[Bill], lookup: &ItemLookup<'a>) -> ItemWiseSummary<'a> {
    let mut order: Vec<&'a Item> = Vec::new();
    let mut acc: HashMap<&'a str, (u64, f64)> = HashMap::new();

    for line in bills.iter().flat_map(|b| b.items.iter()) {
        let Some(item) = lookup.get(&line.item_id) else {
            continue;
        };
        let entry = acc.entry(item.id.as_str()).or_insert_with(|| {
            order.push(item);
            (0, 0.0)
        });
        entry.0 += u64::from(line.quantity);
        entry.1 += line.unit_price() * f64::from(line.quantity);
    }

    let rows: Vec<_> = order
        .into_iter()
        .map(|item| {
            let (quantity, historical_amount) = acc[item.id.as_str()];
            let gst_percentage = item.gst_rate();
            ItemSummaryRow {
                item,
                quantity,
                historical_amount,
                current_rate: item.rate,
                gst_percentage,
                amounts: LineAmounts::compute(item.rate, quantity as f64, gst_percentage),
            }
        })
        .collect();
    let totals = rows.iter().map(|r| r.amounts).sum();

    ItemWiseSummary { rows, totals }
}

/// Σ captured price × quantity over every line of every bill
pub fn grand_total(bills: &[Bill]) -> f64 {
    bills
        .iter()
        .flat_map(|b| b.items.iter())
        .map(|l| l.unit_price() * f64::from(l.quantity))
        .sum()
}
