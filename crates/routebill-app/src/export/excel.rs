//! Excel export of the bill summary

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use routebill_domain::model::Bill;
use routebill_domain::service::{
    bill_breakdown, grand_total, item_wise_summary, ItemLookup, ItemSummaryRow, LineAmounts,
};
use routebill_types::{Error, Result};

use super::ExportContext;

/// Write a workbook with an item-wise summary sheet and a sheet of every bill line
pub fn export_summary_workbook(ctx: &ExportContext, bills: &[Bill], output_path: &Path) -> Result<()> {
    let lookup = ItemLookup::new(ctx.items);
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, ctx, &lookup, bills)?;

    let lines_sheet = workbook.add_worksheet();
    write_lines_sheet(lines_sheet, ctx, &lookup, bills)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_headers(sheet: &mut Worksheet, row: u32, headers: &[&str], format: &Format) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(row, col as u16, *header, format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }
    Ok(())
}

/// Numeric columns of a summary row: quantity, rate, GST %, GST amount,
/// without GST, with GST, amount billed
fn summary_numbers(r: &ItemSummaryRow) -> [f64; 7] {
    [
        r.quantity as f64,
        r.current_rate,
        r.gst_percentage,
        r.amounts.tax_amount,
        r.amounts.without_tax,
        r.amounts.with_tax,
        r.historical_amount,
    ]
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    ctx: &ExportContext,
    lookup: &ItemLookup,
    bills: &[Bill],
) -> Result<()> {
    let lang = ctx.language;
    sheet
        .set_name("Summary")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, &ctx.business.name, &header_format)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .write_string(2, 0, lang.pick("Total Amount", "કુલ રકમ"))
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .write_number(2, 1, grand_total(bills))
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .write_string(3, 0, lang.pick("Bills", "બિલ"))
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .write_number(3, 1, bills.len() as f64)
        .map_err(|e| Error::Excel(e.to_string()))?;

    write_headers(
        sheet,
        5,
        &[
            lang.pick("Item", "વસ્તુ"),
            lang.pick("Total Quantity", "કુલ જથ્થો"),
            lang.pick("Rate", "ભાવ"),
            "GST %",
            lang.pick("GST Amount", "GST રકમ"),
            lang.pick("Without GST", "GST વગર"),
            lang.pick("With GST", "GST સાથે"),
            lang.pick("Amount Billed", "બિલ કરેલી રકમ"),
        ],
        &header_format,
    )?;

    let summary = item_wise_summary(bills, lookup);
    let mut row = 6;
    for r in &summary.rows {
        sheet
            .write_string(row, 0, ctx.item_name(Some(r.item)))
            .map_err(|e| Error::Excel(e.to_string()))?;
        for (offset, value) in summary_numbers(r).iter().enumerate() {
            sheet
                .write_number(row, offset as u16 + 1, *value)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        row += 1;
    }

    let LineAmounts {
        without_tax,
        tax_amount,
        with_tax,
    } = summary.totals;
    sheet
        .write_string_with_format(row, 0, lang.pick("Total", "કુલ"), &header_format)
        .map_err(|e| Error::Excel(e.to_string()))?;
    for (col, value) in [
        (4, tax_amount),
        (5, without_tax),
        (6, with_tax),
        (7, summary.billed_total()),
    ] {
        sheet
            .write_number_with_format(row, col, value, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    Ok(())
}

fn write_lines_sheet(
    sheet: &mut Worksheet,
    ctx: &ExportContext,
    lookup: &ItemLookup,
    bills: &[Bill],
) -> Result<()> {
    let lang = ctx.language;
    sheet
        .set_name("Bill Lines")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();
    write_headers(
        sheet,
        0,
        &[
            lang.pick("Vendor", "વેન્ડર"),
            lang.pick("Date", "તારીખ"),
            lang.pick("Item", "વસ્તુ"),
            lang.pick("Quantity", "જથ્થો"),
            lang.pick("Rate", "ભાવ"),
            "GST %",
            lang.pick("GST Amount", "GST રકમ"),
            lang.pick("Without GST", "GST વગર"),
            lang.pick("With GST", "GST સાથે"),
        ],
        &header_format,
    )?;

    let mut row = 1;
    for bill in bills {
        let vendor = ctx
            .vendor(&bill.vendor_id)
            .map(|v| v.name.as_str())
            .unwrap_or("N/A");
        let date = bill.display_date();
        for line in bill_breakdown(bill, lookup).lines {
            sheet
                .write_string(row, 0, vendor)
                .map_err(|e| Error::Excel(e.to_string()))?;
            sheet
                .write_string(row, 1, &date)
                .map_err(|e| Error::Excel(e.to_string()))?;
            sheet
                .write_string(row, 2, ctx.item_name(line.item))
                .map_err(|e| Error::Excel(e.to_string()))?;
            let numbers = [
                f64::from(line.line.quantity),
                line.unit_price,
                line.gst_percentage,
                line.amounts.tax_amount,
                line.amounts.without_tax,
                line.amounts.with_tax,
            ];
            for (offset, value) in numbers.iter().enumerate() {
                sheet
                    .write_number(row, offset as u16 + 3, *value)
                    .map_err(|e| Error::Excel(e.to_string()))?;
            }
            row += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use routebill_domain::model::{BillLineItem, Category, Item};

    #[test]
    fn test_summary_numbers_without_plus_gst_equals_with() {
        let items = vec![Item {
            id: "i1".to_string(),
            name_en: "Papad".to_string(),
            name_gu: String::new(),
            rate: 12.0,
            has_gst: true,
            gst_percentage: Some(5.0),
            category: Category::Fryums,
        }];
        let bills: Vec<Bill> = ["b1", "b2"]
            .iter()
            .map(|id| Bill {
                id: id.to_string(),
                vendor_id: "v1".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                items: vec![BillLineItem {
                    id: format!("{}-l", id),
                    bill_id: id.to_string(),
                    item_id: "i1".to_string(),
                    quantity: 2,
                    price: Some(10.0),
                }],
            })
            .collect();

        let lookup = ItemLookup::new(&items);
        let summary = item_wise_summary(&bills, &lookup);
        let [qty, rate, gst, tax, without, with, billed] = summary_numbers(&summary.rows[0]);
        assert_eq!((qty, rate, gst), (4.0, 12.0, 5.0));
        assert!((without - 48.0).abs() < 1e-9);
        assert!((tax - 2.4).abs() < 1e-9);
        assert!((with - 50.4).abs() < 1e-9);
        assert!((without + tax - with).abs() < 1e-9);
        assert!((billed - 40.0).abs() < 1e-9);
    }
}
