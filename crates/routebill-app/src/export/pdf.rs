//! Bill and summary PDFs
//!
//! Layout is measured in millimetres from the top of an A4 page and flipped
//! to PDF coordinates when drawing. Tables continue on a new page, with the
//! header row repeated, once they reach the bottom margin.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use tracing::{info, warn};

use routebill_domain::model::Bill;
use routebill_domain::service::{
    bill_breakdown, item_wise_summary, ItemLookup, ItemWiseSummary, LineAmounts,
};
use routebill_types::{format_amount, format_percent, Error, Language, Result};

use super::{bill_file_name, summary_file_name, ExportContext};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const ROW_H: f32 = 7.0;
const BOTTOM_LIMIT: f32 = 280.0;
const CONTINUED_TOP: f32 = 20.0;
const COLUMNS: [f32; 7] = [10.0, 74.0, 96.0, 116.0, 134.0, 158.0, 182.0];

type Cells = [String; 7];

struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
}

impl Canvas {
    fn new(title: &str, ctx: &ExportContext) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let font = load_font(&doc, ctx)?;
        Ok(Self { doc, layer, font })
    }

    fn text(&self, text: &str, size: f32, x: f32, top: f32) {
        self.layer
            .use_text(text, size, Mm(x), Mm(PAGE_H - top), &self.font);
    }

    /// Centre on the page using an average glyph width of half an em
    fn centered(&self, text: &str, size: f32, top: f32) {
        let em_mm = size * 0.3528;
        let width = text.chars().count() as f32 * em_mm * 0.5;
        let x = ((PAGE_W - width) / 2.0).max(5.0);
        self.text(text, size, x, top);
    }

    fn rule(&self, top: f32) {
        let y = Mm(PAGE_H - top);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(10.0), y), false),
                (Point::new(Mm(PAGE_W - 10.0), y), false),
            ],
            is_closed: false,
        });
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut writer = BufWriter::new(Vec::<u8>::new());
        self.doc
            .save(&mut writer)
            .map_err(|e| Error::Pdf(e.to_string()))?;
        writer.into_inner().map_err(|e| Error::Pdf(e.to_string()))
    }
}

/// Gujarati documents embed the configured TTF; anything else is Helvetica
fn load_font(doc: &PdfDocumentReference, ctx: &ExportContext) -> Result<IndirectFontRef> {
    if ctx.language == Language::Gu {
        match ctx.gujarati_font {
            Some(path) => match File::open(path)
                .map_err(|e| e.to_string())
                .and_then(|f| doc.add_external_font(f).map_err(|e| e.to_string()))
            {
                Ok(font) => return Ok(font),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Error loading Gujarati font, using Helvetica")
                }
            },
            None => warn!("No Gujarati font configured, using Helvetica"),
        }
    }
    doc.add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Pdf(e.to_string()))
}

fn column_headers(lang: Language, quantity_label: (&str, &str)) -> Cells {
    [
        lang.pick("Item", "વસ્તુ").to_string(),
        lang.pick(quantity_label.0, quantity_label.1).to_string(),
        lang.pick("Rate", "ભાવ").to_string(),
        "GST %".to_string(),
        lang.pick("GST Amount", "GST રકમ").to_string(),
        lang.pick("Without GST", "GST વગર").to_string(),
        lang.pick("With GST", "GST સાથે").to_string(),
    ]
}

fn total_row(lang: Language, tax: f64, without: f64, with: f64) -> Cells {
    [
        lang.pick("Total", "કુલ").to_string(),
        String::new(),
        String::new(),
        String::new(),
        format_amount(tax),
        format_amount(without),
        format_amount(with),
    ]
}

fn draw_row(canvas: &Canvas, cells: &Cells, size: f32, top: f32) {
    for (x, cell) in COLUMNS.iter().zip(cells.iter()) {
        if !cell.is_empty() {
            canvas.text(cell, size, *x, top);
        }
    }
}

/// Draw header, rows and total; returns the y below the table
fn draw_table(canvas: &mut Canvas, start: f32, headers: &Cells, rows: &[Cells], footer: &Cells) -> f32 {
    let mut y = start;
    draw_row(canvas, headers, 10.0, y);
    canvas.rule(y + 2.0);
    y += ROW_H;

    for row in rows {
        if y > BOTTOM_LIMIT {
            canvas.new_page();
            y = CONTINUED_TOP;
            draw_row(canvas, headers, 10.0, y);
            canvas.rule(y + 2.0);
            y += ROW_H;
        }
        draw_row(canvas, row, 9.0, y);
        y += ROW_H;
    }

    if y > BOTTOM_LIMIT {
        canvas.new_page();
        y = CONTINUED_TOP;
    }
    canvas.rule(y - ROW_H + 2.0);
    draw_row(canvas, footer, 10.0, y);
    y + ROW_H
}

fn draw_letterhead(canvas: &Canvas, ctx: &ExportContext) {
    let business = ctx.business;
    canvas.centered(&business.name, 16.0, 15.0);
    canvas.centered(&business.address, 10.0, 22.0);
    canvas.centered(&business.address2, 10.0, 27.0);
    canvas.centered(&business.gstin, 10.0, 32.0);
    canvas.centered(&business.contact, 10.0, 37.0);
    canvas.rule(45.0);
}

/// One bill on the current page: letterhead, vendor block, line table
fn draw_bill(canvas: &mut Canvas, ctx: &ExportContext, lookup: &ItemLookup, bill: &Bill) {
    let lang = ctx.language;
    draw_letterhead(canvas, ctx);

    let vendor = ctx.vendor(&bill.vendor_id);
    let name = vendor.map(|v| v.name.as_str()).unwrap_or("");
    let address = vendor.map(|v| v.address_or_empty()).unwrap_or("");
    let contact = vendor.map(|v| v.contact_or_empty()).unwrap_or("");
    canvas.text(&format!("{}: {}", lang.pick("Vendor Name", "વેન્ડરનું નામ"), name), 12.0, 10.0, 55.0);
    canvas.text(&format!("{}: {}", lang.pick("Address", "સરનામું"), address), 12.0, 10.0, 62.0);
    canvas.text(&format!("{}: {}", lang.pick("Contact", "સંપર્ક"), contact), 12.0, 10.0, 69.0);
    canvas.text(
        &format!("{}: {}", lang.pick("Bill Date", "બિલની તારીખ"), bill.display_date()),
        12.0,
        150.0,
        55.0,
    );

    let breakdown = bill_breakdown(bill, lookup);
    let rows: Vec<Cells> = breakdown
        .lines
        .iter()
        .map(|l| {
            [
                ctx.item_name(l.item),
                l.line.quantity.to_string(),
                format_amount(l.unit_price),
                format_percent(l.gst_percentage),
                format_amount(l.amounts.tax_amount),
                format_amount(l.amounts.without_tax),
                format_amount(l.amounts.with_tax),
            ]
        })
        .collect();
    let totals = breakdown.totals;
    draw_table(
        canvas,
        75.0,
        &column_headers(lang, ("Quantity", "જથ્થો")),
        &rows,
        &total_row(lang, totals.tax_amount, totals.without_tax, totals.with_tax),
    );
}

/// PDF bytes for a single bill
pub fn render_bill_pdf(ctx: &ExportContext, bill: &Bill) -> Result<Vec<u8>> {
    let lookup = ItemLookup::new(ctx.items);
    let mut canvas = Canvas::new(ctx.language.pick("Bill", "બિલ"), ctx)?;
    draw_bill(&mut canvas, ctx, &lookup, bill);
    canvas.finish()
}

/// Item-wise summary rows and footer, all figures at each item's current rate
fn summary_cells(ctx: &ExportContext, summary: &ItemWiseSummary) -> (Vec<Cells>, Cells) {
    let rows = summary
        .rows
        .iter()
        .map(|r| {
            [
                ctx.item_name(Some(r.item)),
                r.quantity.to_string(),
                format_amount(r.current_rate),
                format_percent(r.gst_percentage),
                format_amount(r.amounts.tax_amount),
                format_amount(r.amounts.without_tax),
                format_amount(r.amounts.with_tax),
            ]
        })
        .collect();
    let LineAmounts {
        without_tax,
        tax_amount,
        with_tax,
    } = summary.totals;
    let footer = total_row(ctx.language, tax_amount, without_tax, with_tax);
    (rows, footer)
}

/// PDF bytes for the item-wise summary followed by one page per bill
///
/// The summary table is priced at current rates. The amount actually billed
/// (captured prices) is printed on its own line below it.
pub fn render_summary_pdf(ctx: &ExportContext, bills: &[Bill]) -> Result<Vec<u8>> {
    let lang = ctx.language;
    let lookup = ItemLookup::new(ctx.items);
    let mut canvas = Canvas::new(lang.pick("Summary", "સારાંશ"), ctx)?;

    draw_letterhead(&canvas, ctx);
    canvas.text(lang.pick("Overall Summary", "એકંદરે સારાંશ"), 14.0, 10.0, 55.0);

    let summary = item_wise_summary(bills, &lookup);
    let (rows, footer) = summary_cells(ctx, &summary);
    let mut y = draw_table(
        &mut canvas,
        62.0,
        &column_headers(lang, ("Total Quantity", "કુલ જથ્થો")),
        &rows,
        &footer,
    );

    if y > BOTTOM_LIMIT {
        canvas.new_page();
        y = CONTINUED_TOP;
    }
    canvas.text(
        &format!(
            "{}: {}",
            lang.pick("Amount billed", "બિલ કરેલી રકમ"),
            format_amount(summary.billed_total())
        ),
        11.0,
        10.0,
        y + 3.0,
    );

    for bill in bills {
        canvas.new_page();
        draw_bill(&mut canvas, ctx, &lookup, bill);
    }
    canvas.finish()
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "PDF written");
    Ok(path)
}

/// Write `bill_<vendor>_<date>_<lang>.pdf` into `dir`
pub fn write_bill_pdf(ctx: &ExportContext, bill: &Bill, dir: &Path) -> Result<PathBuf> {
    let vendor_name = ctx
        .vendor(&bill.vendor_id)
        .map(|v| v.name.as_str())
        .unwrap_or("N/A");
    let bytes = render_bill_pdf(ctx, bill)?;
    write_file(dir, &bill_file_name(vendor_name, bill.date, ctx.language), &bytes)
}

/// Write `summary_<lang>.pdf` into `dir`
pub fn write_summary_pdf(ctx: &ExportContext, bills: &[Bill], dir: &Path) -> Result<PathBuf> {
    let bytes = render_summary_pdf(ctx, bills)?;
    write_file(dir, &summary_file_name(ctx.language), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use routebill_domain::model::{BillLineItem, Category, Item};

    use crate::config::BusinessProfiles;

    fn amount(cell: &str) -> f64 {
        cell.parse().unwrap()
    }

    #[test]
    fn test_summary_rows_add_up_at_current_rate() {
        // billed at 10 twice, rate since raised to 12
        let items = vec![Item {
            id: "i1".to_string(),
            name_en: "Papad".to_string(),
            name_gu: "પાપડ".to_string(),
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
        let profiles = BusinessProfiles::default();
        let ctx = ExportContext {
            items: &items,
            vendors: &[],
            business: profiles.for_language(Language::En),
            language: Language::En,
            gujarati_font: None,
        };

        let lookup = ItemLookup::new(&items);
        let summary = item_wise_summary(&bills, &lookup);
        let (rows, footer) = summary_cells(&ctx, &summary);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], "4");
        assert_eq!(rows[0][2], "12.00");
        assert_eq!(rows[0][4], "2.40");
        assert_eq!(rows[0][5], "48.00");
        assert_eq!(rows[0][6], "50.40");
        for cells in rows.iter().chain(std::iter::once(&footer)) {
            let (tax, without, with) = (amount(&cells[4]), amount(&cells[5]), amount(&cells[6]));
            assert!((without + tax - with).abs() < 0.015, "{:?}", cells);
        }
        assert_eq!(format_amount(summary.billed_total()), "40.00");

        let bytes = render_summary_pdf(&ctx, &bills).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
