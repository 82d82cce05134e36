//! Summary tab: totals, item-wise rollup, every bill, and document export

use std::path::PathBuf;

use eframe::egui;
use tracing::info;

use routebill_app::config::Config;
use routebill_app::export::{
    export_summary_workbook, write_bill_pdf, write_summary_pdf, ExportContext,
};
use routebill_domain::model::Bill;
use routebill_domain::service::{bill_breakdown, grand_total, item_wise_summary, ItemLookup};
use routebill_types::{format_amount, format_percent, Language, Result};

use crate::session::Session;

/// Destructive actions wait for a second click
#[derive(Debug, Clone, PartialEq)]
enum Confirm {
    DeleteBill(String),
    DeleteAll,
}

#[derive(Debug, Clone)]
enum Action {
    DeleteLine(String),
    AskDeleteBill(String),
    BillPdf(String, Language),
    SummaryPdf(Language),
    Workbook,
    AskDeleteAll,
}

pub struct SummaryPanel {
    /// Overrides the configured export directory
    export_dir: Option<PathBuf>,
    pending_confirm: Option<Confirm>,
    status_message: Option<(String, bool)>,
}

impl Default for SummaryPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryPanel {
    pub fn new() -> Self {
        Self {
            export_dir: None,
            pending_confirm: None,
            status_message: None,
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, session: &mut Session, config: &Config) {
        let lang = config.language;
        ui.heading(lang.pick("Summary", "સારાંશ"));
        ui.add_space(10.0);

        let mut action: Option<Action> = None;

        egui::ScrollArea::vertical()
            .id_salt("summary_scroll")
            .show(ui, |ui| {
                self.render_toolbar(ui, session, config, &mut action);
                ui.add_space(10.0);
                self.render_confirm(ui, session, lang);

                let lookup = ItemLookup::new(session.items.items());
                let bills = session.bills.bills();
                if bills.is_empty() {
                    ui.label(lang.pick("No bills yet", "હજુ કોઈ બિલ નથી"));
                    return;
                }

                render_item_summary(ui, bills, &lookup, lang);
                ui.add_space(14.0);
                ui.separator();

                for bill in bills {
                    render_bill(ui, session, bill, &lookup, lang, &mut action);
                    ui.add_space(10.0);
                }
            });

        if let Some(action) = action {
            self.handle(action, session, config);
        }

        if let Some((msg, is_error)) = &self.status_message {
            ui.add_space(10.0);
            let color = if *is_error {
                egui::Color32::LIGHT_RED
            } else {
                egui::Color32::LIGHT_GREEN
            };
            ui.label(egui::RichText::new(msg).color(color));
        }
    }

    fn render_toolbar(
        &mut self,
        ui: &mut egui::Ui,
        session: &Session,
        config: &Config,
        action: &mut Option<Action>,
    ) {
        let lang = config.language;
        let has_bills = !session.bills.bills().is_empty();

        egui::Frame::new()
            .fill(egui::Color32::from_gray(30))
            .inner_margin(10.0)
            .corner_radius(4.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(lang.pick("Total Amount:", "કુલ રકમ:")).strong());
                    ui.label(
                        egui::RichText::new(format_amount(grand_total(session.bills.bills())))
                            .strong()
                            .size(18.0),
                    );
                    ui.add_space(20.0);
                    ui.label(format!(
                        "{} {}",
                        session.bills.bills().len(),
                        lang.pick("bills", "બિલ")
                    ));
                });
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.add_enabled_ui(has_bills, |ui| {
                        if ui.button("Summary PDF (EN)").clicked() {
                            *action = Some(Action::SummaryPdf(Language::En));
                        }
                        if ui.button("સારાંશ PDF (GU)").clicked() {
                            *action = Some(Action::SummaryPdf(Language::Gu));
                        }
                        if ui.button(lang.pick("Excel", "એક્સેલ")).clicked() {
                            *action = Some(Action::Workbook);
                        }
                        if ui
                            .button(
                                egui::RichText::new(lang.pick("Delete All Bills", "બધા બિલ કાઢી નાખો"))
                                    .color(egui::Color32::LIGHT_RED),
                            )
                            .clicked()
                        {
                            *action = Some(Action::AskDeleteAll);
                        }
                    });
                });
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.label(lang.pick("Save to:", "અહીં સાચવો:"));
                    let dir = self
                        .export_dir
                        .clone()
                        .or_else(|| config.export_dir().ok())
                        .map(|d| d.display().to_string())
                        .unwrap_or_default();
                    ui.monospace(dir);
                    if ui.small_button(lang.pick("Change", "બદલો")).clicked() {
                        if let Some(folder) = rfd::FileDialog::new().pick_folder() {
                            self.export_dir = Some(folder);
                        }
                    }
                });
            });
    }

    fn render_confirm(&mut self, ui: &mut egui::Ui, session: &mut Session, lang: Language) {
        let Some(confirm) = self.pending_confirm.clone() else {
            return;
        };
        let question = match &confirm {
            Confirm::DeleteBill(_) => lang.pick("Delete this bill?", "આ બિલ કાઢી નાખવું છે?"),
            Confirm::DeleteAll => lang.pick(
                "Delete ALL bills? This cannot be undone.",
                "બધા બિલ કાઢી નાખવા છે? આ પાછું નહીં આવે.",
            ),
        };

        let mut answer: Option<bool> = None;
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(question).color(egui::Color32::YELLOW));
            if ui.button(lang.pick("Yes", "હા")).clicked() {
                answer = Some(true);
            }
            if ui.button(lang.pick("No", "ના")).clicked() {
                answer = Some(false);
            }
        });

        match answer {
            Some(true) => {
                self.pending_confirm = None;
                let store = session.store.as_ref();
                let result = match &confirm {
                    Confirm::DeleteBill(id) => session.bills.delete_bill(store, id),
                    Confirm::DeleteAll => session.bills.delete_all(store),
                };
                self.status_message = Some(match result {
                    Ok(()) => (lang.pick("Deleted", "કાઢી નાખ્યું").to_string(), false),
                    Err(e) => (e.user_message(), true),
                });
            }
            Some(false) => self.pending_confirm = None,
            None => {}
        }
    }

    fn handle(&mut self, action: Action, session: &mut Session, config: &Config) {
        let lang = config.language;
        match action {
            Action::AskDeleteBill(id) => self.pending_confirm = Some(Confirm::DeleteBill(id)),
            Action::AskDeleteAll => self.pending_confirm = Some(Confirm::DeleteAll),
            Action::DeleteLine(line_id) => {
                if let Err(e) = session.bills.delete_line(session.store.as_ref(), &line_id) {
                    self.status_message = Some((e.user_message(), true));
                }
            }
            Action::BillPdf(bill_id, doc_lang) => {
                let Some(bill) = session.bills.bills().iter().find(|b| b.id == bill_id) else {
                    return;
                };
                let result = self.output_dir(config).and_then(|dir| {
                    let ctx = export_context(session, config, doc_lang);
                    write_bill_pdf(&ctx, bill, &dir)
                });
                self.report_export(result, lang);
            }
            Action::SummaryPdf(doc_lang) => {
                let result = self.output_dir(config).and_then(|dir| {
                    let ctx = export_context(session, config, doc_lang);
                    write_summary_pdf(&ctx, session.bills.bills(), &dir)
                });
                self.report_export(result, lang);
            }
            Action::Workbook => {
                let result = self.output_dir(config).and_then(|dir| {
                    let ctx = export_context(session, config, lang);
                    let path = dir.join(format!("summary_{}.xlsx", lang.code()));
                    export_summary_workbook(&ctx, session.bills.bills(), &path)?;
                    Ok(path)
                });
                self.report_export(result, lang);
            }
        }
    }

    fn output_dir(&self, config: &Config) -> Result<PathBuf> {
        match &self.export_dir {
            Some(dir) => Ok(dir.clone()),
            None => config.export_dir(),
        }
    }

    fn report_export(&mut self, result: Result<PathBuf>, lang: Language) {
        self.status_message = Some(match result {
            Ok(path) => {
                info!(path = %path.display(), "Exported document");
                (
                    format!("{}: {}", lang.pick("Saved", "સાચવ્યું"), path.display()),
                    false,
                )
            }
            Err(e) => (e.user_message(), true),
        });
    }
}

fn export_context<'a>(session: &'a Session, config: &'a Config, language: Language) -> ExportContext<'a> {
    ExportContext {
        items: session.items.items(),
        vendors: session.directory.vendors(),
        business: config.business.for_language(language),
        language,
        gujarati_font: config.gujarati_font.as_deref(),
    }
}

fn header_cells(ui: &mut egui::Ui, headers: &[&str]) {
    for header in headers {
        ui.label(egui::RichText::new(*header).strong());
    }
    ui.end_row();
}

fn render_item_summary(ui: &mut egui::Ui, bills: &[Bill], lookup: &ItemLookup, lang: Language) {
    let summary = item_wise_summary(bills, lookup);
    ui.strong(lang.pick("Item-wise Summary", "વસ્તુ પ્રમાણે સારાંશ"));
    ui.add_space(6.0);

    egui::Grid::new("item_summary_grid")
        .num_columns(8)
        .spacing([14.0, 4.0])
        .striped(true)
        .show(ui, |ui| {
            header_cells(
                ui,
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
            );
            for row in &summary.rows {
                ui.label(row.item.display_name(lang));
                ui.label(row.quantity.to_string());
                ui.label(format_amount(row.current_rate));
                ui.label(format_percent(row.gst_percentage));
                ui.label(format_amount(row.amounts.tax_amount));
                ui.label(format_amount(row.amounts.without_tax));
                ui.label(format_amount(row.amounts.with_tax));
                ui.label(format_amount(row.historical_amount));
                ui.end_row();
            }
            ui.label(egui::RichText::new(lang.pick("Total", "કુલ")).strong());
            ui.label("");
            ui.label("");
            ui.label("");
            ui.label(format_amount(summary.totals.tax_amount));
            ui.label(format_amount(summary.totals.without_tax));
            ui.label(egui::RichText::new(format_amount(summary.totals.with_tax)).strong());
            ui.label(format_amount(summary.billed_total()));
            ui.end_row();
        });
}

fn render_bill(
    ui: &mut egui::Ui,
    session: &Session,
    bill: &Bill,
    lookup: &ItemLookup,
    lang: Language,
    action: &mut Option<Action>,
) {
    let vendor = session.directory.vendors().iter().find(|v| v.id == bill.vendor_id);
    let vendor_name = vendor.map(|v| v.name.as_str()).unwrap_or("N/A");
    let route_name = vendor
        .and_then(|v| session.directory.route_name(&v.route_id))
        .unwrap_or("-");
    let breakdown = bill_breakdown(bill, lookup);

    egui::Frame::new()
        .fill(egui::Color32::from_gray(30))
        .inner_margin(10.0)
        .corner_radius(4.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(vendor_name).strong().size(15.0));
                ui.label(format!("({})", route_name));
                ui.label(bill.display_date());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button(lang.pick("Delete Bill", "બિલ કાઢી નાખો")).clicked() {
                        *action = Some(Action::AskDeleteBill(bill.id.clone()));
                    }
                    if ui.small_button("PDF (GU)").clicked() {
                        *action = Some(Action::BillPdf(bill.id.clone(), Language::Gu));
                    }
                    if ui.small_button("PDF (EN)").clicked() {
                        *action = Some(Action::BillPdf(bill.id.clone(), Language::En));
                    }
                });
            });
            ui.add_space(6.0);

            egui::Grid::new(("bill_grid", &bill.id))
                .num_columns(8)
                .spacing([14.0, 4.0])
                .striped(true)
                .show(ui, |ui| {
                    header_cells(
                        ui,
                        &[
                            lang.pick("Item", "વસ્તુ"),
                            lang.pick("Quantity", "જથ્થો"),
                            lang.pick("Rate", "ભાવ"),
                            "GST %",
                            lang.pick("GST Amount", "GST રકમ"),
                            lang.pick("Without GST", "GST વગર"),
                            lang.pick("With GST", "GST સાથે"),
                            "",
                        ],
                    );
                    for line in &breakdown.lines {
                        let name = line.item.map(|i| i.display_name(lang)).unwrap_or("N/A");
                        ui.label(name);
                        ui.label(line.line.quantity.to_string());
                        ui.label(format_amount(line.unit_price));
                        ui.label(format_percent(line.gst_percentage));
                        ui.label(format_amount(line.amounts.tax_amount));
                        ui.label(format_amount(line.amounts.without_tax));
                        ui.label(format_amount(line.amounts.with_tax));
                        if ui.small_button("✖").clicked() {
                            *action = Some(Action::DeleteLine(line.line.id.clone()));
                        }
                        ui.end_row();
                    }
                    ui.label(egui::RichText::new(lang.pick("Total", "કુલ")).strong());
                    ui.label("");
                    ui.label("");
                    ui.label("");
                    ui.label(format_amount(breakdown.totals.tax_amount));
                    ui.label(format_amount(breakdown.totals.without_tax));
                    ui.label(egui::RichText::new(format_amount(breakdown.totals.with_tax)).strong());
                    ui.label("");
                    ui.end_row();
                });
        });
}
