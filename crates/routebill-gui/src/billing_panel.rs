//! Billing tab: pick route, vendor and date, add items, submit the bill

use std::collections::HashMap;

use chrono::Local;
use eframe::egui;
use egui_extras::DatePickerButton;

use routebill_domain::model::Category;
use routebill_domain::service::{group_by_category, query_items, BillDraft, ItemSort};
use routebill_types::{format_amount, format_percent, Language};

use crate::session::Session;

pub struct BillingPanel {
    draft: BillDraft,
    search: String,
    sort: ItemSort,
    /// Quantity text typed next to each catalog item, keyed by item id
    quantities: HashMap<String, String>,
    status_message: Option<(String, bool)>,
}

impl Default for BillingPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl BillingPanel {
    pub fn new() -> Self {
        Self {
            draft: BillDraft::new(Local::now().date_naive()),
            search: String::new(),
            sort: ItemSort::default(),
            quantities: HashMap::new(),
            status_message: None,
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, session: &mut Session, lang: Language) {
        ui.heading(lang.pick("New Bill", "નવું બિલ"));
        ui.add_space(10.0);

        self.render_header_form(ui, session, lang);
        ui.add_space(10.0);
        ui.separator();

        ui.columns(2, |columns| {
            self.render_catalog(&mut columns[0], session, lang);
            self.render_draft(&mut columns[1], session, lang);
        });

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

    fn render_header_form(&mut self, ui: &mut egui::Ui, session: &Session, lang: Language) {
        let routes = session.directory.routes();
        let vendors = session.directory.vendors();

        egui::Grid::new("bill_header_grid")
            .num_columns(2)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                ui.label(lang.pick("Route:", "રૂટ:"));
                let selected_route = self
                    .draft
                    .route_id
                    .as_deref()
                    .and_then(|id| session.directory.route_name(id))
                    .unwrap_or(lang.pick("Select route", "રૂટ પસંદ કરો"))
                    .to_string();
                let mut route_choice = self.draft.route_id.clone();
                egui::ComboBox::from_id_salt("bill_route")
                    .selected_text(selected_route)
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for route in routes {
                            ui.selectable_value(&mut route_choice, Some(route.id.clone()), &route.name);
                        }
                    });
                if route_choice != self.draft.route_id {
                    self.draft.select_route(route_choice);
                }
                ui.end_row();

                ui.label(lang.pick("Vendor:", "વેન્ડર:"));
                let choices = self.draft.selectable_vendors(vendors);
                let selected_vendor = self
                    .draft
                    .vendor_id
                    .as_deref()
                    .and_then(|id| vendors.iter().find(|v| v.id == id))
                    .map(|v| v.name.as_str())
                    .unwrap_or(lang.pick("Select vendor", "વેન્ડર પસંદ કરો"))
                    .to_string();
                ui.add_enabled_ui(self.draft.route_id.is_some(), |ui| {
                    egui::ComboBox::from_id_salt("bill_vendor")
                        .selected_text(selected_vendor)
                        .width(220.0)
                        .show_ui(ui, |ui| {
                            for vendor in choices {
                                ui.selectable_value(
                                    &mut self.draft.vendor_id,
                                    Some(vendor.id.clone()),
                                    &vendor.name,
                                );
                            }
                        });
                });
                ui.end_row();

                ui.label(lang.pick("Date:", "તારીખ:"));
                ui.add(DatePickerButton::new(&mut self.draft.date).id_salt("bill_date"));
                ui.end_row();
            });
    }

    fn render_catalog(&mut self, ui: &mut egui::Ui, session: &Session, lang: Language) {
        ui.strong(lang.pick("Items", "વસ્તુઓ"));
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text(lang.pick("Search items", "વસ્તુ શોધો"))
                    .desired_width(180.0),
            );
            egui::ComboBox::from_id_salt("bill_item_sort")
                .selected_text(self.sort.label())
                .show_ui(ui, |ui| {
                    for sort in ItemSort::ALL {
                        ui.selectable_value(&mut self.sort, sort, sort.label());
                    }
                });
        });
        ui.add_space(6.0);

        let matches = query_items(session.items.items(), &self.search, self.sort);
        let mut to_add: Option<(String, String)> = None;

        egui::ScrollArea::vertical()
            .id_salt("bill_catalog_scroll")
            .max_height(420.0)
            .show(ui, |ui| {
                for (category, items) in group_by_category(&matches) {
                    ui.label(egui::RichText::new(category.as_str()).strong());
                    egui::Grid::new(("bill_catalog_grid", category.as_str()))
                        .num_columns(4)
                        .spacing([10.0, 4.0])
                        .striped(true)
                        .show(ui, |ui| {
                            for item in items {
                                ui.label(item.display_name(lang));
                                ui.label(format_amount(item.rate));
                                let qty = self.quantities.entry(item.id.clone()).or_default();
                                ui.add(
                                    egui::TextEdit::singleline(qty)
                                        .hint_text(lang.pick("Qty", "જથ્થો"))
                                        .desired_width(50.0),
                                );
                                if ui.small_button(lang.pick("Add", "ઉમેરો")).clicked() {
                                    to_add = Some((item.id.clone(), qty.clone()));
                                }
                                ui.end_row();
                            }
                        });
                    ui.add_space(6.0);
                }
            });

        if let Some((item_id, qty_text)) = to_add {
            self.add_line(session, &item_id, &qty_text, lang);
        }
    }

    fn add_line(&mut self, session: &Session, item_id: &str, qty_text: &str, lang: Language) {
        let Some(item) = session.items.items().iter().find(|i| i.id == item_id) else {
            return;
        };
        let quantity = match qty_text.trim().parse::<i64>() {
            Ok(q) => q,
            Err(_) => {
                self.status_message = Some((
                    lang.pick("Enter a valid quantity", "માન્ય જથ્થો દાખલ કરો").to_string(),
                    true,
                ));
                return;
            }
        };

        match self.draft.add_item(item, quantity) {
            Ok(()) => {
                self.quantities.remove(item_id);
                self.status_message = None;
            }
            Err(e) => self.status_message = Some((e.user_message(), true)),
        }
    }

    fn render_draft(&mut self, ui: &mut egui::Ui, session: &mut Session, lang: Language) {
        ui.strong(lang.pick("Bill Items", "બિલની વસ્તુઓ"));
        ui.add_space(6.0);

        if self.draft.is_empty() {
            ui.label(lang.pick("No items added", "કોઈ વસ્તુ ઉમેરી નથી"));
        }

        let mut to_remove: Option<String> = None;
        egui::ScrollArea::vertical()
            .id_salt("bill_draft_scroll")
            .max_height(360.0)
            .show(ui, |ui| {
                for category in Category::ALL {
                    let lines: Vec<_> = self.draft.lines_in(category).collect();
                    if lines.is_empty() {
                        continue;
                    }
                    ui.label(egui::RichText::new(category.as_str()).strong());
                    egui::Grid::new(("bill_draft_grid", category.as_str()))
                        .num_columns(6)
                        .spacing([10.0, 4.0])
                        .striped(true)
                        .show(ui, |ui| {
                            for line in lines {
                                let name = session
                                    .items
                                    .items()
                                    .iter()
                                    .find(|i| i.id == line.item_id)
                                    .map(|i| i.display_name(lang))
                                    .unwrap_or(line.name.as_str());
                                let amounts = line.amounts();
                                ui.label(name);
                                ui.label(line.quantity.to_string());
                                ui.label(format_amount(line.rate));
                                ui.label(format_percent(line.gst_percentage));
                                ui.label(format_amount(amounts.with_tax));
                                if ui.small_button(lang.pick("Remove", "દૂર કરો")).clicked() {
                                    to_remove = Some(line.item_id.clone());
                                }
                                ui.end_row();
                            }
                        });
                    ui.add_space(6.0);
                }
            });

        if let Some(item_id) = to_remove {
            self.draft.remove_item(&item_id);
        }

        let totals = self.draft.totals();
        egui::Frame::new()
            .fill(egui::Color32::from_gray(30))
            .inner_margin(10.0)
            .corner_radius(4.0)
            .show(ui, |ui| {
                egui::Grid::new("bill_totals_grid")
                    .num_columns(2)
                    .spacing([20.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(lang.pick("Subtotal:", "પેટા કુલ:"));
                        ui.label(format_amount(totals.without_tax));
                        ui.end_row();
                        ui.label(lang.pick("GST:", "GST:"));
                        ui.label(format_amount(totals.tax_amount));
                        ui.end_row();
                        ui.label(egui::RichText::new(lang.pick("Total:", "કુલ:")).strong());
                        ui.label(egui::RichText::new(format_amount(totals.with_tax)).strong());
                        ui.end_row();
                    });
            });

        ui.add_space(10.0);
        let can_submit = self.draft.vendor_id.is_some() && !self.draft.is_empty();
        if ui
            .add_enabled(can_submit, egui::Button::new(lang.pick("Create Bill", "બિલ બનાવો")))
            .clicked()
        {
            match session.bills.submit(session.store.as_ref(), &self.draft) {
                Ok(_) => {
                    self.draft.reset(Local::now().date_naive());
                    self.status_message = Some((
                        lang.pick("Bill created", "બિલ બનાવ્યું").to_string(),
                        false,
                    ));
                }
                Err(e) => self.status_message = Some((e.user_message(), true)),
            }
        }
    }
}
