//! Items tab: catalog maintenance and bulk rate updates

use eframe::egui;

use routebill_domain::model::{Category, Item, NewItem};
use routebill_domain::service::{query_items, ItemSort};
use routebill_types::{format_amount, format_percent, Error, Language, Result};

use crate::session::Session;

/// Text fields shared by the add form and the inline editor
#[derive(Debug, Clone, Default)]
struct ItemForm {
    name_en: String,
    name_gu: String,
    rate: String,
    has_gst: bool,
    gst_percentage: String,
    category: Category,
}

impl ItemForm {
    fn from_item(item: &Item) -> Self {
        Self {
            name_en: item.name_en.clone(),
            name_gu: item.name_gu.clone(),
            rate: item.rate.to_string(),
            has_gst: item.has_gst,
            gst_percentage: item.gst_percentage.map(|g| g.to_string()).unwrap_or_default(),
            category: item.category,
        }
    }

    fn to_new_item(&self) -> Result<NewItem> {
        let rate = parse_number("rate", &self.rate)?;
        let gst_percentage = if self.has_gst {
            Some(parse_number("gst_percentage", &self.gst_percentage)?)
        } else {
            None
        };
        let item = NewItem {
            name_en: self.name_en.trim().to_string(),
            name_gu: self.name_gu.trim().to_string(),
            rate,
            has_gst: self.has_gst,
            gst_percentage,
            category: self.category,
        };
        item.validate()?;
        Ok(item)
    }

    fn ui(&mut self, ui: &mut egui::Ui, id: &str, lang: Language) {
        egui::Grid::new(id)
            .num_columns(2)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                ui.label(lang.pick("Name (English):", "નામ (અંગ્રેજી):"));
                ui.add(egui::TextEdit::singleline(&mut self.name_en).desired_width(200.0));
                ui.end_row();

                ui.label(lang.pick("Name (Gujarati):", "નામ (ગુજરાતી):"));
                ui.add(egui::TextEdit::singleline(&mut self.name_gu).desired_width(200.0));
                ui.end_row();

                ui.label(lang.pick("Rate:", "ભાવ:"));
                ui.add(
                    egui::TextEdit::singleline(&mut self.rate)
                        .hint_text("0.00")
                        .desired_width(100.0),
                );
                ui.end_row();

                ui.label("GST:");
                ui.horizontal(|ui| {
                    ui.checkbox(&mut self.has_gst, "");
                    ui.add_enabled(
                        self.has_gst,
                        egui::TextEdit::singleline(&mut self.gst_percentage)
                            .hint_text("%")
                            .desired_width(60.0),
                    );
                });
                ui.end_row();

                ui.label(lang.pick("Category:", "કેટેગરી:"));
                category_combo(ui, (id, "category"), &mut self.category);
                ui.end_row();
            });
    }
}

fn parse_number(field: &str, text: &str) -> Result<f64> {
    text.trim().parse::<f64>().map_err(|_| Error::InvalidNumber {
        field: field.to_string(),
        value: text.to_string(),
    })
}

fn category_combo(ui: &mut egui::Ui, id: impl std::hash::Hash, category: &mut Category) -> bool {
    let before = *category;
    egui::ComboBox::from_id_salt(id)
        .selected_text(category.as_str())
        .show_ui(ui, |ui| {
            for c in Category::ALL {
                ui.selectable_value(category, c, c.as_str());
            }
        });
    before != *category
}

pub struct ItemsPanel {
    form: ItemForm,
    search: String,
    sort: ItemSort,
    /// Item being edited inline, with its form
    editing: Option<(String, ItemForm)>,
    bulk_category: Category,
    bulk_rate: String,
    status_message: Option<(String, bool)>,
}

impl Default for ItemsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemsPanel {
    pub fn new() -> Self {
        Self {
            form: ItemForm::default(),
            search: String::new(),
            sort: ItemSort::default(),
            editing: None,
            bulk_category: Category::default(),
            bulk_rate: String::new(),
            status_message: None,
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, session: &mut Session, lang: Language) {
        ui.heading(lang.pick("Items", "વસ્તુઓ"));
        ui.add_space(10.0);

        egui::CollapsingHeader::new(lang.pick("Add Item", "વસ્તુ ઉમેરો"))
            .default_open(true)
            .show(ui, |ui| {
                self.form.ui(ui, "item_add_grid", lang);
                ui.add_space(6.0);
                let can_add = !self.form.name_en.trim().is_empty() && !self.form.rate.trim().is_empty();
                if ui
                    .add_enabled(can_add, egui::Button::new(lang.pick("Add", "ઉમેરો")))
                    .clicked()
                {
                    self.add_item(session, lang);
                }
            });

        ui.add_space(10.0);
        self.render_bulk_update(ui, session, lang);

        ui.add_space(10.0);
        ui.separator();
        self.render_list(ui, session, lang);

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

    fn add_item(&mut self, session: &mut Session, lang: Language) {
        let result = self
            .form
            .to_new_item()
            .and_then(|new| session.items.add(session.store.as_ref(), new));
        match result {
            Ok(item) => {
                self.status_message = Some((
                    format!("{}: {}", lang.pick("Added", "ઉમેર્યું"), item.name_en),
                    false,
                ));
                self.form = ItemForm {
                    category: self.form.category,
                    ..ItemForm::default()
                };
            }
            Err(e) => self.status_message = Some((e.user_message(), true)),
        }
    }

    fn render_bulk_update(&mut self, ui: &mut egui::Ui, session: &mut Session, lang: Language) {
        egui::Frame::new()
            .fill(egui::Color32::from_gray(30))
            .inner_margin(10.0)
            .corner_radius(4.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(lang.pick("Set rate for category", "કેટેગરીનો ભાવ બદલો"));
                    category_combo(ui, "bulk_category", &mut self.bulk_category);
                    ui.add(
                        egui::TextEdit::singleline(&mut self.bulk_rate)
                            .hint_text(lang.pick("New rate", "નવો ભાવ"))
                            .desired_width(80.0),
                    );
                    let can_apply = !self.bulk_rate.trim().is_empty();
                    if ui
                        .add_enabled(can_apply, egui::Button::new(lang.pick("Apply", "લાગુ કરો")))
                        .clicked()
                    {
                        let result = parse_number("rate", &self.bulk_rate).and_then(|rate| {
                            session
                                .items
                                .bulk_update_rate(session.store.as_ref(), self.bulk_category, rate)
                        });
                        self.status_message = Some(match result {
                            Ok(count) => {
                                self.bulk_rate.clear();
                                (
                                    format!(
                                        "{} {} ({})",
                                        count,
                                        lang.pick("items updated", "વસ્તુઓ અપડેટ થઈ"),
                                        self.bulk_category
                                    ),
                                    false,
                                )
                            }
                            Err(e) => (e.user_message(), true),
                        });
                    }
                });
            });
    }

    fn render_list(&mut self, ui: &mut egui::Ui, session: &mut Session, lang: Language) {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text(lang.pick("Search items", "વસ્તુ શોધો"))
                    .desired_width(200.0),
            );
            egui::ComboBox::from_id_salt("items_sort")
                .selected_text(self.sort.label())
                .show_ui(ui, |ui| {
                    for sort in ItemSort::ALL {
                        ui.selectable_value(&mut self.sort, sort, sort.label());
                    }
                });
        });
        ui.add_space(6.0);

        let mut to_delete: Option<String> = None;
        let mut to_edit: Option<Item> = None;
        let mut category_change: Option<(String, Category)> = None;
        let mut save_edit = false;
        let mut cancel_edit = false;

        let items = query_items(session.items.items(), &self.search, self.sort);
        if items.is_empty() {
            ui.label(lang.pick("No items", "કોઈ વસ્તુ નથી"));
        }

        egui::ScrollArea::vertical()
            .id_salt("items_scroll")
            .max_height(400.0)
            .show(ui, |ui| {
                egui::Grid::new("items_list_grid")
                    .num_columns(7)
                    .spacing([10.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(lang.pick("Name", "નામ")).strong());
                        ui.label(egui::RichText::new(lang.pick("Gujarati", "ગુજરાતી")).strong());
                        ui.label(egui::RichText::new(lang.pick("Rate", "ભાવ")).strong());
                        ui.label(egui::RichText::new("GST").strong());
                        ui.label(egui::RichText::new(lang.pick("Category", "કેટેગરી")).strong());
                        ui.label("");
                        ui.label("");
                        ui.end_row();

                        for item in items {
                            ui.label(&item.name_en);
                            ui.label(&item.name_gu);
                            ui.label(format_amount(item.rate));
                            ui.label(if item.has_gst {
                                format_percent(item.gst_rate())
                            } else {
                                "-".to_string()
                            });
                            let mut category = item.category;
                            if category_combo(ui, ("item_category", &item.id), &mut category) {
                                category_change = Some((item.id.clone(), category));
                            }
                            if ui.small_button(lang.pick("Edit", "ફેરફાર")).clicked() {
                                to_edit = Some(item.clone());
                            }
                            if ui.small_button(lang.pick("Delete", "કાઢી નાખો")).clicked() {
                                to_delete = Some(item.id.clone());
                            }
                            ui.end_row();
                        }
                    });
            });

        if let Some((_, form)) = self.editing.as_mut() {
            ui.add_space(10.0);
            egui::Frame::new()
                .fill(egui::Color32::from_gray(30))
                .inner_margin(10.0)
                .corner_radius(4.0)
                .show(ui, |ui| {
                    ui.strong(lang.pick("Edit Item", "વસ્તુમાં ફેરફાર"));
                    form.ui(ui, "item_edit_grid", lang);
                    ui.horizontal(|ui| {
                        save_edit = ui.button(lang.pick("Save", "સાચવો")).clicked();
                        cancel_edit = ui.button(lang.pick("Cancel", "રદ કરો")).clicked();
                    });
                });
        }

        let store = session.store.as_ref();
        if let Some(item) = to_edit {
            self.editing = Some((item.id.clone(), ItemForm::from_item(&item)));
        }
        if cancel_edit {
            self.editing = None;
        }
        if save_edit {
            if let Some((id, form)) = self.editing.as_ref() {
                let result = form
                    .to_new_item()
                    .and_then(|new| session.items.update(store, new.into_item(id.clone())));
                match result {
                    Ok(item) => {
                        self.editing = None;
                        self.status_message = Some((
                            format!("{}: {}", lang.pick("Saved", "સાચવ્યું"), item.name_en),
                            false,
                        ));
                    }
                    Err(e) => self.status_message = Some((e.user_message(), true)),
                }
            }
        }
        if let Some((id, category)) = category_change {
            if let Err(e) = session.items.change_category(store, &id, category) {
                self.status_message = Some((e.user_message(), true));
            }
        }
        if let Some(id) = to_delete {
            match session.items.delete(store, &id) {
                Ok(()) => {
                    if self.editing.as_ref().is_some_and(|(editing, _)| *editing == id) {
                        self.editing = None;
                    }
                    self.status_message =
                        Some((lang.pick("Item deleted", "વસ્તુ કાઢી નાખી").to_string(), false));
                }
                Err(e) => self.status_message = Some((e.user_message(), true)),
            }
        }
    }
}
