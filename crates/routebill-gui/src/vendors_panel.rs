//! Vendors tab: routes and the vendors on each route

use eframe::egui;

use routebill_domain::model::{NewVendor, Route, Vendor};
use routebill_domain::service::{VendorQuery, VendorSort};
use routebill_types::Language;

use crate::session::Session;

#[derive(Debug, Clone, Default)]
struct VendorForm {
    name: String,
    route_id: Option<String>,
    contact: String,
    address: String,
}

impl VendorForm {
    fn from_vendor(vendor: &Vendor) -> Self {
        Self {
            name: vendor.name.clone(),
            route_id: Some(vendor.route_id.clone()),
            contact: vendor.contact_or_empty().to_string(),
            address: vendor.address_or_empty().to_string(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.route_id.is_some()
    }

    fn to_new_vendor(&self) -> NewVendor {
        NewVendor {
            name: self.name.trim().to_string(),
            route_id: self.route_id.clone().unwrap_or_default(),
            contact: Some(self.contact.clone()),
            address: Some(self.address.clone()),
        }
        .normalized()
    }

    fn ui(&mut self, ui: &mut egui::Ui, id: &str, routes: &[Route], lang: Language) {
        egui::Grid::new(id)
            .num_columns(2)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                ui.label(lang.pick("Name:", "નામ:"));
                ui.add(egui::TextEdit::singleline(&mut self.name).desired_width(200.0));
                ui.end_row();

                ui.label(lang.pick("Route:", "રૂટ:"));
                route_combo(
                    ui,
                    (id, "route"),
                    routes,
                    &mut self.route_id,
                    lang.pick("Select route", "રૂટ પસંદ કરો"),
                );
                ui.end_row();

                ui.label(lang.pick("Contact:", "સંપર્ક:"));
                ui.add(egui::TextEdit::singleline(&mut self.contact).desired_width(200.0));
                ui.end_row();

                ui.label(lang.pick("Address:", "સરનામું:"));
                ui.add(egui::TextEdit::singleline(&mut self.address).desired_width(200.0));
                ui.end_row();
            });
    }
}

/// Route picker; `none_label` is shown (and selectable) for no route
fn route_combo(
    ui: &mut egui::Ui,
    id: impl std::hash::Hash,
    routes: &[Route],
    selected: &mut Option<String>,
    none_label: &str,
) {
    let text = selected
        .as_deref()
        .and_then(|id| routes.iter().find(|r| r.id == id))
        .map(|r| r.name.as_str())
        .unwrap_or(none_label)
        .to_string();
    egui::ComboBox::from_id_salt(id)
        .selected_text(text)
        .width(180.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(selected, None, none_label);
            for route in routes {
                ui.selectable_value(selected, Some(route.id.clone()), &route.name);
            }
        });
}

pub struct VendorsPanel {
    new_route: String,
    /// Route being renamed, with the new name
    renaming: Option<(String, String)>,
    form: VendorForm,
    editing: Option<(String, VendorForm)>,
    query: VendorQuery,
    status_message: Option<(String, bool)>,
}

impl Default for VendorsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl VendorsPanel {
    pub fn new() -> Self {
        Self {
            new_route: String::new(),
            renaming: None,
            form: VendorForm::default(),
            editing: None,
            query: VendorQuery::default(),
            status_message: None,
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, session: &mut Session, lang: Language) {
        ui.heading(lang.pick("Vendors", "વેન્ડર"));
        ui.add_space(10.0);

        ui.columns(2, |columns| {
            self.render_routes(&mut columns[0], session, lang);
            self.render_vendor_form(&mut columns[1], session, lang);
        });

        ui.add_space(10.0);
        ui.separator();
        self.render_vendor_list(ui, session, lang);

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

    fn set_result(&mut self, result: routebill_types::Result<()>, success: &str) {
        self.status_message = Some(match result {
            Ok(()) => (success.to_string(), false),
            Err(e) => (e.user_message(), true),
        });
    }

    fn render_routes(&mut self, ui: &mut egui::Ui, session: &mut Session, lang: Language) {
        ui.strong(lang.pick("Routes", "રૂટ"));
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.new_route)
                    .hint_text(lang.pick("Route name", "રૂટનું નામ"))
                    .desired_width(160.0),
            );
            let can_add = !self.new_route.trim().is_empty();
            if ui
                .add_enabled(can_add, egui::Button::new(lang.pick("Add", "ઉમેરો")))
                .clicked()
            {
                let result = session
                    .directory
                    .add_route(session.store.as_ref(), &self.new_route);
                if result.is_ok() {
                    self.new_route.clear();
                }
                self.set_result(result, lang.pick("Route added", "રૂટ ઉમેર્યો"));
            }
        });
        ui.add_space(6.0);

        let mut to_delete: Option<String> = None;
        let mut to_rename: Option<Route> = None;
        let mut start_rename: Option<(String, String)> = None;

        egui::ScrollArea::vertical()
            .id_salt("routes_scroll")
            .max_height(200.0)
            .show(ui, |ui| {
                egui::Grid::new("routes_grid")
                    .num_columns(3)
                    .spacing([10.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        for route in session.directory.routes() {
                            match self.renaming.as_mut() {
                                Some((id, name)) if *id == route.id => {
                                    ui.add(egui::TextEdit::singleline(name).desired_width(140.0));
                                    if ui.small_button(lang.pick("Save", "સાચવો")).clicked() {
                                        to_rename = Some(Route {
                                            id: route.id.clone(),
                                            name: name.clone(),
                                        });
                                    }
                                }
                                _ => {
                                    ui.label(&route.name);
                                    if ui.small_button(lang.pick("Rename", "નામ બદલો")).clicked() {
                                        start_rename = Some((route.id.clone(), route.name.clone()));
                                    }
                                }
                            }
                            if ui.small_button(lang.pick("Delete", "કાઢી નાખો")).clicked() {
                                to_delete = Some(route.id.clone());
                            }
                            ui.end_row();
                        }
                    });
            });

        if start_rename.is_some() {
            self.renaming = start_rename;
        }
        if let Some(route) = to_rename {
            let result = session.directory.update_route(session.store.as_ref(), route);
            if result.is_ok() {
                self.renaming = None;
            }
            self.set_result(result, lang.pick("Route updated", "રૂટ અપડેટ થયો"));
        }
        if let Some(id) = to_delete {
            let result = session.directory.delete_route(session.store.as_ref(), &id);
            self.set_result(result, lang.pick("Route deleted", "રૂટ કાઢી નાખ્યો"));
        }
    }

    fn render_vendor_form(&mut self, ui: &mut egui::Ui, session: &mut Session, lang: Language) {
        let editing = self.editing.is_some();
        ui.strong(if editing {
            lang.pick("Edit Vendor", "વેન્ડરમાં ફેરફાર")
        } else {
            lang.pick("Add Vendor", "વેન્ડર ઉમેરો")
        });
        ui.add_space(6.0);

        let routes = session.directory.routes().to_vec();
        let form = match self.editing.as_mut() {
            Some((_, form)) => form,
            None => &mut self.form,
        };
        form.ui(ui, "vendor_form_grid", &routes, lang);
        let can_save = form.is_complete();

        ui.add_space(6.0);
        let mut save = false;
        let mut cancel = false;
        ui.horizontal(|ui| {
            let label = if editing {
                lang.pick("Save", "સાચવો")
            } else {
                lang.pick("Add", "ઉમેરો")
            };
            save = ui.add_enabled(can_save, egui::Button::new(label)).clicked();
            if editing {
                cancel = ui.button(lang.pick("Cancel", "રદ કરો")).clicked();
            }
        });

        if cancel {
            self.editing = None;
        } else if save {
            let store = session.store.as_ref();
            match self.editing.as_ref() {
                Some((id, form)) => {
                    let new = form.to_new_vendor();
                    let vendor = Vendor {
                        id: id.clone(),
                        name: new.name,
                        route_id: new.route_id,
                        contact: new.contact,
                        address: new.address,
                    };
                    let result = session.directory.update_vendor(store, vendor);
                    if result.is_ok() {
                        self.editing = None;
                    }
                    self.set_result(result, lang.pick("Vendor updated", "વેન્ડર અપડેટ થયો"));
                }
                None => {
                    let result = session.directory.add_vendor(store, self.form.to_new_vendor());
                    if result.is_ok() {
                        self.form = VendorForm {
                            route_id: self.form.route_id.clone(),
                            ..VendorForm::default()
                        };
                    }
                    self.set_result(result, lang.pick("Vendor added", "વેન્ડર ઉમેર્યો"));
                }
            }
        }
    }

    fn render_vendor_list(&mut self, ui: &mut egui::Ui, session: &mut Session, lang: Language) {
        ui.horizontal(|ui| {
            route_combo(
                ui,
                "vendor_filter_route",
                session.directory.routes(),
                &mut self.query.route_id,
                lang.pick("All routes", "બધા રૂટ"),
            );
            ui.add(
                egui::TextEdit::singleline(&mut self.query.term)
                    .hint_text(lang.pick("Search vendors", "વેન્ડર શોધો"))
                    .desired_width(180.0),
            );
            egui::ComboBox::from_id_salt("vendor_sort")
                .selected_text(self.query.sort.label())
                .show_ui(ui, |ui| {
                    for sort in [VendorSort::NameAsc, VendorSort::NameDesc] {
                        ui.selectable_value(&mut self.query.sort, sort, sort.label());
                    }
                });
        });
        ui.add_space(6.0);

        let mut to_delete: Option<String> = None;
        let mut to_edit: Option<Vendor> = None;
        let vendors = self.query.apply(session.directory.vendors());

        egui::ScrollArea::vertical()
            .id_salt("vendors_scroll")
            .max_height(300.0)
            .show(ui, |ui| {
                egui::Grid::new("vendors_grid")
                    .num_columns(6)
                    .spacing([10.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(lang.pick("Name", "નામ")).strong());
                        ui.label(egui::RichText::new(lang.pick("Route", "રૂટ")).strong());
                        ui.label(egui::RichText::new(lang.pick("Contact", "સંપર્ક")).strong());
                        ui.label(egui::RichText::new(lang.pick("Address", "સરનામું")).strong());
                        ui.label("");
                        ui.label("");
                        ui.end_row();

                        for vendor in vendors {
                            ui.label(&vendor.name);
                            ui.label(session.directory.route_name(&vendor.route_id).unwrap_or("-"));
                            ui.label(vendor.contact_or_empty());
                            ui.label(vendor.address_or_empty());
                            if ui.small_button(lang.pick("Edit", "ફેરફાર")).clicked() {
                                to_edit = Some(vendor.clone());
                            }
                            if ui.small_button(lang.pick("Delete", "કાઢી નાખો")).clicked() {
                                to_delete = Some(vendor.id.clone());
                            }
                            ui.end_row();
                        }
                    });
            });

        if let Some(vendor) = to_edit {
            self.editing = Some((vendor.id.clone(), VendorForm::from_vendor(&vendor)));
        }
        if let Some(id) = to_delete {
            let result = session.directory.delete_vendor(session.store.as_ref(), &id);
            self.set_result(result, lang.pick("Vendor deleted", "વેન્ડર કાઢી નાખ્યો"));
        }
    }
}
