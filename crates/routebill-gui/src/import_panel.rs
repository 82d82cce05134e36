//! Import tab: bulk-load tables from CSV or spreadsheet files

use eframe::egui;

use routebill_app::config::Config;
use routebill_app::import_service::{run_import, write_templates, ImportSelection, TableReport};
use routebill_infra::import::ImportTable;

use crate::session::Session;

pub struct ImportPanel {
    selection: ImportSelection,
    reports: Vec<TableReport>,
    status_message: Option<(String, bool)>,
}

impl Default for ImportPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportPanel {
    pub fn new() -> Self {
        Self {
            selection: ImportSelection::new(),
            reports: Vec::new(),
            status_message: None,
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, session: &mut Session, config: &Config) {
        let lang = config.language;
        ui.heading(lang.pick("Import Data", "ડેટા આયાત"));
        ui.add_space(4.0);
        ui.label(lang.pick(
            "Tables are imported in this order. A failed table does not stop the others.",
            "ટેબલ આ ક્રમમાં આયાત થાય છે. એક ટેબલ નિષ્ફળ જાય તો બાકીના ચાલુ રહે છે.",
        ));
        ui.add_space(10.0);

        egui::Grid::new("import_grid")
            .num_columns(4)
            .spacing([10.0, 6.0])
            .striped(true)
            .show(ui, |ui| {
                for table in ImportTable::ALL {
                    ui.label(table.label());
                    let file = self
                        .selection
                        .get(table)
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| lang.pick("No file", "કોઈ ફાઇલ નથી").to_string());
                    ui.monospace(file);
                    if ui.small_button(lang.pick("Choose...", "પસંદ કરો...")).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("CSV / Excel", &["csv", "xlsx", "xls", "xlsm", "ods"])
                            .pick_file()
                        {
                            self.selection.set(table, path);
                        }
                    }
                    if ui.small_button(lang.pick("Clear", "દૂર કરો")).clicked() {
                        self.selection.clear(table);
                    }
                    ui.end_row();
                }
            });

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    !self.selection.is_empty(),
                    egui::Button::new(lang.pick("Import", "આયાત કરો")),
                )
                .clicked()
            {
                self.run(session);
            }
            if ui
                .button(lang.pick("Download Templates", "ટેમ્પલેટ ડાઉનલોડ કરો"))
                .clicked()
            {
                if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                    self.status_message = Some(match write_templates(&dir) {
                        Ok(paths) => (
                            format!(
                                "{} {} {}",
                                paths.len(),
                                lang.pick("templates written to", "ટેમ્પલેટ અહીં લખાયા:"),
                                dir.display()
                            ),
                            false,
                        ),
                        Err(e) => (e.user_message(), true),
                    });
                }
            }
        });

        if !self.reports.is_empty() {
            ui.add_space(10.0);
            ui.separator();
            ui.strong(lang.pick("Results", "પરિણામ"));
            egui::Grid::new("import_report_grid")
                .num_columns(2)
                .spacing([10.0, 4.0])
                .show(ui, |ui| {
                    for report in &self.reports {
                        ui.label(report.table.label());
                        let color = if report.outcome.is_success() {
                            egui::Color32::LIGHT_GREEN
                        } else {
                            egui::Color32::LIGHT_RED
                        };
                        ui.label(egui::RichText::new(report.outcome.to_string()).color(color));
                        ui.end_row();
                    }
                });
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

    fn run(&mut self, session: &mut Session) {
        self.reports = run_import(session.store.as_ref(), &self.selection);
        self.status_message = match session.reload() {
            Ok(()) => {
                self.selection = ImportSelection::new();
                None
            }
            Err(e) => Some((e.user_message(), true)),
        };
    }
}
