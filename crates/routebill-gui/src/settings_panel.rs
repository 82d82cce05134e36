//! Settings panel for the Routebill GUI

use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};
use tracing::info;

use routebill_app::config::{Backend, BusinessProfile, Config};
use routebill_types::Language;

/// Text form of an optional path; empty means unset
fn path_text(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn text_path(text: &str) -> Option<PathBuf> {
    let text = text.trim();
    (!text.is_empty()).then(|| PathBuf::from(text))
}

pub struct SettingsPanel {
    backend: Backend,
    data_dir: String,
    rest_url: String,
    api_key_env: String,
    timeout_secs: String,
    gujarati_font: String,
    export_dir: String,
    business_en: BusinessProfile,
    business_gu: BusinessProfile,
    modified: bool,
    status_message: Option<(String, bool)>,
}

impl SettingsPanel {
    pub fn new(config: &Config) -> Self {
        Self {
            backend: config.backend,
            data_dir: path_text(&config.data_dir),
            rest_url: config.rest_url.clone().unwrap_or_default(),
            api_key_env: config.api_key_env.clone(),
            timeout_secs: config.timeout_secs.to_string(),
            gujarati_font: path_text(&config.gujarati_font),
            export_dir: path_text(&config.export_dir),
            business_en: config.business.en.clone(),
            business_gu: config.business.gu.clone(),
            modified: false,
            status_message: None,
        }
    }

    /// Returns true when the store should be reopened
    pub fn ui(&mut self, ui: &mut Ui, config: &mut Config) -> bool {
        let lang = config.language;
        let mut reconnect = false;

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading(lang.pick("Settings", "સેટિંગ્સ"));
            ui.add_space(10.0);

            ui.label(RichText::new(lang.pick("Data store", "ડેટા સ્ટોર")).strong());
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                for backend in [Backend::File, Backend::Rest] {
                    if ui
                        .selectable_label(self.backend == backend, backend.to_string())
                        .clicked()
                    {
                        self.backend = backend;
                        self.modified = true;
                    }
                }
            });
            ui.add_space(5.0);

            egui::Grid::new("store_settings")
                .num_columns(2)
                .spacing([10.0, 6.0])
                .show(ui, |ui| match self.backend {
                    Backend::File => {
                        ui.label(lang.pick("Data folder:", "ડેટા ફોલ્ડર:"));
                        self.path_field(ui, PathField::DataDir, lang);
                        ui.end_row();
                    }
                    Backend::Rest => {
                        ui.label("URL:");
                        self.text_field(ui, FieldRef::RestUrl, "https://xyz.supabase.co");
                        ui.end_row();

                        ui.label(lang.pick("API key variable:", "API કી વેરીએબલ:"));
                        self.text_field(ui, FieldRef::ApiKeyEnv, "ROUTEBILL_SUPABASE_KEY");
                        ui.end_row();

                        ui.label(lang.pick("Timeout (s):", "ટાઈમઆઉટ (સે):"));
                        self.text_field(ui, FieldRef::Timeout, "30");
                        ui.end_row();
                    }
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(15.0);

            ui.label(RichText::new(lang.pick("Documents", "દસ્તાવેજ")).strong());
            ui.add_space(5.0);
            egui::Grid::new("document_settings")
                .num_columns(2)
                .spacing([10.0, 6.0])
                .show(ui, |ui| {
                    ui.label(lang.pick("Gujarati font (TTF):", "ગુજરાતી ફોન્ટ (TTF):"));
                    self.path_field(ui, PathField::GujaratiFont, lang);
                    ui.end_row();

                    ui.label(lang.pick("Export folder:", "નિકાસ ફોલ્ડર:"));
                    self.path_field(ui, PathField::ExportDir, lang);
                    ui.end_row();
                });

            ui.add_space(10.0);
            ui.columns(2, |columns| {
                if business_form(&mut columns[0], "business_en", "English", &mut self.business_en) {
                    self.modified = true;
                }
                if business_form(&mut columns[1], "business_gu", "ગુજરાતી", &mut self.business_gu) {
                    self.modified = true;
                }
            });

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(15.0);

            ui.label(RichText::new(lang.pick("Current settings", "હાલની સેટિંગ્સ")).strong());
            ui.add_space(5.0);
            egui::Frame::new()
                .fill(Color32::from_gray(30))
                .inner_margin(10.0)
                .corner_radius(4.0)
                .show(ui, |ui| {
                    ui.monospace(config.to_string());
                });

            ui.add_space(20.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(
                        self.modified,
                        egui::Button::new(RichText::new(lang.pick("Save", "સાચવો")).size(16.0)),
                    )
                    .clicked()
                {
                    reconnect = self.save_config(config, lang);
                }

                if ui.button(lang.pick("Reset", "રીસેટ")).clicked() {
                    *self = Self::new(config);
                }

                if ui.button(lang.pick("Reconnect", "ફરી જોડાઓ")).clicked() {
                    reconnect = true;
                }

                if self.modified {
                    ui.label(
                        RichText::new(lang.pick("* Unsaved changes", "* સાચવ્યા વગરના ફેરફાર"))
                            .color(Color32::YELLOW),
                    );
                }
            });

            if let Some((ref msg, is_error)) = self.status_message {
                ui.add_space(10.0);
                let color = if is_error { Color32::LIGHT_RED } else { Color32::LIGHT_GREEN };
                ui.label(RichText::new(msg).color(color));
            }
        });

        reconnect
    }

    fn text_field(&mut self, ui: &mut Ui, field: FieldRef, hint: &str) {
        let value = match field {
            FieldRef::RestUrl => &mut self.rest_url,
            FieldRef::ApiKeyEnv => &mut self.api_key_env,
            FieldRef::Timeout => &mut self.timeout_secs,
        };
        let response = ui.add(
            egui::TextEdit::singleline(value)
                .hint_text(hint)
                .desired_width(320.0),
        );
        if response.changed() {
            self.modified = true;
        }
    }

    fn path_field(&mut self, ui: &mut Ui, field: PathField, lang: Language) {
        ui.horizontal(|ui| {
            let value = match field {
                PathField::DataDir => &mut self.data_dir,
                PathField::GujaratiFont => &mut self.gujarati_font,
                PathField::ExportDir => &mut self.export_dir,
            };
            let response = ui.add(
                egui::TextEdit::singleline(value)
                    .hint_text(lang.pick("(default)", "(ડિફોલ્ટ)"))
                    .desired_width(320.0),
            );
            if response.changed() {
                self.modified = true;
            }
            if ui.small_button(lang.pick("Browse...", "પસંદ કરો...")).clicked() {
                let picked = match field {
                    PathField::GujaratiFont => rfd::FileDialog::new()
                        .add_filter("TrueType", &["ttf"])
                        .pick_file(),
                    PathField::DataDir | PathField::ExportDir => {
                        rfd::FileDialog::new().pick_folder()
                    }
                };
                if let Some(path) = picked {
                    let text = path.display().to_string();
                    match field {
                        PathField::DataDir => self.data_dir = text,
                        PathField::GujaratiFont => self.gujarati_font = text,
                        PathField::ExportDir => self.export_dir = text,
                    }
                    self.modified = true;
                }
            }
        });
    }

    /// Apply the form to `config` and write it; true if the store settings changed
    fn save_config(&mut self, config: &mut Config, lang: Language) -> bool {
        let timeout_secs = match self.timeout_secs.trim().parse::<u64>() {
            Ok(t) if t > 0 => t,
            _ => {
                self.status_message = Some((
                    lang.pick("Timeout must be a positive number", "ટાઈમઆઉટ ધન સંખ્યા હોવી જોઈએ")
                        .to_string(),
                    true,
                ));
                return false;
            }
        };

        let before = (
            config.backend,
            config.data_dir.clone(),
            config.rest_url.clone(),
            config.api_key_env.clone(),
            config.timeout_secs,
        );

        config.backend = self.backend;
        config.data_dir = text_path(&self.data_dir);
        config.rest_url = Some(self.rest_url.trim().to_string()).filter(|u| !u.is_empty());
        config.api_key_env = self.api_key_env.trim().to_string();
        config.timeout_secs = timeout_secs;
        config.gujarati_font = text_path(&self.gujarati_font);
        config.export_dir = text_path(&self.export_dir);
        config.business.en = self.business_en.clone();
        config.business.gu = self.business_gu.clone();

        let after = (
            config.backend,
            config.data_dir.clone(),
            config.rest_url.clone(),
            config.api_key_env.clone(),
            config.timeout_secs,
        );

        match config.save() {
            Ok(()) => {
                info!("Settings saved");
                self.modified = false;
                self.status_message =
                    Some((lang.pick("Settings saved", "સેટિંગ્સ સાચવી").to_string(), false));
            }
            Err(e) => {
                self.status_message = Some((e.user_message(), true));
            }
        }
        before != after
    }
}

#[derive(Clone, Copy)]
enum FieldRef {
    RestUrl,
    ApiKeyEnv,
    Timeout,
}

#[derive(Clone, Copy)]
enum PathField {
    DataDir,
    GujaratiFont,
    ExportDir,
}

/// Letterhead fields for one language; true if anything changed
fn business_form(ui: &mut Ui, id: &str, title: &str, profile: &mut BusinessProfile) -> bool {
    let mut changed = false;
    ui.label(RichText::new(title).strong());
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([10.0, 6.0])
        .show(ui, |ui| {
            for (label, value) in [
                ("Name", &mut profile.name),
                ("Address", &mut profile.address),
                ("Address 2", &mut profile.address2),
                ("GSTIN", &mut profile.gstin),
                ("Contact", &mut profile.contact),
            ] {
                ui.label(label);
                changed |= ui
                    .add(egui::TextEdit::singleline(value).desired_width(220.0))
                    .changed();
                ui.end_row();
            }
        });
    changed
}
