//! Main application structure with tab navigation

use std::path::PathBuf;

use eframe::egui;
use tracing::{error, info, warn};

use routebill_app::config::{Config, Theme};
use routebill_types::Language;

use crate::billing_panel::BillingPanel;
use crate::import_panel::ImportPanel;
use crate::items_panel::ItemsPanel;
use crate::session::Session;
use crate::settings_panel::SettingsPanel;
use crate::summary_panel::SummaryPanel;
use crate::vendors_panel::VendorsPanel;

/// Application tab selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Billing,
    Items,
    Vendors,
    Summary,
    Import,
    Settings,
}

impl Tab {
    const ALL: [Tab; 6] = [
        Tab::Billing,
        Tab::Items,
        Tab::Vendors,
        Tab::Summary,
        Tab::Import,
        Tab::Settings,
    ];

    pub fn label(&self, language: Language) -> &'static str {
        match self {
            Tab::Billing => language.pick("Billing", "બિલિંગ"),
            Tab::Items => language.pick("Items", "વસ્તુઓ"),
            Tab::Vendors => language.pick("Vendors", "વેન્ડર"),
            Tab::Summary => language.pick("Summary", "સારાંશ"),
            Tab::Import => language.pick("Import", "આયાત"),
            Tab::Settings => language.pick("Settings", "સેટિંગ્સ"),
        }
    }
}

fn theme_visuals(theme: Theme) -> egui::Visuals {
    match theme {
        Theme::Dark => egui::Visuals::dark(),
        Theme::Light => egui::Visuals::light(),
    }
}

pub struct RoutebillApp {
    current_tab: Tab,
    config: Config,
    /// None when the store could not be opened
    session: Option<Session>,
    session_error: Option<String>,
    billing_panel: BillingPanel,
    items_panel: ItemsPanel,
    vendors_panel: VendorsPanel,
    summary_panel: SummaryPanel,
    import_panel: ImportPanel,
    settings_panel: SettingsPanel,
}

impl RoutebillApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default config");
            Config::default()
        });

        let mut fonts = egui::FontDefinitions::default();
        if let Some(font_data) = Self::load_gujarati_font(config.gujarati_font.as_ref()) {
            fonts.font_data.insert(
                "gujarati".to_owned(),
                egui::FontData::from_owned(font_data).into(),
            );
            // Appended so Latin glyphs keep the default font
            fonts
                .families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .push("gujarati".to_owned());
        } else {
            warn!("No Gujarati font found; Gujarati text will not render");
        }
        cc.egui_ctx.set_fonts(fonts);
        cc.egui_ctx.set_visuals(theme_visuals(config.theme));

        let mut app = Self {
            current_tab: Tab::default(),
            settings_panel: SettingsPanel::new(&config),
            config,
            session: None,
            session_error: None,
            billing_panel: BillingPanel::new(),
            items_panel: ItemsPanel::new(),
            vendors_panel: VendorsPanel::new(),
            summary_panel: SummaryPanel::new(),
            import_panel: ImportPanel::new(),
        };
        app.connect();
        app
    }

    fn load_gujarati_font(configured: Option<&PathBuf>) -> Option<Vec<u8>> {
        let font_paths = [
            "/usr/share/fonts/truetype/noto/NotoSansGujarati-Regular.ttf",
            "/usr/share/fonts/noto/NotoSansGujarati-Regular.ttf",
            "/usr/share/fonts/truetype/lohit-gujarati/Lohit-Gujarati.ttf",
            "C:/Windows/Fonts/shruti.ttf",
            "/System/Library/Fonts/Supplemental/Gujarati Sangam MN.ttc",
        ];

        configured
            .into_iter()
            .cloned()
            .chain(font_paths.iter().map(PathBuf::from))
            .find_map(|path| std::fs::read(path).ok())
    }

    /// (Re)open the store selected by the current config
    fn connect(&mut self) {
        match Session::open(&self.config) {
            Ok(session) => {
                info!(backend = %self.config.backend, "Store opened");
                self.session = Some(session);
                self.session_error = None;
            }
            Err(e) => {
                error!(error = %e, "Failed to open store");
                self.session = None;
                self.session_error = Some(e.user_message());
            }
        }
    }

    fn render_tab_bar(&mut self, ui: &mut egui::Ui) {
        let language = self.config.language;
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;

            for tab in Tab::ALL {
                let selected = self.current_tab == tab;
                if ui.selectable_label(selected, tab.label(language)).clicked() {
                    self.current_tab = tab;
                }
                ui.add_space(8.0);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let icon = match self.config.theme {
                    Theme::Dark => "☀",
                    Theme::Light => "🌙",
                };
                if ui
                    .button(icon)
                    .on_hover_text(language.pick("Light / dark theme", "લાઇટ / ડાર્ક થીમ"))
                    .clicked()
                {
                    self.config.theme = self.config.theme.toggled();
                    ui.ctx().set_visuals(theme_visuals(self.config.theme));
                    if let Err(e) = self.config.save() {
                        warn!(error = %e, "Failed to save theme");
                    }
                }
                ui.add_space(8.0);

                for lang in Language::ALL.iter().rev() {
                    if ui
                        .selectable_label(self.config.language == *lang, lang.to_string())
                        .clicked()
                    {
                        self.config.language = *lang;
                    }
                }
            });
        });
    }

    fn render_disconnected(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.config.language.pick("Store unavailable", "ડેટા ઉપલબ્ધ નથી"));
        ui.add_space(8.0);
        if let Some(msg) = &self.session_error {
            ui.label(egui::RichText::new(msg).color(egui::Color32::LIGHT_RED));
        }
        ui.add_space(8.0);
        if ui.button(self.config.language.pick("Retry", "ફરી પ્રયાસ")).clicked() {
            self.connect();
        }
    }
}

impl eframe::App for RoutebillApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_tab_bar(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let language = self.config.language;

            if self.current_tab == Tab::Settings {
                if self.settings_panel.ui(ui, &mut self.config) {
                    self.connect();
                }
                return;
            }

            let Some(session) = self.session.as_mut() else {
                self.render_disconnected(ui);
                return;
            };

            match self.current_tab {
                Tab::Billing => self.billing_panel.ui(ui, session, language),
                Tab::Items => self.items_panel.ui(ui, session, language),
                Tab::Vendors => self.vendors_panel.ui(ui, session, language),
                Tab::Summary => self.summary_panel.ui(ui, session, &self.config),
                Tab::Import => self.import_panel.ui(ui, session, &self.config),
                Tab::Settings => {}
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_visuals_follow_config() {
        assert!(theme_visuals(Theme::Dark).dark_mode);
        assert!(!theme_visuals(Theme::Light).dark_mode);
        assert!(theme_visuals(Theme::Light.toggled()).dark_mode);
    }
}
