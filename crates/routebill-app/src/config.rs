//! Configuration management for routebill
//!
//! Config stored at: ~/.config/routebill/config.json
//!
//! `ROUTEBILL_SUPABASE_URL` overrides the REST URL in the file; the API key
//! is only ever read from the environment variable named by `api_key_env`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use routebill_types::{ConfigError, Language, Result};

pub const URL_ENV: &str = "ROUTEBILL_SUPABASE_URL";

/// Which store implementation to open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// JSON file in the data directory
    #[default]
    File,
    /// Hosted PostgREST endpoint
    Rest,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::File => write!(f, "file"),
            Backend::Rest => write!(f, "rest"),
        }
    }
}

/// GUI colour scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

/// Letterhead printed at the top of every exported page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub name: String,
    pub address: String,
    pub address2: String,
    pub gstin: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfiles {
    #[serde(default = "default_business_en")]
    pub en: BusinessProfile,
    #[serde(default = "default_business_gu")]
    pub gu: BusinessProfile,
}

impl BusinessProfiles {
    pub fn for_language(&self, language: Language) -> &BusinessProfile {
        match language {
            Language::En => &self.en,
            Language::Gu => &self.gu,
        }
    }
}

impl Default for BusinessProfiles {
    fn default() -> Self {
        Self {
            en: default_business_en(),
            gu: default_business_gu(),
        }
    }
}

fn default_business_en() -> BusinessProfile {
    BusinessProfile {
        name: "JAISWAL SALES".to_string(),
        address: "APMC MARKET ,NEAR BUS STOP,AT PO. TEJGADH, TA. DIST. CHHOTAUDEPUR".to_string(),
        address2: "Bank: State Bank Of India Tejgadh, A/C No: 36107439043, IFSC: SBIN0003845"
            .to_string(),
        gstin: "GSTN NO: 24AAMFJ3444PIZW | PAN: AAMFJ3444P".to_string(),
        contact: "Mo. 8401772172".to_string(),
    }
}

fn default_business_gu() -> BusinessProfile {
    BusinessProfile {
        name: "જયસ્વાલ સેલ્સ".to_string(),
        address: "ખેડૂત પેટ્રોલ પંપની પાસે, હાઇવે રોડ, મોડાસા-૩૮૩૩૧૫".to_string(),
        address2: "જી. અરવલ્લી".to_string(),
        gstin: "જીએસટીએન: 24CVZPS7118B1Z4".to_string(),
        contact: "મો. ૯૯૨૪૫૮૭૩૫૩".to_string(),
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    /// Directory holding the file store (default: platform data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the hosted store, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub rest_url: Option<String>,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub business: BusinessProfiles,

    /// TTF used for Gujarati documents
    #[serde(default)]
    pub gujarati_font: Option<PathBuf>,

    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub theme: Theme,

    /// Where PDFs, spreadsheets and templates are written
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

fn default_api_key_env() -> String {
    "ROUTEBILL_SUPABASE_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_dir: None,
            rest_url: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            business: BusinessProfiles::default(),
            gujarati_font: None,
            language: Language::default(),
            theme: Theme::default(),
            export_dir: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("routebill");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory for the file store
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("routebill");
        Ok(data_dir)
    }

    /// Directory for exported files
    pub fn export_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.export_dir {
            return Ok(dir.clone());
        }
        match dirs::document_dir() {
            Some(dir) => Ok(dir.join("routebill")),
            None => Ok(self.data_dir()?.join("exports")),
        }
    }

    /// Load config from file, or create default; environment overrides applied
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str::<Config>(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?
        } else {
            Config::default()
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.rest_url = Some(url.trim().to_string());
        }
    }

    /// REST URL and API key, or the setting that is missing
    pub fn rest_credentials(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(String, String)> {
        let url = self
            .rest_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingSetting("rest_url".to_string()))?;
        let key = lookup(&self.api_key_env)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingSetting(self.api_key_env.clone()))?;
        Ok((url, key))
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Routebill Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(f, "Backend:        {}", self.backend)?;
        writeln!(
            f,
            "Data dir:       {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(
            f,
            "REST URL:       {}",
            self.rest_url.as_deref().unwrap_or("(not set)")
        )?;
        writeln!(f, "API key env:    {}", self.api_key_env)?;
        writeln!(f, "Timeout:        {}s", self.timeout_secs)?;
        writeln!(f, "Language:       {}", self.language)?;
        writeln!(f, "Theme:          {}", self.theme)?;
        writeln!(
            f,
            "Gujarati font:  {}",
            self.gujarati_font
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in)".to_string())
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
