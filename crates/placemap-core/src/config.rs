use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::category::Categories;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "PLACEMAP_CONFIG";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source spreadsheet
    pub sheet: SheetConfig,

    /// Which rows are kept
    #[serde(default)]
    pub filter: FilterConfig,

    /// Nominatim and the on-disk geocode cache
    #[serde(default)]
    pub geocode: GeocodeConfig,

    /// Service account key lookup
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Generated files
    #[serde(default)]
    pub output: OutputConfig,

    /// Label, color and icon per category
    #[serde(default)]
    pub categories: Categories,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Spreadsheet id from the sheet URL
    pub spreadsheet_id: String,

    /// Worksheet (tab) name
    pub sheet_name: String,

    /// Column letter holding `=IMAGE("...")` formulas
    #[serde(default = "default_image_column")]
    pub image_column: String,

    /// Zero-based column positions of the fields we read
    #[serde(default)]
    pub columns: ColumnsConfig,
}

fn default_image_column() -> String {
    "F".to_string()
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: "1Lat0eMctYh7XL4YrVFR9gC_OF4pCzjBKnscb_S9Sv0c".to_string(),
            sheet_name: "Full Data".to_string(),
            image_column: default_image_column(),
            columns: ColumnsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsConfig {
    pub name: usize,
    pub location: usize,
    #[serde(rename = "type")]
    pub type_text: usize,
    pub summary: usize,
    pub address: usize,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        // A=0 Name, B=1 Location, C=2 Type, E=4 Summary, O=14 Address
        Self {
            name: 0,
            location: 1,
            type_text: 2,
            summary: 4,
            address: 14,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Case-insensitive substring the location column must contain
    pub location_marker: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            location_marker: "sav".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeConfig {
    /// Nominatim base URL (the `/search` path is appended)
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// User-Agent sent to Nominatim, required by its usage policy
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum time between two external geocoding calls
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// JSON file mapping address -> {lat, lng}
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    "savannah-restaurant-map".to_string()
}

/// Floor for the spacing between Nominatim requests.
pub const MIN_GEOCODE_INTERVAL_MS: u64 = 1100;

fn default_min_interval_ms() -> u64 {
    MIN_GEOCODE_INTERVAL_MS
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("geocode_cache.json")
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            min_interval_ms: default_min_interval_ms(),
            timeout_secs: default_timeout_secs(),
            cache_path: default_cache_path(),
        }
    }
}

impl GeocodeConfig {
    pub fn min_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.min_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Environment variable holding the service account key JSON
    #[serde(default = "default_credentials_env")]
    pub env_var: String,

    /// Service account key file, used when the variable is unset
    #[serde(default)]
    pub key_path: Option<PathBuf>,
}

fn default_credentials_env() -> String {
    "GOOGLE_SHEETS_CREDS_JSON".to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            env_var: default_credentials_env(),
            key_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_html_path")]
    pub html_path: PathBuf,

    #[serde(default = "default_kml_path")]
    pub kml_path: PathBuf,

    /// Page title and legend heading
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_kml_document_name")]
    pub kml_document_name: String,

    /// `[lat, lng]` used when there is nothing to fit the map to
    #[serde(default = "default_center")]
    pub default_center: [f64; 2],

    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
}

fn default_html_path() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_kml_path() -> PathBuf {
    PathBuf::from("map.kml")
}

fn default_title() -> String {
    "Savannah Eats & Drinks".to_string()
}

fn default_kml_document_name() -> String {
    "Savannah Restaurants & Bars".to_string()
}

fn default_center() -> [f64; 2] {
    [32.0809, -81.0912]
}

fn default_zoom() -> u8 {
    13
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html_path: default_html_path(),
            kml_path: default_kml_path(),
            title: default_title(),
            kml_document_name: default_kml_document_name(),
            default_center: default_center(),
            default_zoom: default_zoom(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet: SheetConfig::default(),
            filter: FilterConfig::default(),
            geocode: GeocodeConfig::default(),
            credentials: CredentialsConfig::default(),
            output: OutputConfig::default(),
            categories: Categories::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Wrote default configuration to {}", config_path.display());
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors abort with a summary of every failed field.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.sheet.spreadsheet_id.trim().is_empty() {
            result.add_error("sheet.spreadsheet_id", "Spreadsheet id must not be empty");
        }
        if self.sheet.sheet_name.trim().is_empty() {
            result.add_error("sheet.sheet_name", "Sheet name must not be empty");
        }
        let image_column = &self.sheet.image_column;
        if image_column.is_empty() || !image_column.chars().all(|c| c.is_ascii_uppercase()) {
            result.add_error(
                "sheet.image_column",
                format!("Expected a column letter like \"F\", got {:?}", image_column),
            );
        }

        if self.filter.location_marker.trim().is_empty() {
            result.add_error(
                "filter.location_marker",
                "Location marker must not be empty",
            );
        }

        self.validate_url(&self.geocode.nominatim_url, "geocode.nominatim_url", &mut result);

        if self.geocode.user_agent.trim().is_empty() {
            result.add_error("geocode.user_agent", "Nominatim requires a User-Agent");
        }
        if self.geocode.min_interval_ms < MIN_GEOCODE_INTERVAL_MS {
            result.add_error(
                "geocode.min_interval_ms",
                format!(
                    "Must be at least {} ms; Nominatim allows one request per second",
                    MIN_GEOCODE_INTERVAL_MS
                ),
            );
        }
        if self.geocode.timeout_secs == 0 {
            result.add_error("geocode.timeout_secs", "Timeout must be greater than 0");
        }

        if self.output.default_zoom > 19 {
            result.add_error("output.default_zoom", "Zoom must be between 0 and 19");
        }
        let [lat, lng] = self.output.default_center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            result.add_error(
                "output.default_center",
                format!("Not a valid [lat, lng] pair: [{}, {}]", lat, lng),
            );
        }

        for (category, style) in self.categories.iter() {
            if !is_hex_color(&style.color) {
                result.add_error(
                    format!("categories.{}.color", category.key()),
                    format!("Expected #RRGGBB, got {:?}", style.color),
                );
            }
            if style.label.trim().is_empty() {
                result.add_warning(
                    format!("categories.{}.label", category.key()),
                    "Empty label",
                );
            }
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// `$PLACEMAP_CONFIG`, else `<config dir>/placemap/config.toml`
    fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("placemap");

        Ok(config_dir.join("config.toml"))
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}
