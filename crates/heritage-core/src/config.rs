//! Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with defaults suited to the Albanian heritage corpus.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Output rendering
    pub output: OutputConfig,

    /// Fallback annotator settings
    pub annotator: AnnotatorConfig,

    /// Calendar-date parsing
    pub dates: DateConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(iri) = std::env::var("HERITAGE_BASE_IRI") {
            config.output.base_iri = iri;
        }
        if let Ok(format) = std::env::var("HERITAGE_OUTPUT_FORMAT") {
            config.output.format = format.parse()?;
        }

        // Gazetteer from environment variable (comma-separated)
        if let Ok(places) = std::env::var("HERITAGE_PLACES") {
            config.annotator.places = split_list(&places);
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        // Only override if env values differ from defaults
        if env_config.output.base_iri != OutputConfig::default().base_iri {
            self.output.base_iri = env_config.output.base_iri;
        }
        if env_config.output.format != OutputConfig::default().format {
            self.output.format = env_config.output.format;
        }
        if std::env::var("HERITAGE_PLACES").is_ok() {
            self.annotator.places = env_config.annotator.places;
        }
        if env_config.logging.level != LoggingConfig::default().level {
            self.logging.level = env_config.logging.level;
        }

        Ok(self)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// IRI bound to the empty prefix
    pub base_iri: String,

    /// Rendering format
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_iri: "http://www.semanticweb.org/ana/ontologies/2025/4/albania/".to_string(),
            format: OutputFormat::Turtle,
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Turtle,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "turtle" | "ttl" => Ok(Self::Turtle),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "HERITAGE_OUTPUT_FORMAT".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Rule-based annotator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Place names tagged as GPE
    pub places: Vec<String>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        let places = [
            "Albania",
            "Tirana",
            "Voskopoja",
            "Gjirokastër",
            "Gjirokastra",
            "Butrint",
            "Berat",
            "Shkodër",
            "Shkodra",
            "Durrës",
            "Korçë",
            "Elbasan",
            "Vlorë",
            "Krujë",
            "Apollonia",
            "Tepelena",
            "Ksamil",
            "Saranda",
            "Greece",
            "Italy",
            "Kosovo",
        ];

        Self {
            places: places.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Date parser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// chrono formats tried in order; a bare year is always accepted
    pub formats: Vec<String>,
}

impl Default for DateConfig {
    fn default() -> Self {
        let formats = [
            "%Y-%m-%d",
            "%Y/%m/%d",
            "%m/%d/%Y",
            "%B %d, %Y",
            "%B %d %Y",
            "%d %B %Y",
            "%d %B, %Y",
        ];

        Self {
            formats: formats.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
