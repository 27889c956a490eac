//! cogmap Configuration Management
//!
//! Handles configuration from environment variables and config files
//! with defaults matching a plain `cogmap map <dir>` run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Document input
    pub input: InputConfig,

    /// Graph accumulation and pruning
    pub graph: GraphConfig,

    /// Tagging backend
    pub tagger: TaggerConfig,

    /// Image rendering
    pub render: RenderConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
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
        if let Ok(dir) = std::env::var("COGMAP_INPUT_DIR") {
            self.input.dir = PathBuf::from(dir);
        }
        if let Ok(output) = std::env::var("COGMAP_OUTPUT") {
            self.render.output = PathBuf::from(output);
        }
        if let Ok(freq) = std::env::var("COGMAP_MIN_ENTITY_FREQ") {
            self.graph.min_entity_freq = freq.parse().map_err(|_| ConfigError::InvalidValue {
                key: "COGMAP_MIN_ENTITY_FREQ".to_string(),
                value: freq,
            })?;
        }

        // Tagger
        if let Ok(backend) = std::env::var("COGMAP_TAGGER") {
            self.tagger.backend = backend.parse()?;
        }
        if let Ok(url) = std::env::var("HF_API_URL") {
            self.tagger.base_url = url;
        }
        if let Ok(token) = std::env::var("HF_API_TOKEN") {
            self.tagger.api_token = Some(token);
        }

        // Render
        if let Ok(font) = std::env::var("COGMAP_FONT") {
            self.render.font_path = Some(PathBuf::from(font));
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }
}

/// Where documents are read from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory scanned for PDF files
    pub dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

/// Graph building configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Entity frequency at which a node survives pruning regardless of degree
    pub min_entity_freq: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { min_entity_freq: 2 }
    }
}

/// Tagging backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Which tagger implementation to use
    pub backend: TaggerBackend,

    /// Inference API base URL
    pub base_url: String,

    /// Entity recognition model
    pub ner_model: String,

    /// Part-of-speech model
    pub pos_model: String,

    /// Bearer token for the inference API
    pub api_token: Option<String>,

    /// Optional TOML lexicon for the offline tagger
    pub lexicon_path: Option<PathBuf>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            backend: TaggerBackend::Http,
            base_url: "https://api-inference.huggingface.co".to_string(),
            ner_model: "dslim/bert-base-NER".to_string(),
            pos_model: "vblagoje/bert-english-uncased-finetuned-pos".to_string(),
            api_token: None,
            lexicon_path: None,
            timeout_secs: 60,
        }
    }
}

/// Supported tagging backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaggerBackend {
    Http,
    Lexicon,
}

impl std::str::FromStr for TaggerBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "lexicon" => Ok(Self::Lexicon),
            _ => Err(ConfigError::InvalidValue {
                key: "COGMAP_TAGGER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TaggerBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Lexicon => write!(f, "lexicon"),
        }
    }
}

/// Image rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output image path
    pub output: PathBuf,

    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Dots per inch, used to convert point sizes to pixels
    pub dpi: f32,

    /// Title drawn above the graph
    pub title: String,

    /// Optimal node distance for the spring layout
    pub layout_k: f32,

    /// Spring layout iterations
    pub iterations: usize,

    /// Seed for the initial node positions
    pub seed: u64,

    /// TrueType/OpenType font used for labels
    pub font_path: Option<PathBuf>,

    /// Open the image in the platform viewer after writing it
    pub show: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("cognitive_map_cleaned.png"),
            // 14 x 10 inches at 300 dpi
            width: 4200,
            height: 3000,
            dpi: 300.0,
            title: "Cleaned Cognitive Map".to_string(),
            layout_k: 0.5,
            iterations: 50,
            seed: 42,
            font_path: None,
            show: true,
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
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
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
