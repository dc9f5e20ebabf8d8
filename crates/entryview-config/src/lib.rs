//! Persisted view configuration for EntryView search.
//!
//! A view (a record collection shown to visitors) stores:
//! - its search widget layout, either in the current nested format or the legacy flat format
//! - default `search_mode` and `search_clear` settings
//! - date bounds that limit which entries can ever be searched
//! - descriptors for the source form fields the view draws from
//!
//! Settings are read from TOML or JSON files; nothing here writes back.

pub mod bounds;
pub mod loader;
pub mod settings;

pub use bounds::{BoundsConfig, DateBound, RelativeUnit};
pub use loader::{load_view_settings, ConfigFormat};
pub use settings::{
    FieldConfig, LegacyFieldList, LegacyFieldRecord, LegacySearchSettings, SearchFieldsConfig,
    SearchWidgetConfig, ViewSettings,
};

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
