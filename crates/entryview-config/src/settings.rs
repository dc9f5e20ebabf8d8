use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use entryview_core::SourceFieldDescriptor;

use crate::bounds::BoundsConfig;
use crate::{ConfigError, Result};

/// Persisted configuration of one search field.
///
/// Only `id` is required; the search crate fills the rest from the field's
/// registry definition. Settings this struct does not name are kept verbatim
/// in `settings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(rename = "UID", alias = "uid", default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_label: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_loggedin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl FieldConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    #[must_use]
    pub fn only_loggedin(mut self) -> Self {
        self.only_loggedin = Some(true);
        self
    }
}

/// Current search layout format: position → UID → field configuration.
pub type SearchFieldsConfig = IndexMap<String, IndexMap<String, FieldConfig>>;

/// One record of the legacy flat field list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyFieldRecord {
    pub field: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub label: String,
}

/// The legacy field list, stored either as a JSON-encoded string or as a plain array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyFieldList {
    Serialized(String),
    Records(Vec<LegacyFieldRecord>),
}

impl Default for LegacyFieldList {
    fn default() -> Self {
        Self::Records(Vec::new())
    }
}

impl LegacyFieldList {
    /// Decode the stored records.
    pub fn records(&self) -> Result<Vec<LegacyFieldRecord>> {
        match self {
            Self::Records(records) => Ok(records.clone()),
            Self::Serialized(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Self::Serialized(raw) => serde_json::from_str(raw).map_err(|e| {
                ConfigError::parse(format!("legacy search_fields is not valid JSON: {e}"))
            }),
        }
    }
}

/// Legacy search widget settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySearchSettings {
    #[serde(default)]
    pub search_fields: LegacyFieldList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_clear: Option<bool>,
}

/// A view's search widget, in whichever format it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum SearchWidgetConfig {
    Modern {
        #[serde(default)]
        fields: SearchFieldsConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        search_mode: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        search_clear: Option<bool>,
    },
    Legacy(LegacySearchSettings),
}

impl Default for SearchWidgetConfig {
    fn default() -> Self {
        Self::Modern {
            fields: SearchFieldsConfig::new(),
            search_mode: None,
            search_clear: None,
        }
    }
}

impl SearchWidgetConfig {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    pub fn search_mode(&self) -> Option<&str> {
        match self {
            Self::Modern { search_mode, .. } => search_mode.as_deref(),
            Self::Legacy(legacy) => legacy.search_mode.as_deref(),
        }
    }

    pub fn search_clear(&self) -> Option<bool> {
        match self {
            Self::Modern { search_clear, .. } => *search_clear,
            Self::Legacy(legacy) => legacy.search_clear,
        }
    }
}

/// Everything persisted about one view that the search pipeline reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub form_id: String,
    #[serde(default)]
    pub search: SearchWidgetConfig,
    #[serde(default)]
    pub bounds: BoundsConfig,
    /// Source form field descriptors keyed by form id
    #[serde(default)]
    pub forms: IndexMap<String, Vec<SourceFieldDescriptor>>,
}

impl ViewSettings {
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            ..Default::default()
        }
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.form_id.trim().is_empty() {
            return Err(ConfigError::validation("form_id must not be empty"));
        }
        if let SearchWidgetConfig::Modern { fields, .. } = &self.search {
            for (position, entries) in fields {
                if position.trim().is_empty() {
                    return Err(ConfigError::validation("search field position must not be empty"));
                }
                if let Some((uid, _)) = entries.iter().find(|(_, f)| f.id.trim().is_empty()) {
                    return Err(ConfigError::validation(format!(
                        "search field '{uid}' in '{position}' has no id"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_config_keeps_unknown_settings() {
        let config: FieldConfig = serde_json::from_value(json!({
            "id": "4",
            "label": "Color",
            "placeholder": "Pick one"
        }))
        .unwrap();
        assert_eq!(config.id, "4");
        assert_eq!(config.label.as_deref(), Some("Color"));
        assert_eq!(config.settings.get("placeholder"), Some(&json!("Pick one")));

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back, json!({"id": "4", "label": "Color", "placeholder": "Pick one"}));
    }

    #[test]
    fn legacy_list_accepts_string_and_array() {
        let serialized = LegacyFieldList::Serialized(
            r#"[{"field":"search_all","input":"input_text","label":"Search"}]"#.to_string(),
        );
        let records = serialized.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field, "search_all");

        let array: LegacyFieldList =
            serde_json::from_value(json!([{"field": "entry_date", "input": "date_range"}])).unwrap();
        assert_eq!(array.records().unwrap()[0].input, "date_range");
    }

    #[test]
    fn legacy_list_reports_broken_json() {
        let broken = LegacyFieldList::Serialized("[{\"field\":".to_string());
        assert!(matches!(broken.records(), Err(ConfigError::Parse(_))));
        assert!(LegacyFieldList::Serialized(String::new()).records().unwrap().is_empty());
    }

    #[test]
    fn widget_format_tag() {
        let legacy: SearchWidgetConfig = serde_json::from_value(json!({
            "format": "legacy",
            "search_fields": [],
            "search_layout": "vertical",
            "search_mode": "all"
        }))
        .unwrap();
        assert!(legacy.is_legacy());
        assert_eq!(legacy.search_mode(), Some("all"));

        let modern: SearchWidgetConfig = serde_json::from_value(json!({
            "format": "modern",
            "fields": {"search-general": {"a1": {"id": "search_all"}}},
            "search_clear": true
        }))
        .unwrap();
        assert!(!modern.is_legacy());
        assert_eq!(modern.search_clear(), Some(true));
    }

    #[test]
    fn validate_rejects_empty_form_id() {
        assert!(ViewSettings::new("").validate().is_err());
        assert!(ViewSettings::new("12").validate().is_ok());
    }
}
