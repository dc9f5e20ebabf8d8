//! Source form field descriptors.
//!
//! A descriptor is what the form backend reports about one of its fields. The
//! search registry wraps each descriptor (and each of its sub-inputs) in a
//! searchable field adapter.

use serde::{Deserialize, Serialize};

/// A sub-input of a compound source field (e.g. the first-name part of a name field).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInput {
    /// Dotted id, e.g. `4.3`
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// A field on a source form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFieldDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub inputs: Vec<SourceInput>,
    /// Search input controls this field can be rendered with
    #[serde(default)]
    pub available_input_types: Vec<String>,
}

impl SourceFieldDescriptor {
    pub fn new(
        id: impl Into<String>,
        field_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field_type: field_type.into(),
            label: label.into(),
            inputs: Vec::new(),
            available_input_types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_input(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.inputs.push(SourceInput {
            id: id.into(),
            label: label.into(),
        });
        self
    }
}
