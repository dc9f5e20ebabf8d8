//! Translation of the flat legacy search widget format.
//!
//! Legacy views persist an ordered list of `{field, input, label}` records plus a
//! layout name, search mode and clear-button flag. Each record becomes one modern
//! field, the row layout assigns positions, and the required controls are appended.

use entryview_config::{LegacyFieldRecord, LegacySearchSettings};
use entryview_core::DateBounds;
use tracing::{debug, warn};

use crate::collection::{RequiredFieldsConfig, SearchFieldCollection};
use crate::fields::SearchField;
use crate::layout::{DEFAULT_AREA, SearchLayout, apply_row_layout};
use crate::parameters::SearchMode;
use crate::registry::FieldRegistry;

/// Translate one legacy record. `None` when the registry has no such field.
pub fn translate_legacy_record(
    record: &LegacyFieldRecord,
    registry: &FieldRegistry,
    form_id: &str,
) -> Option<SearchField> {
    let field_id = record.field.trim();
    if field_id.is_empty() {
        return None;
    }

    let Some(mut field) = registry.get_field_by_field_id(form_id, field_id) else {
        debug!(form_id = %form_id, field_id = %field_id, "Legacy search field not available");
        return None;
    };

    if !record.label.trim().is_empty() {
        field = field.with_label(record.label.trim());
    }
    if !record.input.trim().is_empty() {
        field = field.with_input(record.input.trim());
    }
    Some(field.at_position(DEFAULT_AREA))
}

impl SearchFieldCollection {
    /// Build from the legacy format.
    ///
    /// Malformed serialized field lists yield only the required controls. Date range
    /// fields carry `bounds` when given.
    pub fn from_legacy_configuration(
        legacy: &LegacySearchSettings,
        bounds: Option<&DateBounds>,
        registry: &FieldRegistry,
        form_id: &str,
    ) -> Self {
        let records = match legacy.search_fields.records() {
            Ok(records) => records,
            Err(e) => {
                warn!(form_id = %form_id, error = %e, "Ignoring malformed legacy search fields");
                Vec::new()
            }
        };

        let translated = Self::for_form(form_id).with_fields(
            records
                .iter()
                .filter_map(|record| translate_legacy_record(record, registry, form_id)),
        );

        let layout = SearchLayout::parse_lenient(legacy.search_layout.as_deref());
        let mut collection = apply_row_layout(&translated, DEFAULT_AREA, layout);

        collection.ensure_required_search_fields(Some(&RequiredFieldsConfig {
            search_mode: legacy
                .search_mode
                .as_deref()
                .map(|mode| SearchMode::parse_lenient(Some(mode))),
            search_clear: legacy.search_clear,
        }));

        if let Some(bounds) = bounds {
            if collection.has_date_field() {
                collection.apply_date_bounds(*bounds);
            }
        }

        debug!(
            form_id = %form_id,
            records = records.len(),
            fields = collection.len(),
            layout = %layout,
            "Translated legacy search configuration"
        );
        collection
    }
}
