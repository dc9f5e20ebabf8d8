//! Ordered, position-keyed set of configured search fields.
//!
//! Fields are kept in one `Vec` grouped by position: positions in first-seen order, fields
//! in insertion order inside a position. A UID index sits alongside.

use std::collections::HashMap;
use std::sync::Arc;

use entryview_config::{FieldConfig, SearchFieldsConfig};
use entryview_core::{DateBounds, RequestArgs, ViewerContext};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::fields::{SearchField, SearchFieldKind};
use crate::layout::{ACTIONS_AREA, DEFAULT_AREA};
use crate::parameters::SearchMode;
use crate::parser::FilterIntent;
use crate::registry::FieldRegistry;

/// Settings for the submit and mode-selector controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequiredFieldsConfig {
    pub search_mode: Option<SearchMode>,
    pub search_clear: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchFieldCollection {
    fields: Vec<SearchField>,
    by_uid: HashMap<String, usize>,
    form_id: Option<String>,
    parent: Option<Arc<SearchFieldCollection>>,
}

impl PartialEq for SearchFieldCollection {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields && self.form_id == other.form_id
    }
}

impl SearchFieldCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty collection for a view over `form_id`.
    pub fn for_form(form_id: impl Into<String>) -> Self {
        Self {
            form_id: Some(form_id.into()),
            ..Self::default()
        }
    }

    /// Build from the modern nested `position -> UID -> field` configuration.
    ///
    /// Entries whose id/type the registry cannot resolve are skipped.
    pub fn from_configuration(
        config: &SearchFieldsConfig,
        registry: &FieldRegistry,
        form_id: &str,
    ) -> Self {
        let mut collection = Self::for_form(form_id);

        for (position, entries) in config {
            for (key, field_config) in entries {
                let lookup_form = field_config.form_id.as_deref().unwrap_or(form_id);
                let Some(definition) = registry.resolve(
                    lookup_form,
                    &field_config.id,
                    field_config.field_type.as_deref(),
                ) else {
                    warn!(
                        position = %position,
                        uid = %key,
                        field_id = %field_config.id,
                        field_type = field_config.field_type.as_deref().unwrap_or_default(),
                        "Skipping search field that cannot be resolved"
                    );
                    continue;
                };

                let uid = field_config
                    .uid
                    .as_deref()
                    .filter(|uid| !uid.is_empty())
                    .unwrap_or(key);
                let mut field = SearchField::from_config(&definition, field_config, position, uid);
                field.clear_own_form(form_id);
                collection.insert(field);
            }
        }

        debug!(form_id = %form_id, fields = collection.len(), "Loaded search field configuration");
        collection
    }

    /// Serialize back into the nested configuration shape.
    pub fn to_configuration(&self) -> SearchFieldsConfig {
        let mut config = SearchFieldsConfig::new();
        for field in &self.fields {
            let position = field.position().unwrap_or(DEFAULT_AREA).to_string();
            let entries: &mut IndexMap<String, FieldConfig> = config.entry(position).or_default();
            entries.insert(field.uid().to_string(), field.to_config());
        }
        config
    }

    /// Append fields. Missing positions default to the general area; missing or
    /// duplicate UIDs are generated.
    pub fn add(&mut self, fields: impl IntoIterator<Item = SearchField>) {
        for field in fields {
            self.insert(field);
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = SearchField>) -> Self {
        self.add(fields);
        self
    }

    fn insert(&mut self, mut field: SearchField) {
        if !field.has_uid() {
            let uid = self.next_uid(field.type_name());
            field.set_uid(uid);
        } else if self.by_uid.contains_key(field.uid()) {
            let uid = self.next_uid(field.type_name());
            warn!(uid = %field.uid(), replacement = %uid, "Duplicate search field UID");
            field.set_uid(uid);
        }
        if field.position().is_none_or(str::is_empty) {
            field.set_position(DEFAULT_AREA.to_string());
        }

        let index = self
            .fields
            .iter()
            .rposition(|existing| existing.position() == field.position())
            .map_or(self.fields.len(), |last| last + 1);
        self.fields.insert(index, field);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.by_uid = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.uid().to_string(), index))
            .collect();
    }

    fn next_uid(&self, type_name: &str) -> String {
        (1..)
            .map(|n| format!("{type_name}_{n}"))
            .find(|uid| !self.by_uid.contains_key(uid))
            .unwrap_or_else(|| type_name.to_string())
    }

    fn derive(&self, fields: Vec<SearchField>, parent: Option<Arc<Self>>) -> Self {
        let mut collection = Self {
            fields,
            by_uid: HashMap::new(),
            form_id: self.form_id.clone(),
            parent,
        };
        collection.reindex();
        collection
    }

    pub fn get(&self, uid: &str) -> Option<&SearchField> {
        self.by_uid.get(uid).map(|&index| &self.fields[index])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in position order, insertion order within a position.
    pub fn iter(&self) -> impl Iterator<Item = &SearchField> {
        self.fields.iter()
    }

    pub fn form_id(&self) -> Option<&str> {
        self.form_id.as_deref()
    }

    /// Distinct positions in first-seen order.
    pub fn positions(&self) -> Vec<&str> {
        let mut positions: Vec<&str> = Vec::new();
        for position in self.fields.iter().filter_map(SearchField::position) {
            if !positions.contains(&position) {
                positions.push(position);
            }
        }
        positions
    }

    pub fn by_type(&self, type_name: &str) -> Self {
        let fields = self
            .fields
            .iter()
            .filter(|field| field.type_name() == type_name)
            .cloned()
            .collect();
        self.derive(fields, None)
    }

    /// Fields at `position`. A trailing `*` matches positions by prefix.
    ///
    /// The result keeps a snapshot of this collection as its parent.
    pub fn by_position(&self, position: &str) -> Self {
        let matches = |candidate: Option<&str>| match position.strip_suffix('*') {
            Some(prefix) => candidate.is_some_and(|c| c.starts_with(prefix)),
            None => candidate == Some(position),
        };
        let fields = self
            .fields
            .iter()
            .filter(|field| matches(field.position()))
            .cloned()
            .collect();
        self.derive(fields, Some(Arc::new(self.clone())))
    }

    pub fn has_fields_of_type(&self, type_name: &str) -> bool {
        self.fields.iter().any(|field| field.type_name() == type_name)
    }

    /// Entry date fields or fields rendered as a date range control.
    pub fn has_date_field(&self) -> bool {
        self.fields.iter().any(SearchField::is_date_range)
    }

    /// Whether any field is visible to the viewer.
    ///
    /// Without `strict`, a positional sub-collection also answers for its parent.
    pub fn has_visible_fields(&self, ctx: &ViewerContext, strict: bool) -> bool {
        if self.fields.iter().any(|field| field.is_visible(ctx)) {
            return true;
        }
        !strict
            && self
                .parent
                .as_deref()
                .is_some_and(|parent| parent.has_visible_fields(ctx, false))
    }

    /// True when `args` carries a non-blank value under a key some field reads.
    pub fn has_request_values(&self, args: &RequestArgs) -> bool {
        self.fields.iter().any(|field| {
            field
                .request_keys()
                .iter()
                .filter_map(|key| args.get(key))
                .any(|value| !value.is_blank())
        })
    }

    /// Make sure exactly one submit and one mode-selector field exist.
    ///
    /// Missing controls are appended to the actions area; duplicates are removed.
    /// Calling this again with the same input changes nothing.
    pub fn ensure_required_search_fields(&mut self, config: Option<&RequiredFieldsConfig>) {
        let config = config.copied().unwrap_or_default();

        for kind in [SearchFieldKind::Submit, SearchFieldKind::ModeSelector] {
            let type_name = kind.type_name().to_string();
            let mut seen = false;
            let before = self.fields.len();
            self.fields.retain(|field| {
                if field.type_name() != type_name {
                    return true;
                }
                !std::mem::replace(&mut seen, true)
            });
            if self.fields.len() != before {
                debug!(field_type = %type_name, "Removed duplicate required search field");
                self.reindex();
            }
            if !seen {
                self.insert(SearchField::new(kind).at_position(ACTIONS_AREA));
            }
        }

        for field in &mut self.fields {
            if matches!(field.kind(), SearchFieldKind::Submit) {
                let clear = config
                    .search_clear
                    .or_else(|| field.setting("search_clear").and_then(Value::as_bool));
                field.set_setting("search_clear", Value::Bool(clear.unwrap_or(false)));
            } else if matches!(field.kind(), SearchFieldKind::ModeSelector) {
                let mode = config.search_mode.unwrap_or_else(|| {
                    SearchMode::parse_lenient(field.setting("mode").and_then(Value::as_str))
                });
                field.set_setting("mode", Value::from(mode.as_str()));
            }
        }
    }

    /// Attach date bounds to every date range field.
    pub fn apply_date_bounds(&mut self, bounds: DateBounds) {
        for field in self.fields.iter_mut().filter(|f| f.is_date_range()) {
            field.set_date_bounds(bounds);
        }
    }

    /// Render-ready data for searchable fields the viewer can see.
    pub fn to_template_data(&self, ctx: &ViewerContext, args: &RequestArgs) -> Vec<Map<String, Value>> {
        self.fields
            .iter()
            .filter(|field| field.is_searchable() && field.is_visible(ctx))
            .map(|field| field.template_data(args))
            .collect()
    }

    /// The configured field a filter intent refers to.
    ///
    /// The collection's own form counts as no form on either side.
    pub fn find_for_intent(&self, intent: &FilterIntent) -> Option<&SearchField> {
        let own_form = self.form_id.as_deref();
        let intent_form = intent
            .form_id
            .as_deref()
            .filter(|form| Some(*form) != own_form);

        self.fields.iter().find(|field| {
            let field_form = field.form_id().filter(|form| Some(*form) != own_form);
            field.is_searchable() && field.field_id() == intent.key && field_form == intent_form
        })
    }
}

impl<'a> IntoIterator for &'a SearchFieldCollection {
    type Item = &'a SearchField;
    type IntoIter = std::slice::Iter<'a, SearchField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
