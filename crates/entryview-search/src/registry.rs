//! Registry of searchable field definitions.
//!
//! The registry answers "which fields can a view over form X offer?". Candidates are the
//! built-in kinds, one adapter per source form field (and per sub-input), and whatever
//! registered [`FieldRegistrant`]s add, remove or reorder.
//!
//! Results are memoized per form in a DashMap, so one compilation never asks the
//! [`FieldSource`] about the same form twice.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use entryview_config::ViewSettings;
use entryview_core::SourceFieldDescriptor;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::fields::{FORM_FIELD_TYPE, FormFieldRef, SearchField, SearchFieldKind};

/// Looks up the field descriptors of a source form.
pub trait FieldSource: Send + Sync {
    fn fields_for_form(&self, form_id: &str) -> Vec<SourceFieldDescriptor>;
}

/// A [`FieldSource`] backed by descriptors loaded with the view settings.
#[derive(Debug, Clone, Default)]
pub struct StaticFieldSource {
    forms: IndexMap<String, Vec<SourceFieldDescriptor>>,
}

impl StaticFieldSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &ViewSettings) -> Self {
        Self {
            forms: settings.forms.clone(),
        }
    }

    #[must_use]
    pub fn with_form(
        mut self,
        form_id: impl Into<String>,
        fields: Vec<SourceFieldDescriptor>,
    ) -> Self {
        self.forms.insert(form_id.into(), fields);
        self
    }
}

impl FieldSource for StaticFieldSource {
    fn fields_for_form(&self, form_id: &str) -> Vec<SourceFieldDescriptor> {
        self.forms.get(form_id).cloned().unwrap_or_default()
    }
}

/// Extension hook over the candidate field list.
///
/// Registrants run in registration order; each receives the previous one's output.
pub trait FieldRegistrant: Send + Sync {
    fn name(&self) -> &str;

    fn filter_fields(&self, candidates: Vec<SearchField>, form_id: &str) -> Vec<SearchField>;
}

/// A [`FieldRegistrant`] wrapping a closure.
pub struct FnRegistrant<F> {
    name: String,
    filter: F,
}

impl<F> FnRegistrant<F>
where
    F: Fn(Vec<SearchField>, &str) -> Vec<SearchField> + Send + Sync,
{
    pub fn new(name: impl Into<String>, filter: F) -> Self {
        Self {
            name: name.into(),
            filter,
        }
    }
}

impl<F> FieldRegistrant for FnRegistrant<F>
where
    F: Fn(Vec<SearchField>, &str) -> Vec<SearchField> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn filter_fields(&self, candidates: Vec<SearchField>, form_id: &str) -> Vec<SearchField> {
        (self.filter)(candidates, form_id)
    }
}

pub struct FieldRegistry {
    source: Arc<dyn FieldSource>,
    registrants: Vec<Arc<dyn FieldRegistrant>>,
    cache: DashMap<String, Arc<Vec<SearchField>>>,
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registrants: Vec<_> = self.registrants.iter().map(|r| r.name()).collect();
        f.debug_struct("FieldRegistry")
            .field("registrants", &registrants)
            .field("cached_forms", &self.cache.len())
            .finish()
    }
}

impl FieldRegistry {
    pub fn new(source: Arc<dyn FieldSource>) -> Self {
        Self {
            source,
            registrants: Vec::new(),
            cache: DashMap::new(),
        }
    }

    /// A registry over the source form descriptors stored in `settings`.
    pub fn from_settings(settings: &ViewSettings) -> Self {
        Self::new(Arc::new(StaticFieldSource::from_settings(settings)))
    }

    /// Append a registrant. Cached candidate lists are discarded.
    pub fn register(&mut self, registrant: Arc<dyn FieldRegistrant>) {
        debug!(registrant = %registrant.name(), "Registered search field registrant");
        self.registrants.push(registrant);
        self.cache.clear();
    }

    #[must_use]
    pub fn with_registrant(mut self, registrant: Arc<dyn FieldRegistrant>) -> Self {
        self.register(registrant);
        self
    }

    /// Built-in fields that exist for every form.
    pub fn builtin_fields() -> Vec<SearchField> {
        SearchFieldKind::builtins()
            .into_iter()
            .map(SearchField::new)
            .collect()
    }

    /// Every field a view over `form_id` can offer, after all registrants have run.
    pub fn available_fields(&self, form_id: &str) -> Arc<Vec<SearchField>> {
        if let Some(cached) = self.cache.get(form_id) {
            return Arc::clone(cached.value());
        }

        let mut candidates = Self::builtin_fields();
        for descriptor in self.source.fields_for_form(form_id) {
            for field in FormFieldRef::from_descriptor(&descriptor) {
                if field.field_id.trim().is_empty() {
                    warn!(form_id = %form_id, label = %field.source_label, "Skipping source field without an id");
                    continue;
                }
                candidates.push(SearchField::new(SearchFieldKind::FormField(field)));
            }
        }

        for registrant in &self.registrants {
            candidates = registrant.filter_fields(candidates, form_id);
        }

        debug!(form_id = %form_id, fields = candidates.len(), "Resolved available search fields");
        let fields = Arc::new(candidates);
        self.cache.insert(form_id.to_string(), Arc::clone(&fields));
        fields
    }

    pub fn get_field_by_field_id(&self, form_id: &str, field_id: &str) -> Option<SearchField> {
        self.available_fields(form_id)
            .iter()
            .find(|field| field.field_id() == field_id)
            .cloned()
    }

    pub fn get_field_by_type(&self, form_id: &str, type_name: &str) -> Option<SearchField> {
        self.available_fields(form_id)
            .iter()
            .find(|field| field.type_name() == type_name)
            .cloned()
    }

    /// Resolve a persisted `id`/`type` pair to a field definition.
    ///
    /// A field matching both wins. A form field type only resolves by id; other types fall
    /// back to the first field of that type.
    pub fn resolve(
        &self,
        form_id: &str,
        field_id: &str,
        field_type: Option<&str>,
    ) -> Option<SearchField> {
        let fields = self.available_fields(form_id);
        let by_id = || fields.iter().find(|field| field.field_id() == field_id);

        let found = match field_type.filter(|t| !t.is_empty()) {
            None => by_id(),
            Some(FORM_FIELD_TYPE) => fields
                .iter()
                .find(|field| field.type_name() == FORM_FIELD_TYPE && field.field_id() == field_id),
            Some(field_type) => fields
                .iter()
                .find(|field| field.type_name() == field_type && field.field_id() == field_id)
                .or_else(|| fields.iter().find(|field| field.type_name() == field_type))
                .or_else(by_id),
        };
        found.cloned()
    }
}
