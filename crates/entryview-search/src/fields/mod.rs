//! Search field variants.
//!
//! A [`SearchField`] is one configured, positioned instance of a field type. The
//! type itself is a [`SearchFieldKind`]: a closed set of built-in kinds plus
//! [`SearchFieldKind::Custom`] for types registered by extensions.

pub mod custom;
pub mod source;

use std::mem;
use std::sync::Arc;

use entryview_config::FieldConfig;
use entryview_core::{DateBounds, RequestArgs, RequestValue, ViewerContext, format_search_date};
use serde_json::{Map, Value};

pub use custom::CustomFieldType;
pub use source::{FormFieldRef, SourceFamily};

use crate::parameters::Operator;
use crate::parser::SearchRequestParser;

pub const SEARCH_ALL_TYPE: &str = "search_all";
pub const ENTRY_ID_TYPE: &str = "entry_id";
pub const ENTRY_DATE_TYPE: &str = "entry_date";
pub const CREATED_BY_TYPE: &str = "created_by";
pub const IS_STARRED_TYPE: &str = "is_starred";
pub const IS_READ_TYPE: &str = "is_read";
pub const SUBMIT_TYPE: &str = "submit";
pub const SEARCH_MODE_TYPE: &str = "search_mode";
pub const FORM_FIELD_TYPE: &str = "form_field";

/// Input control that renders a start/end date pair.
pub const DATE_RANGE_INPUT: &str = "date_range";

const SEARCH_ALL_OPERATORS: &[Operator] = &[Operator::Contains];
const ENTRY_ID_OPERATORS: &[Operator] = &[Operator::Eq, Operator::In];
const ENTRY_DATE_OPERATORS: &[Operator] = &[Operator::Eq, Operator::Ge, Operator::Le];
const CREATED_BY_OPERATORS: &[Operator] = &[Operator::Eq, Operator::In];
const FLAG_OPERATORS: &[Operator] = &[Operator::Eq, Operator::Is, Operator::IsNot];

/// The type of a search field.
#[derive(Debug, Clone)]
pub enum SearchFieldKind {
    /// Free-text search across every field
    AllFields,
    EntryId,
    EntryDate,
    CreatedBy,
    IsStarred,
    IsRead,
    Submit,
    /// Lets the visitor pick `any` or `all`
    ModeSelector,
    FormField(FormFieldRef),
    Custom(Arc<dyn CustomFieldType>),
}

impl PartialEq for SearchFieldKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::FormField(a), Self::FormField(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => a.type_name() == b.type_name(),
            (a, b) => mem::discriminant(a) == mem::discriminant(b),
        }
    }
}

impl SearchFieldKind {
    /// Built-in kinds that do not depend on a source form, in registry order.
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::AllFields,
            Self::EntryId,
            Self::EntryDate,
            Self::CreatedBy,
            Self::IsStarred,
            Self::IsRead,
            Self::Submit,
            Self::ModeSelector,
        ]
    }

    pub fn type_name(&self) -> &str {
        match self {
            Self::AllFields => SEARCH_ALL_TYPE,
            Self::EntryId => ENTRY_ID_TYPE,
            Self::EntryDate => ENTRY_DATE_TYPE,
            Self::CreatedBy => CREATED_BY_TYPE,
            Self::IsStarred => IS_STARRED_TYPE,
            Self::IsRead => IS_READ_TYPE,
            Self::Submit => SUBMIT_TYPE,
            Self::ModeSelector => SEARCH_MODE_TYPE,
            Self::FormField(_) => FORM_FIELD_TYPE,
            Self::Custom(custom) => custom.type_name(),
        }
    }

    /// Id used in configuration, request keys and criteria.
    pub fn field_id(&self) -> &str {
        match self {
            Self::FormField(field) => &field.field_id,
            Self::Custom(custom) => custom.field_id(),
            other => other.type_name(),
        }
    }

    pub fn default_label(&self) -> &str {
        match self {
            Self::AllFields => "Search Everything",
            Self::EntryId => "Entry ID",
            Self::EntryDate => "Entry Date",
            Self::CreatedBy => "Entry Creator",
            Self::IsStarred => "Is Starred",
            Self::IsRead => "Is Read",
            Self::Submit => "Search",
            Self::ModeSelector => "Search Mode",
            Self::FormField(field) if !field.source_label.is_empty() => &field.source_label,
            Self::FormField(field) => &field.field_id,
            Self::Custom(custom) => custom.default_label(),
        }
    }

    pub fn allowed_operators(&self) -> &[Operator] {
        match self {
            Self::AllFields => SEARCH_ALL_OPERATORS,
            Self::EntryId => ENTRY_ID_OPERATORS,
            Self::EntryDate => ENTRY_DATE_OPERATORS,
            Self::CreatedBy => CREATED_BY_OPERATORS,
            Self::IsStarred | Self::IsRead => FLAG_OPERATORS,
            Self::Submit | Self::ModeSelector => &[],
            Self::FormField(field) => field.family().operators(),
            Self::Custom(custom) => custom.allowed_operators(),
        }
    }

    pub fn default_input(&self) -> &str {
        match self {
            Self::AllFields | Self::EntryId => "input_text",
            Self::EntryDate => DATE_RANGE_INPUT,
            Self::CreatedBy => "select",
            Self::IsStarred | Self::IsRead => "checkbox",
            Self::Submit => "submit",
            Self::ModeSelector => "hidden",
            Self::FormField(field) => field.default_input(),
            Self::Custom(custom) => custom.default_input(),
        }
    }

    /// Structural controls (submit, mode selector) are not searchable.
    pub fn is_searchable(&self) -> bool {
        match self {
            Self::Submit | Self::ModeSelector => false,
            Self::Custom(custom) => custom.is_searchable(),
            _ => true,
        }
    }

    /// Request keys this kind reads its value from.
    pub fn request_keys(&self) -> Vec<String> {
        match self {
            Self::AllFields => vec!["gv_search".to_string()],
            Self::EntryId => vec!["gv_id".to_string()],
            Self::EntryDate => vec!["gv_start".to_string(), "gv_end".to_string()],
            Self::CreatedBy => vec!["gv_by".to_string()],
            Self::IsStarred | Self::IsRead => {
                vec![SearchRequestParser::encode_field_key(self.type_name(), None)]
            }
            Self::Submit | Self::ModeSelector => Vec::new(),
            Self::FormField(field) => {
                let filter_key =
                    SearchRequestParser::encode_field_key(&field.field_id, field.form_id.as_deref());
                let input_key = filter_key.replacen("filter_", "input_", 1);
                vec![filter_key, input_key]
            }
            Self::Custom(custom) => custom.request_keys(),
        }
    }
}

/// One configured search field.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchField {
    kind: SearchFieldKind,
    uid: Option<String>,
    label: Option<String>,
    position: Option<String>,
    show_label: bool,
    only_loggedin: bool,
    input: Option<String>,
    settings: Map<String, Value>,
    date_bounds: Option<DateBounds>,
}

impl SearchField {
    pub fn new(kind: SearchFieldKind) -> Self {
        Self {
            kind,
            uid: None,
            label: None,
            position: None,
            show_label: true,
            only_loggedin: false,
            input: None,
            settings: Map::new(),
            date_bounds: None,
        }
    }

    /// A field adapter for source form field `field_id`.
    ///
    /// # Panics
    ///
    /// Panics when `field_id` is empty.
    pub fn form_field(field_id: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self::new(SearchFieldKind::FormField(FormFieldRef::new(
            field_id,
            source_type,
        )))
    }

    pub fn custom(custom: Arc<dyn CustomFieldType>) -> Self {
        Self::new(SearchFieldKind::Custom(custom))
    }

    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn at_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    #[must_use]
    pub fn with_show_label(mut self, show_label: bool) -> Self {
        self.show_label = show_label;
        self
    }

    #[must_use]
    pub fn only_loggedin(mut self, only_loggedin: bool) -> Self {
        self.only_loggedin = only_loggedin;
        self
    }

    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    pub fn kind(&self) -> &SearchFieldKind {
        &self.kind
    }

    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    pub fn field_id(&self) -> &str {
        self.kind.field_id()
    }

    /// Source form of a form field adapter, when it is not the view's own form.
    pub fn form_id(&self) -> Option<&str> {
        match &self.kind {
            SearchFieldKind::FormField(field) => field.form_id.as_deref(),
            _ => None,
        }
    }

    pub fn uid(&self) -> &str {
        self.uid.as_deref().unwrap_or_default()
    }

    pub fn has_uid(&self) -> bool {
        self.uid.as_deref().is_some_and(|uid| !uid.is_empty())
    }

    /// Configured label, falling back to the kind's default.
    pub fn label(&self) -> &str {
        self.label
            .as_deref()
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| self.kind.default_label())
    }

    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    pub fn show_label(&self) -> bool {
        self.show_label
    }

    /// Configured input control, falling back to the kind's default.
    pub fn input_type(&self) -> &str {
        self.input
            .as_deref()
            .filter(|input| !input.is_empty())
            .unwrap_or_else(|| self.kind.default_input())
    }

    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    pub fn date_bounds(&self) -> Option<&DateBounds> {
        self.date_bounds.as_ref()
    }

    pub fn allowed_operators(&self) -> &[Operator] {
        self.kind.allowed_operators()
    }

    pub fn allows(&self, operator: Operator) -> bool {
        self.allowed_operators().contains(&operator)
    }

    pub fn is_searchable(&self) -> bool {
        self.kind.is_searchable()
    }

    /// `only_loggedin` fields are hidden until a viewer is established.
    pub fn is_visible(&self, ctx: &ViewerContext) -> bool {
        if self.only_loggedin && !ctx.is_authenticated() {
            return false;
        }
        match &self.kind {
            SearchFieldKind::Custom(custom) => custom.is_visible(self, ctx),
            _ => true,
        }
    }

    /// Entry date fields and any field rendered as a date range control.
    pub fn is_date_range(&self) -> bool {
        matches!(self.kind, SearchFieldKind::EntryDate) || self.input_type() == DATE_RANGE_INPUT
    }

    pub fn request_keys(&self) -> Vec<String> {
        self.kind.request_keys()
    }

    pub(crate) fn set_uid(&mut self, uid: String) {
        self.uid = Some(uid);
    }

    pub(crate) fn set_position(&mut self, position: String) {
        self.position = Some(position);
    }

    pub(crate) fn set_setting(&mut self, key: &str, value: Value) {
        self.settings.insert(key.to_string(), value);
    }

    pub(crate) fn set_date_bounds(&mut self, bounds: DateBounds) {
        self.date_bounds = Some(bounds);
    }

    /// Forget a form id that names the view's own form.
    pub(crate) fn clear_own_form(&mut self, own_form: &str) {
        if let SearchFieldKind::FormField(field) = &mut self.kind
            && field.form_id.as_deref() == Some(own_form)
        {
            field.form_id = None;
        }
    }

    /// Apply persisted configuration on top of a registry definition.
    pub fn from_config(
        definition: &SearchField,
        config: &FieldConfig,
        position: &str,
        uid: &str,
    ) -> Self {
        let mut kind = definition.kind.clone();
        if let (SearchFieldKind::FormField(field), Some(form_id)) = (&mut kind, &config.form_id) {
            field.form_id = Some(form_id.clone());
        }

        Self {
            kind,
            uid: Some(uid.to_string()),
            label: config.label.clone().or_else(|| definition.label.clone()),
            position: Some(position.to_string()),
            show_label: config.show_label.unwrap_or(definition.show_label),
            only_loggedin: config.only_loggedin.unwrap_or(definition.only_loggedin),
            input: config.input.clone().or_else(|| definition.input.clone()),
            settings: config.settings.clone(),
            date_bounds: None,
        }
    }

    /// Persisted form of this field.
    pub fn to_config(&self) -> FieldConfig {
        FieldConfig {
            id: self.field_id().to_string(),
            field_type: Some(self.type_name().to_string()),
            uid: self.uid.clone(),
            label: self.label.clone(),
            position: self.position.clone(),
            show_label: Some(self.show_label),
            input: self.input.clone(),
            only_loggedin: self.only_loggedin.then_some(true),
            form_id: self.form_id().map(str::to_string),
            settings: self.settings.clone(),
        }
    }

    /// Render-ready description of this field, pre-filled from `args`.
    pub fn template_data(&self, args: &RequestArgs) -> Map<String, Value> {
        let keys = self.request_keys();
        let mut data = Map::new();
        data.insert("uid".into(), Value::from(self.uid()));
        data.insert("type".into(), Value::from(self.type_name()));
        data.insert("field_id".into(), Value::from(self.field_id()));
        data.insert("label".into(), Value::from(self.label()));
        data.insert("show_label".into(), Value::Bool(self.show_label));
        data.insert("input".into(), Value::from(self.input_type()));
        data.insert(
            "name".into(),
            Value::from(keys.first().map(String::as_str).unwrap_or_default()),
        );
        if let Some(form_id) = self.form_id() {
            data.insert("form_id".into(), Value::from(form_id));
        }

        if matches!(self.kind, SearchFieldKind::EntryDate) {
            let start = args.get("gv_start").map(request_value_json);
            let end = args.get("gv_end").map(request_value_json);
            if start.is_some() || end.is_some() {
                let mut range = Map::new();
                range.insert("start".into(), start.unwrap_or(Value::Null));
                range.insert("end".into(), end.unwrap_or(Value::Null));
                data.insert("value".into(), Value::Object(range));
            }
        } else if let Some(value) = keys.iter().find_map(|key| args.get(key)) {
            data.insert("value".into(), request_value_json(value));
        }

        if let Some(bounds) = &self.date_bounds {
            if let Some(start) = bounds.start_date {
                data.insert("min_date".into(), Value::from(format_search_date(start)));
            }
            if let Some(end) = bounds.end_date {
                data.insert("max_date".into(), Value::from(format_search_date(end)));
            }
        }

        for (key, value) in &self.settings {
            data.entry(key.clone()).or_insert_with(|| value.clone());
        }
        data
    }
}

fn request_value_json(value: &RequestValue) -> Value {
    match value {
        RequestValue::Scalar(s) => Value::from(s.as_str()),
        RequestValue::List(values) => Value::from(values.clone()),
    }
}
