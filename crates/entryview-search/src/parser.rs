//! Request normalization.
//!
//! Recognized request keys:
//! - `gv_search`: free text across all fields
//! - `gv_id` (+ `gv_id|op`): entry id
//! - `gv_by`: entry creator
//! - `gv_start` / `gv_end`: entry date range, combined into one intent
//! - `filter_<id>` / `input_<id>` (+ `_<sub>`, `:<form_id>`, `|op`): a source form field
//! - `mode`: `any` or `all`
//!
//! Normalization never fails. Values it cannot make sense of fall back to defaults
//! and operator validation is left to the filter builder.

use std::sync::LazyLock;

use entryview_core::{RequestArgs, RequestValue, parse_search_date};
use regex::Regex;
use serde::Serialize;
use time::Date;
use tracing::debug;

use crate::criteria::date_format;
use crate::parameters::{Operator, SearchMode};

pub const SEARCH_ALL_KEY: &str = "search_all";
pub const ENTRY_ID_KEY: &str = "entry_id";
pub const ENTRY_DATE_KEY: &str = "entry_date";
pub const CREATED_BY_KEY: &str = "created_by";

const GV_SEARCH: &str = "gv_search";
const GV_START: &str = "gv_start";
const GV_END: &str = "gv_end";
const GV_BY: &str = "gv_by";
const GV_ID: &str = "gv_id";
const MODE: &str = "mode";
const OPERATOR_SUFFIX: &str = "|op";

const RESERVED_KEYS: [&str; 5] = [GV_SEARCH, GV_START, GV_END, GV_BY, GV_ID];

/// `filter_<id>[_<sub>][:<form_id>]` and the `input_` spelling of the same.
static FIELD_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:filter|input)_([A-Za-z0-9][A-Za-z0-9_.\-]*?)(?::([0-9]+))?$")
        .expect("field key pattern is valid")
});

/// Numeric ids with an optional sub-input, written either `4_5` or `4.5`.
static NUMERIC_FIELD_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)(?:[_.]([0-9]+))?$").expect("numeric field id pattern is valid")
});

/// One request-derived filtering instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterIntent {
    pub key: String,
    pub request_key: String,
    pub operator: Operator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<RequestValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "date_format::serialize"
    )]
    pub start_date: Option<Date>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "date_format::serialize"
    )]
    pub end_date: Option<Date>,
}

impl FilterIntent {
    fn simple(
        key: impl Into<String>,
        request_key: impl Into<String>,
        operator: Operator,
        value: RequestValue,
    ) -> Self {
        Self {
            key: key.into(),
            request_key: request_key.into(),
            operator,
            value: Some(value),
            field_id: None,
            form_id: None,
            start_date: None,
            end_date: None,
        }
    }

    /// True for the combined `gv_start`/`gv_end` intent.
    pub fn is_date_range(&self) -> bool {
        self.value.is_none() && (self.start_date.is_some() || self.end_date.is_some())
    }
}

/// A normalized search request: the mode plus filter intents in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub mode: SearchMode,
    pub filters: Vec<FilterIntent>,
}

impl SearchRequest {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, intent: FilterIntent) -> Self {
        self.filters.push(intent);
        self
    }
}

/// A decoded `filter_`/`input_` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKey {
    pub field_id: String,
    pub form_id: Option<String>,
}

pub struct SearchRequestParser;

impl SearchRequestParser {
    /// True when the arguments carry at least one search key. `mode` alone does not count.
    pub fn is_search_request(args: &RequestArgs) -> bool {
        args.keys()
            .filter(|key| !key.ends_with(OPERATOR_SUFFIX))
            .any(|key| RESERVED_KEYS.contains(&key.as_str()) || FIELD_KEY.is_match(key))
    }

    /// Build a search request from raw arguments, or `None` when nothing in them is a search key.
    pub fn from_arguments(args: &RequestArgs) -> Option<SearchRequest> {
        if !Self::is_search_request(args) {
            return None;
        }

        let mode = SearchMode::parse_lenient(args.get(MODE).and_then(RequestValue::first));
        let mut request = SearchRequest::new(mode);
        let mut date_range_seen = false;

        for (key, value) in args {
            if key.ends_with(OPERATOR_SUFFIX) {
                continue;
            }

            match key.as_str() {
                GV_SEARCH => request.filters.push(FilterIntent::simple(
                    SEARCH_ALL_KEY,
                    GV_SEARCH,
                    Operator::Contains,
                    value.clone(),
                )),
                GV_ID => request.filters.push(FilterIntent::simple(
                    ENTRY_ID_KEY,
                    GV_ID,
                    Self::requested_operator(args, key),
                    value.clone(),
                )),
                GV_BY => request.filters.push(FilterIntent::simple(
                    CREATED_BY_KEY,
                    GV_BY,
                    Operator::Eq,
                    value.clone(),
                )),
                GV_START | GV_END => {
                    if date_range_seen {
                        continue;
                    }
                    date_range_seen = true;
                    if let Some(intent) = Self::date_range_intent(args, key) {
                        request.filters.push(intent);
                    }
                }
                _ => {
                    if let Some(field_key) = Self::decode_field_key(key) {
                        request.filters.push(FilterIntent {
                            key: field_key.field_id.clone(),
                            request_key: key.clone(),
                            operator: Self::requested_operator(args, key),
                            value: Some(value.clone()),
                            field_id: Some(field_key.field_id),
                            form_id: field_key.form_id,
                            start_date: None,
                            end_date: None,
                        });
                    }
                }
            }
        }

        debug!(
            mode = %request.mode,
            filters = request.filters.len(),
            "Normalized search request"
        );
        Some(request)
    }

    /// Decode `filter_4_5:12` into field id `4.5` on form `12`.
    ///
    /// Non-numeric ids (entry meta such as `is_starred`) keep their underscores.
    pub fn decode_field_key(key: &str) -> Option<FieldKey> {
        let caps = FIELD_KEY.captures(key)?;
        let raw_id = caps.get(1)?.as_str();
        let form_id = caps.get(2).map(|m| m.as_str().to_string());

        let field_id = match NUMERIC_FIELD_ID.captures(raw_id) {
            Some(numeric) => match numeric.get(2) {
                Some(sub) => format!("{}.{}", &numeric[1], sub.as_str()),
                None => numeric[1].to_string(),
            },
            None => raw_id.to_string(),
        };

        Some(FieldKey { field_id, form_id })
    }

    /// Encode a field id back into its request key: `4.5` on form `12` → `filter_4_5:12`.
    pub fn encode_field_key(field_id: &str, form_id: Option<&str>) -> String {
        let id = if NUMERIC_FIELD_ID.is_match(field_id) {
            field_id.replace('.', "_")
        } else {
            field_id.to_string()
        };
        match form_id {
            Some(form_id) => format!("filter_{id}:{form_id}"),
            None => format!("filter_{id}"),
        }
    }

    fn requested_operator(args: &RequestArgs, key: &str) -> Operator {
        let Some(raw) = args
            .get(&format!("{key}{OPERATOR_SUFFIX}"))
            .and_then(RequestValue::first)
        else {
            return Operator::Eq;
        };

        Operator::parse(raw).unwrap_or_else(|| {
            debug!(key = %key, operator = %raw, "Unrecognized operator, using '='");
            Operator::Eq
        })
    }

    fn date_range_intent(args: &RequestArgs, first_key: &str) -> Option<FilterIntent> {
        let parse = |key: &str| {
            let raw = args.get(key).and_then(RequestValue::first)?;
            if raw.trim().is_empty() {
                return None;
            }
            match parse_search_date(raw) {
                Ok(date) => Some(date),
                Err(e) => {
                    debug!(key = %key, error = %e, "Ignoring unparseable date");
                    None
                }
            }
        };

        let start_date = parse(GV_START);
        let end_date = parse(GV_END);
        if start_date.is_none() && end_date.is_none() {
            return None;
        }

        Some(FilterIntent {
            key: ENTRY_DATE_KEY.to_string(),
            request_key: first_key.to_string(),
            operator: Operator::Eq,
            value: None,
            field_id: None,
            form_id: None,
            start_date,
            end_date,
        })
    }
}
