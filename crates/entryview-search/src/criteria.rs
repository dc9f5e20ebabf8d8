//! Engine-ready filter criteria.
//!
//! Shape handed to the query engine:
//!
//! ```json
//! {
//!   "field_filters": [
//!     {"value": "smith", "operator": "contains"},
//!     {"key": "entry_id", "value": "123", "operator": "="},
//!     {"mode": "all"}
//!   ],
//!   "end_date": "2025-12-31"
//! }
//! ```
//!
//! The mode marker is always the last element of `field_filters`.

use entryview_core::RequestValue;
use serde::Serialize;
use time::Date;

use crate::parameters::{Operator, SearchMode};

pub(crate) mod date_format {
    use entryview_core::format_search_date;
    use serde::Serializer;
    use time::Date;

    pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&format_search_date(*date)),
            None => serializer.serialize_none(),
        }
    }
}

/// One compiled filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFilter {
    /// `None` matches across all fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub value: RequestValue,
    pub operator: Operator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
}

/// An element of `field_filters`: a filter or the trailing mode marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldFilterEntry {
    Filter(FieldFilter),
    Mode { mode: SearchMode },
}

/// Final criteria consumed by the query engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    pub field_filters: Vec<FieldFilterEntry>,
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

impl SearchCriteria {
    /// Criteria with no filters: only the mode marker, no date bounds.
    pub fn empty(mode: SearchMode) -> Self {
        Self {
            field_filters: vec![FieldFilterEntry::Mode { mode }],
            start_date: None,
            end_date: None,
        }
    }

    /// The compiled filters, without the mode marker.
    pub fn filters(&self) -> impl Iterator<Item = &FieldFilter> {
        self.field_filters.iter().filter_map(|entry| match entry {
            FieldFilterEntry::Filter(filter) => Some(filter),
            FieldFilterEntry::Mode { .. } => None,
        })
    }

    /// The mode carried by the trailing marker.
    pub fn mode(&self) -> SearchMode {
        match self.field_filters.last() {
            Some(FieldFilterEntry::Mode { mode }) => *mode,
            _ => SearchMode::default(),
        }
    }

    /// First filter compiled for `key`.
    pub fn filter_for(&self, key: &str) -> Option<&FieldFilter> {
        self.filters().find(|f| f.key.as_deref() == Some(key))
    }

    pub fn is_empty(&self) -> bool {
        self.filters().next().is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;

    #[test]
    fn empty_criteria_serializes_mode_marker_only() {
        let criteria = SearchCriteria::empty(SearchMode::Any);
        assert!(criteria.is_empty());
        assert_eq!(
            serde_json::to_value(&criteria).unwrap(),
            json!({"field_filters": [{"mode": "any"}]})
        );
    }

    #[test]
    fn serializes_filters_and_dates() {
        let criteria = SearchCriteria {
            field_filters: vec![
                FieldFilterEntry::Filter(FieldFilter {
                    key: None,
                    value: RequestValue::from("smith"),
                    operator: Operator::Contains,
                    form_id: None,
                }),
                FieldFilterEntry::Filter(FieldFilter {
                    key: Some("4.3".to_string()),
                    value: RequestValue::List(vec!["a".to_string(), "b".to_string()]),
                    operator: Operator::In,
                    form_id: Some("7".to_string()),
                }),
                FieldFilterEntry::Mode {
                    mode: SearchMode::All,
                },
            ],
            start_date: None,
            end_date: Some(date!(2025 - 12 - 31)),
        };

        assert_eq!(criteria.mode(), SearchMode::All);
        assert_eq!(criteria.filters().count(), 2);
        assert_eq!(criteria.filter_for("4.3").unwrap().operator, Operator::In);
        assert_eq!(
            serde_json::to_value(&criteria).unwrap(),
            json!({
                "field_filters": [
                    {"value": "smith", "operator": "contains"},
                    {"key": "4.3", "value": ["a", "b"], "operator": "in", "form_id": "7"},
                    {"mode": "all"}
                ],
                "end_date": "2025-12-31"
            })
        );
    }
}
