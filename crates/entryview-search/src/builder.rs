//! Filter criteria building.
//!
//! Every intent is resolved against the view's configured fields. Whatever cannot be
//! resolved, carries no value, or asks for an operator the field does not allow is
//! degraded silently: dropped, or downgraded to `=`. Requested dates outside the
//! view's bounds are dropped, never moved onto the boundary.

use entryview_core::DateBounds;
use time::Date;
use tracing::debug;

use crate::collection::SearchFieldCollection;
use crate::criteria::{FieldFilter, FieldFilterEntry, SearchCriteria};
use crate::fields::SearchFieldKind;
use crate::parameters::Operator;
use crate::parser::{FilterIntent, SearchRequest};

/// Compiles normalized requests against one field collection and its date bounds.
#[derive(Debug, Clone, Copy)]
pub struct FilterBuilder<'a> {
    collection: &'a SearchFieldCollection,
    bounds: DateBounds,
}

impl<'a> FilterBuilder<'a> {
    pub fn new(collection: &'a SearchFieldCollection, bounds: DateBounds) -> Self {
        Self { collection, bounds }
    }

    pub fn to_search_criteria(&self, request: &SearchRequest) -> SearchCriteria {
        let mut criteria = SearchCriteria::empty(request.mode);
        let mut filters = Vec::with_capacity(request.filters.len() + 1);

        for intent in &request.filters {
            let Some(field) = self.collection.find_for_intent(intent) else {
                debug!(key = %intent.key, request_key = %intent.request_key, "Dropping filter for unknown field");
                continue;
            };

            if intent.is_date_range() {
                if !matches!(field.kind(), SearchFieldKind::EntryDate) {
                    debug!(key = %intent.key, "Dropping date range for a field without one");
                    continue;
                }
                criteria.start_date = self.clip("start_date", intent.start_date);
                criteria.end_date = self.clip("end_date", intent.end_date);
                continue;
            }

            let Some(value) = intent.value.as_ref().map(|v| v.without_blanks()) else {
                continue;
            };
            if value.is_blank() {
                debug!(key = %intent.key, "Dropping filter with an empty value");
                continue;
            }

            let operator = self.operator_for(intent, field.allowed_operators());
            let filter = match field.kind() {
                SearchFieldKind::AllFields => FieldFilter {
                    key: None,
                    value,
                    operator: Operator::Contains,
                    form_id: None,
                },
                _ => FieldFilter {
                    key: Some(intent.key.clone()),
                    value,
                    operator,
                    form_id: intent.form_id.clone(),
                },
            };
            filters.push(FieldFilterEntry::Filter(filter));
        }

        filters.push(FieldFilterEntry::Mode { mode: request.mode });
        criteria.field_filters = filters;

        debug!(
            mode = %request.mode,
            intents = request.filters.len(),
            filters = criteria.filters().count(),
            "Built search criteria"
        );
        criteria
    }

    fn operator_for(&self, intent: &FilterIntent, allowed: &[Operator]) -> Operator {
        if allowed.contains(&intent.operator) {
            intent.operator
        } else {
            debug!(
                key = %intent.key,
                operator = %intent.operator,
                "Operator not allowed for field, using '='"
            );
            Operator::Eq
        }
    }

    /// Keep a requested date only when it lies inside the bounds.
    fn clip(&self, side: &str, requested: Option<Date>) -> Option<Date> {
        let date = requested?;
        if self.bounds.contains(date) {
            Some(date)
        } else {
            debug!(side = %side, date = %date, "Dropping requested date outside the view's bounds");
            None
        }
    }
}

/// Shorthand for [`FilterBuilder::to_search_criteria`].
pub fn to_search_criteria(
    request: &SearchRequest,
    collection: &SearchFieldCollection,
    bounds: DateBounds,
) -> SearchCriteria {
    FilterBuilder::new(collection, bounds).to_search_criteria(request)
}
