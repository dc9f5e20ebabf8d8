//! A view's search setup, ready to compile requests.

use entryview_config::{SearchWidgetConfig, ViewSettings};
use entryview_core::{DateBounds, RequestArgs, ViewerContext};
use serde_json::{Map, Value};
use time::Date;

use crate::builder::FilterBuilder;
use crate::collection::{RequiredFieldsConfig, SearchFieldCollection};
use crate::criteria::SearchCriteria;
use crate::parameters::SearchMode;
use crate::parser::SearchRequestParser;
use crate::registry::FieldRegistry;

/// Field collection plus resolved date bounds for one view.
///
/// Built per request; `today` anchors relative bounds such as `-30 days`.
#[derive(Debug, Clone)]
pub struct SearchView {
    form_id: String,
    collection: SearchFieldCollection,
    bounds: DateBounds,
}

impl SearchView {
    pub fn from_settings(settings: &ViewSettings, registry: &FieldRegistry, today: Date) -> Self {
        let bounds = settings.bounds.resolve(today);
        let form_id = settings.form_id.as_str();

        let collection = match &settings.search {
            SearchWidgetConfig::Modern { fields, .. } => {
                let mut collection =
                    SearchFieldCollection::from_configuration(fields, registry, form_id);
                collection.ensure_required_search_fields(Some(&required_fields(&settings.search)));
                if bounds.is_bounded() && collection.has_date_field() {
                    collection.apply_date_bounds(bounds);
                }
                collection
            }
            SearchWidgetConfig::Legacy(legacy) => SearchFieldCollection::from_legacy_configuration(
                legacy,
                bounds.is_bounded().then_some(&bounds),
                registry,
                form_id,
            ),
        };

        Self {
            form_id: form_id.to_string(),
            collection,
            bounds,
        }
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn collection(&self) -> &SearchFieldCollection {
        &self.collection
    }

    pub fn bounds(&self) -> DateBounds {
        self.bounds
    }

    /// Compile request arguments into criteria. `None` when they hold no search keys.
    pub fn compile(&self, args: &RequestArgs) -> Option<SearchCriteria> {
        let request = SearchRequestParser::from_arguments(args)?;
        Some(FilterBuilder::new(&self.collection, self.bounds).to_search_criteria(&request))
    }

    pub fn template_data(&self, ctx: &ViewerContext, args: &RequestArgs) -> Vec<Map<String, Value>> {
        self.collection.to_template_data(ctx, args)
    }
}

fn required_fields(search: &SearchWidgetConfig) -> RequiredFieldsConfig {
    RequiredFieldsConfig {
        search_mode: search
            .search_mode()
            .map(|mode| SearchMode::parse_lenient(Some(mode))),
        search_clear: search.search_clear(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entryview_config::{BoundsConfig, DateBound, FieldConfig};
    use entryview_core::{SourceFieldDescriptor, parse_query};
    use indexmap::IndexMap;
    use time::macros::date;

    fn settings() -> ViewSettings {
        let mut general = IndexMap::new();
        general.insert("d1".to_string(), FieldConfig::new("entry_date").with_input("date_range"));
        general.insert("t1".to_string(), FieldConfig::new("3").with_type("form_field"));
        let mut fields = IndexMap::new();
        fields.insert("search-general".to_string(), general);

        let mut settings = ViewSettings::new("1");
        settings.search = SearchWidgetConfig::Modern {
            fields,
            search_mode: Some("all".to_string()),
            search_clear: None,
        };
        settings.bounds = BoundsConfig {
            start_date: Some("-30 days".parse::<DateBound>().unwrap()),
            end_date: None,
        };
        settings
            .forms
            .insert("1".to_string(), vec![SourceFieldDescriptor::new("3", "text", "Title")]);
        settings
    }

    #[test]
    fn compiles_against_resolved_bounds() {
        let settings = settings();
        let registry = FieldRegistry::from_settings(&settings);
        let view = SearchView::from_settings(&settings, &registry, date!(2025 - 06 - 30));

        assert_eq!(view.bounds().start_date, Some(date!(2025 - 05 - 31)));
        assert_eq!(view.collection().by_type("submit").len(), 1);

        let criteria = view
            .compile(&parse_query("gv_start=2025-05-01&gv_end=2025-06-15&filter_3=x"))
            .unwrap();
        assert_eq!(criteria.start_date, None);
        assert_eq!(criteria.end_date, Some(date!(2025 - 06 - 15)));
        assert_eq!(criteria.filter_for("3").unwrap().value.first(), Some("x"));
        assert_eq!(criteria.mode(), SearchMode::Any);

        assert!(view.compile(&parse_query("page=2")).is_none());
    }

    #[test]
    fn template_data_carries_date_limits() {
        let settings = settings();
        let registry = FieldRegistry::from_settings(&settings);
        let view = SearchView::from_settings(&settings, &registry, date!(2025 - 06 - 30));
        let data = view.template_data(&ViewerContext::anonymous(), &RequestArgs::new());

        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["min_date"], "2025-05-31");
        assert_eq!(data[1]["label"], "Title");
    }
}
