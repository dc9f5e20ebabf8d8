//! Integration tests for compiling request arguments against configured views.
//!
//! Views are loaded from raw JSON settings the way the CLI loads them, then compiled
//! end to end: normalization, field resolution, operator rules and date clipping.

use std::sync::Arc;

use assert_json_diff::assert_json_eq;
use entryview_config::ViewSettings;
use entryview_core::{RequestArgs, Viewer, ViewerContext, parse_query};
use entryview_search::{
    CustomFieldType, FieldRegistry, FnRegistrant, Operator, SearchField, SearchFieldCollection,
    SearchRequestParser, SearchView, to_search_criteria,
};
use serde_json::{Value, json};
use time::macros::date;

const FORMS: &str = r#"{
    "1": [
        {"id": "2", "type": "number", "label": "Age"},
        {"id": "4", "type": "name", "label": "Name", "inputs": [
            {"id": "4.3", "label": "First"},
            {"id": "4.6", "label": "Last"}
        ]},
        {"id": "5", "type": "select", "label": "Color"}
    ],
    "9": [
        {"id": "16", "type": "text", "label": "Company"}
    ]
}"#;

/// Settings for a view over form `1`, with `search` spliced in as raw JSON so key order survives.
fn settings(search: &str) -> ViewSettings {
    let raw = format!(
        r#"{{"form_id": "1", "bounds": {{"start_date": "2025-04-01"}}, "search": {search}, "forms": {FORMS}}}"#
    );
    ViewSettings::from_json_str(&raw).expect("valid view settings")
}

fn modern() -> ViewSettings {
    settings(
        r#"{
            "format": "modern",
            "search_mode": "all",
            "search_clear": true,
            "fields": {
                "search-general_1-left": {
                    "s1": {"id": "search_all", "type": "search_all"},
                    "s2": {"id": "entry_id", "type": "entry_id"}
                },
                "search-general_1-right": {
                    "f1": {"id": "4.3", "type": "form_field", "label": "First name"},
                    "f2": {"id": "2", "type": "form_field"},
                    "f3": {"id": "16", "type": "form_field", "form_id": "9"}
                },
                "search-general_2-full": {
                    "d1": {"id": "entry_date", "type": "entry_date"},
                    "m1": {"id": "5", "type": "form_field", "only_loggedin": true}
                }
            }
        }"#,
    )
}

fn compile(view: &SearchView, query: &str) -> Value {
    let criteria = view.compile(&parse_query(query)).expect("search request");
    serde_json::to_value(criteria).expect("criteria serialize")
}

fn view(settings: &ViewSettings) -> SearchView {
    let registry = FieldRegistry::from_settings(settings);
    SearchView::from_settings(settings, &registry, date!(2025 - 06 - 30))
}

// =============================================================================
// Compilation
// =============================================================================

#[test]
fn compiles_mixed_request() {
    let view = view(&modern());
    assert_json_eq!(
        compile(
            &view,
            "gv_search=acme&filter_4_3=Ann&filter_2=40&filter_2|op=<&filter_16:9=Initech&gv_id=10&mode=all"
        ),
        json!({
            "field_filters": [
                {"value": "acme", "operator": "contains"},
                {"key": "4.3", "value": "Ann", "operator": "="},
                {"key": "2", "value": "40", "operator": "<"},
                {"key": "16", "value": "Initech", "operator": "=", "form_id": "9"},
                {"key": "entry_id", "value": "10", "operator": "="},
                {"mode": "all"}
            ]
        })
    );
}

#[test]
fn clips_dates_to_view_bounds() {
    let view = view(&modern());
    assert_json_eq!(
        compile(&view, "gv_start=01/01/2025&gv_end=12/31/2025"),
        json!({
            "field_filters": [{"mode": "any"}],
            "end_date": "2025-12-31"
        })
    );
}

#[test]
fn downgrades_disallowed_operators() {
    let view = view(&modern());
    let criteria = view
        .compile(&parse_query("gv_id=123&gv_id|op=!=&filter_4_3=A&filter_4_3|op=like"))
        .unwrap();
    assert_eq!(criteria.filter_for("entry_id").unwrap().operator, Operator::Eq);
    assert_eq!(criteria.filter_for("4.3").unwrap().operator, Operator::Like);
}

#[test]
fn drops_fields_the_view_does_not_offer() {
    let view = view(&modern());
    assert_json_eq!(
        compile(&view, "filter_4_6=Smith&gv_by=3&filter_16=Initech&filter_is_starred=1"),
        json!({"field_filters": [{"mode": "any"}]})
    );
}

#[test]
fn field_naming_the_views_own_form_still_filters() {
    let view = view(&settings(
        r#"{
            "format": "modern",
            "fields": {
                "search-general": {
                    "f1": {"id": "4.3", "type": "form_field", "form_id": "1"}
                }
            }
        }"#,
    ));
    assert_json_eq!(
        compile(&view, "filter_4_3=Ann"),
        json!({
            "field_filters": [
                {"key": "4.3", "value": "Ann", "operator": "="},
                {"mode": "any"}
            ]
        })
    );
    assert_json_eq!(
        compile(&view, "filter_4_3:1=Ann"),
        json!({
            "field_filters": [
                {"key": "4.3", "value": "Ann", "operator": "=", "form_id": "1"},
                {"mode": "any"}
            ]
        })
    );
    assert!(view.collection().has_request_values(&parse_query("filter_4_3=Ann")));
}

#[test]
fn unrelated_arguments_are_not_a_search() {
    let view = view(&modern());
    for query in ["", "mode=all", "page=3&orderby=date", "gv_id|op=="] {
        assert!(view.compile(&parse_query(query)).is_none(), "{query}");
    }
}

// =============================================================================
// Legacy views
// =============================================================================

#[test]
fn legacy_view_compiles_like_modern() {
    let legacy = settings(
        r#"{
            "format": "legacy",
            "search_fields": "[{\"field\": \"search_all\", \"input\": \"input_text\", \"label\": \"Search\"}, {\"field\": \"4.3\", \"input\": \"input_text\", \"label\": \"First\"}, {\"field\": \"entry_date\", \"input\": \"date_range\", \"label\": \"\"}]",
            "search_layout": "vertical",
            "search_mode": "all"
        }"#,
    );
    let view = view(&legacy);

    assert!(view.collection().has_date_field());
    assert_eq!(view.collection().by_type("submit").len(), 1);
    assert_json_eq!(
        compile(&view, "gv_search=x&filter_4_3=Ann&gv_end=2025-05-01"),
        json!({
            "field_filters": [
                {"value": "x", "operator": "contains"},
                {"key": "4.3", "value": "Ann", "operator": "="},
                {"mode": "any"}
            ],
            "end_date": "2025-05-01"
        })
    );
}

#[test]
fn malformed_legacy_fields_keep_only_the_controls() {
    let broken = settings(
        r#"{
            "format": "legacy",
            "search_fields": "[{\"field\": \"search_all\"",
            "search_mode": "all"
        }"#,
    );
    let view = view(&broken);
    assert_eq!(view.collection().len(), 2);
    assert_eq!(view.collection().by_type("submit").len(), 1);
    assert_eq!(view.collection().by_type("search_mode").len(), 1);
    assert_json_eq!(
        compile(&view, "gv_search=x"),
        json!({"field_filters": [{"mode": "any"}]})
    );
}

// =============================================================================
// Template data and visibility
// =============================================================================

#[test]
fn template_data_follows_viewer() {
    let view = view(&modern());
    let args = parse_query("filter_4_3=Ann");

    let anonymous = view.template_data(&ViewerContext::anonymous(), &args);
    let signed_in = view.template_data(&ViewerContext::authenticated(Viewer::new("5")), &args);
    assert_eq!(anonymous.len(), 6);
    assert_eq!(signed_in.len(), 7);

    let first_name = anonymous.iter().find(|f| f["uid"] == "f1").unwrap();
    assert_eq!(first_name["label"], "First name");
    assert_eq!(first_name["value"], "Ann");
    assert_eq!(first_name["name"], "filter_4_3");

    let dates = anonymous.iter().find(|f| f["type"] == "entry_date").unwrap();
    assert_eq!(dates["min_date"], "2025-04-01");
}

#[test]
fn positions_and_uids_keep_file_order() {
    let view = view(&modern());
    let collection = view.collection();
    assert_eq!(
        collection.positions(),
        vec![
            "search-general_1-left",
            "search-general_1-right",
            "search-general_2-full",
            "search-actions"
        ]
    );

    let uids: Vec<_> = collection.iter().map(SearchField::uid).take(7).collect();
    assert_eq!(uids, vec!["s1", "s2", "f1", "f2", "f3", "d1", "m1"]);
}

#[test]
fn configuration_round_trips_through_the_view() {
    let settings = modern();
    let registry = FieldRegistry::from_settings(&settings);
    let view = SearchView::from_settings(&settings, &registry, date!(2025 - 06 - 30));

    let config = view.collection().to_configuration();
    let mut rebuilt = SearchFieldCollection::from_configuration(&config, &registry, "1");
    assert_ne!(&rebuilt, view.collection());

    rebuilt.apply_date_bounds(view.bounds());
    assert_eq!(&rebuilt, view.collection());
}

// =============================================================================
// Extension fields
// =============================================================================

#[derive(Debug)]
struct ApprovalStatus;

impl CustomFieldType for ApprovalStatus {
    fn type_name(&self) -> &str {
        "is_approved"
    }

    fn default_label(&self) -> &str {
        "Approval Status"
    }

    fn allowed_operators(&self) -> &[Operator] {
        &[Operator::Eq, Operator::Ne]
    }

    fn default_input(&self) -> &str {
        "radio"
    }

    fn is_visible(&self, _field: &SearchField, ctx: &ViewerContext) -> bool {
        ctx.viewer().is_some_and(|viewer| viewer.has_role("moderator"))
    }
}

#[test]
fn registered_field_types_compile_and_gate_visibility() {
    let settings = settings(
        r#"{
            "format": "modern",
            "fields": {
                "search-general": {
                    "a1": {"id": "is_approved", "type": "is_approved", "label": "Approved?"}
                }
            }
        }"#,
    );
    let registry = FieldRegistry::from_settings(&settings).with_registrant(Arc::new(
        FnRegistrant::new("approval", |mut fields: Vec<SearchField>, _form: &str| {
            fields.push(SearchField::custom(Arc::new(ApprovalStatus)));
            fields
        }),
    ));
    let view = SearchView::from_settings(&settings, &registry, date!(2025 - 06 - 30));

    assert_json_eq!(
        compile(&view, "filter_is_approved=0&filter_is_approved|op=!="),
        json!({
            "field_filters": [
                {"key": "is_approved", "value": "0", "operator": "!="},
                {"mode": "any"}
            ]
        })
    );

    let args = RequestArgs::new();
    assert!(view.template_data(&ViewerContext::anonymous(), &args).is_empty());
    let moderator = Viewer::new("8").with_roles(vec!["moderator".to_string()]);
    let data = view.template_data(&ViewerContext::authenticated(moderator), &args);
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["label"], "Approved?");
    assert_eq!(data[0]["input"], "radio");
}

#[test]
fn criteria_from_a_parsed_request_match_view_compile() {
    let settings = modern();
    let view = view(&settings);
    let args = parse_query("gv_search=acme&mode=ALL");
    let request = SearchRequestParser::from_arguments(&args).unwrap();

    let direct = to_search_criteria(&request, view.collection(), view.bounds());
    assert_eq!(Some(direct), view.compile(&args));
}
