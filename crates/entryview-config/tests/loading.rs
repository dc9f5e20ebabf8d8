//! Integration tests for loading view settings files.

use std::io::Write;

use entryview_config::{
    ConfigError, DateBound, SearchWidgetConfig, ViewSettings, load_view_settings,
};
use time::macros::date;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

const MODERN_TOML: &str = r#"
id = "view-9"
form_id = "12"

[bounds]
start_date = "2025-04-01"
end_date = "+1 year"

[search]
format = "modern"
search_mode = "all"

[search.fields."search-general_1-left".a1]
id = "search_all"
label = "Anything"

[search.fields."search-general_1-right".b2]
id = "4.3"
only_loggedin = true

[[forms."12"]]
id = "4"
type = "name"
label = "Name"
inputs = [{ id = "4.3", label = "First" }]
"#;

#[test]
fn loads_modern_toml() {
    let file = write_temp(".toml", MODERN_TOML);
    let settings = load_view_settings(file.path()).unwrap();

    assert_eq!(settings.id.as_deref(), Some("view-9"));
    assert_eq!(settings.form_id, "12");
    assert_eq!(settings.search.search_mode(), Some("all"));
    assert_eq!(
        settings.bounds.start_date,
        Some(DateBound::Absolute(date!(2025 - 04 - 01)))
    );

    let SearchWidgetConfig::Modern { fields, .. } = &settings.search else {
        panic!("expected modern search widget");
    };
    assert_eq!(fields.len(), 2);
    let name_part = &fields["search-general_1-right"]["b2"];
    assert_eq!(name_part.id, "4.3");
    assert_eq!(name_part.only_loggedin, Some(true));

    let form = &settings.forms["12"];
    assert_eq!(form[0].field_type, "name");
    assert_eq!(form[0].inputs[0].id, "4.3");

    let resolved = settings.bounds.resolve(date!(2025 - 06 - 15));
    assert_eq!(resolved.end_date, Some(date!(2026 - 06 - 15)));
}

#[test]
fn loads_legacy_json_with_serialized_fields() {
    let json = r#"{
        "form_id": "3",
        "search": {
            "format": "legacy",
            "search_fields": "[{\"field\":\"search_all\",\"input\":\"input_text\",\"label\":\"Search\"},{\"field\":\"entry_date\",\"input\":\"date_range\",\"label\":\"Date\"}]",
            "search_layout": "horizontal",
            "search_clear": true
        }
    }"#;
    let file = write_temp(".json", json);
    let settings = load_view_settings(file.path()).unwrap();

    let SearchWidgetConfig::Legacy(legacy) = &settings.search else {
        panic!("expected legacy search widget");
    };
    assert_eq!(legacy.search_layout.as_deref(), Some("horizontal"));
    let records = legacy.search_fields.records().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].input, "date_range");
    assert_eq!(settings.search.search_clear(), Some(true));
}

#[test]
fn rejects_invalid_bound() {
    let toml = "form_id = \"1\"\n[bounds]\nstart_date = \"someday\"\n";
    assert!(matches!(
        ViewSettings::from_toml_str(toml),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn rejects_missing_file_and_blank_form() {
    assert!(matches!(
        load_view_settings("/nonexistent/view.toml"),
        Err(ConfigError::Io(_))
    ));
    assert!(matches!(
        ViewSettings::from_json_str(r#"{"form_id": " "}"#),
        Err(ConfigError::Validation(_))
    ));
}
