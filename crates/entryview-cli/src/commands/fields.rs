use anyhow::Result;
use colored::Colorize;
use entryview_core::{Viewer, ViewerContext, parse_query};
use serde_json::Value;

use crate::cli::{FieldsArgs, OutputFormat};
use crate::config::load_view;
use crate::output::{print_json, print_label};

pub fn fields(args: &FieldsArgs, format: OutputFormat) -> Result<()> {
    let view = load_view(&args.view)?;
    let ctx = match &args.viewer {
        Some(id) => ViewerContext::authenticated(Viewer::new(id).with_roles(args.roles.clone())),
        None => ViewerContext::anonymous(),
    };
    let data = view.template_data(&ctx, &parse_query(&args.query));

    match format {
        OutputFormat::Json => print_json(&Value::Array(data.into_iter().map(Value::Object).collect())),
        OutputFormat::Text => {
            print_label("Form", view.form_id());
            print_label("Layout", &view.collection().positions().join(", "));
            if data.is_empty() {
                println!("No visible search fields.");
            }
            for field in &data {
                let text = |key: &str| field.get(key).and_then(Value::as_str).unwrap_or("-").to_string();
                let value = field
                    .get("value")
                    .map(|v| format!(" = {v}"))
                    .unwrap_or_default();
                println!(
                    "  {} {} [{}] {}{}",
                    text("uid").dimmed(),
                    text("label").cyan(),
                    text("input"),
                    text("name"),
                    value
                );
            }
            Ok(())
        }
    }
}
