use anyhow::Result;
use colored::Colorize;
use entryview_core::RequestValue;
use serde_json::Value;

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_label(label: &str, value: &str) {
    println!("{}: {}", label.cyan(), value);
}

/// `"a"` for scalars, `["a", "b"]` for lists.
pub fn format_request_value(value: &RequestValue) -> String {
    match value {
        RequestValue::Scalar(s) => format!("{s:?}"),
        RequestValue::List(values) => format!("{values:?}"),
    }
}
