use anyhow::Result;
use colored::Colorize;
use entryview_core::{format_search_date, parse_query};
use entryview_search::{FilterIntent, SearchRequestParser};

use crate::cli::{CheckArgs, OutputFormat};
use crate::output::{format_request_value, print_json, print_label, print_success, print_warning};

pub fn check(args: &CheckArgs, format: OutputFormat) -> Result<()> {
    let request_args = parse_query(&args.query);
    let request = SearchRequestParser::from_arguments(&request_args);

    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(&request)?),
        OutputFormat::Text => {
            let Some(request) = request else {
                print_warning("Not a search request");
                return Ok(());
            };
            print_success(&format!("Search request with {} filter(s)", request.filters.len()));
            print_label("Mode", request.mode.as_str());
            for intent in &request.filters {
                println!("  {}", describe(intent));
            }
            Ok(())
        }
    }
}

fn describe(intent: &FilterIntent) -> String {
    if intent.is_date_range() {
        let side = |date: Option<time::Date>| date.map_or_else(|| "..".to_string(), format_search_date);
        return format!(
            "{} {} → {}",
            intent.key.cyan(),
            side(intent.start_date),
            side(intent.end_date)
        );
    }

    let value = intent
        .value
        .as_ref()
        .map(format_request_value)
        .unwrap_or_default();
    let form = intent
        .form_id
        .as_deref()
        .map(|form| format!(" (form {form})"))
        .unwrap_or_default();
    format!(
        "{}{} {} {} [{}]",
        intent.key.cyan(),
        form,
        intent.operator.as_str().yellow(),
        value,
        intent.request_key.dimmed()
    )
}
