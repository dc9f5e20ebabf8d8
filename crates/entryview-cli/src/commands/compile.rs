use anyhow::Result;
use colored::Colorize;
use entryview_core::{format_search_date, parse_query};
use entryview_search::SearchCriteria;
use tracing::info;

use crate::cli::{CompileArgs, OutputFormat};
use crate::config::load_view;
use crate::output::{format_request_value, print_json, print_label, print_warning};

pub fn compile(args: &CompileArgs, format: OutputFormat) -> Result<()> {
    let view = load_view(&args.view)?;
    let request_args = parse_query(&args.query);

    let Some(criteria) = view.compile(&request_args) else {
        info!(query = %args.query, "Query carries no search keys");
        return match format {
            OutputFormat::Json => print_json(&serde_json::Value::Null),
            OutputFormat::Text => {
                print_warning("Not a search request");
                Ok(())
            }
        };
    };

    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(&criteria)?),
        OutputFormat::Text => {
            print_criteria(&criteria);
            Ok(())
        }
    }
}

fn print_criteria(criteria: &SearchCriteria) {
    print_label("Mode", criteria.mode().as_str());
    if let Some(start) = criteria.start_date {
        print_label("Start date", &format_search_date(start));
    }
    if let Some(end) = criteria.end_date {
        print_label("End date", &format_search_date(end));
    }

    let filters: Vec<_> = criteria.filters().collect();
    if filters.is_empty() {
        println!("No filters.");
        return;
    }
    for filter in filters {
        let key = filter.key.as_deref().unwrap_or("*");
        let form = filter
            .form_id
            .as_deref()
            .map(|form| format!(" (form {form})"))
            .unwrap_or_default();
        println!(
            "  {}{} {} {}",
            key.cyan(),
            form,
            filter.operator.as_str().yellow(),
            format_request_value(&filter.value)
        );
    }
}
