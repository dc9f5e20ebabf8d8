use anyhow::{Context, Result};
use entryview_config::{ViewSettings, load_view_settings};
use entryview_core::parse_search_date;
use entryview_search::{FieldRegistry, SearchView};
use time::{Date, OffsetDateTime};

use crate::cli::ViewArgs;

/// Resolve `--today`, falling back to the current UTC date.
pub fn resolve_today(raw: Option<&str>) -> Result<Date> {
    match raw {
        Some(raw) => parse_search_date(raw).with_context(|| format!("Invalid --today value '{raw}'")),
        None => Ok(OffsetDateTime::now_utc().date()),
    }
}

pub fn load_settings(args: &ViewArgs) -> Result<ViewSettings> {
    load_view_settings(&args.view)
        .with_context(|| format!("Failed to load view settings from {}", args.view.display()))
}

/// Load the view file and build its search setup.
pub fn load_view(args: &ViewArgs) -> Result<SearchView> {
    let settings = load_settings(args)?;
    let today = resolve_today(args.today.as_deref())?;
    let registry = FieldRegistry::from_settings(&settings);
    Ok(SearchView::from_settings(&settings, &registry, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn today_accepts_search_date_layouts() {
        assert_eq!(resolve_today(Some("2025-06-30")).unwrap(), date!(2025 - 06 - 30));
        assert_eq!(resolve_today(Some("06/30/2025")).unwrap(), date!(2025 - 06 - 30));
        assert!(resolve_today(Some("someday")).is_err());
    }
}
