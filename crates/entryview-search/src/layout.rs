//! Row layout of search fields inside a named area.
//!
//! A laid-out field's position reads `<area>_<row>-<column>`, e.g. `search-general_2-left`.

use std::fmt;

use crate::collection::SearchFieldCollection;
use crate::fields::SearchField;

/// Area holding the searchable fields.
pub const DEFAULT_AREA: &str = "search-general";
/// Area holding the submit and mode-selector controls.
pub const ACTIONS_AREA: &str = "search-actions";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchLayout {
    /// Two fields per row
    #[default]
    Horizontal,
    /// One field per row
    Vertical,
}

impl SearchLayout {
    /// Unknown or missing values read as horizontal.
    pub fn parse_lenient(s: Option<&str>) -> Self {
        match s.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("vertical") => Self::Vertical,
            _ => Self::Horizontal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }

    pub fn columns(self) -> usize {
        match self {
            Self::Horizontal => 2,
            Self::Vertical => 1,
        }
    }
}

impl fmt::Display for SearchLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutColumn {
    Left,
    Right,
    Full,
}

impl LayoutColumn {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Full => "full",
        }
    }
}

/// One column of a row and the UIDs placed in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutCell {
    pub column: LayoutColumn,
    pub uids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRow {
    /// 1-based; fields placed on the bare area name land in row 0
    pub index: usize,
    pub cells: Vec<LayoutCell>,
}

pub fn row_position(area: &str, row: usize, column: LayoutColumn) -> String {
    format!("{area}_{row}-{}", column.as_str())
}

/// Split `position` into row and column when it belongs to `area`.
fn parse_row_position(area: &str, position: &str) -> Option<(usize, LayoutColumn)> {
    if position == area {
        return Some((0, LayoutColumn::Full));
    }
    let rest = position.strip_prefix(area)?.strip_prefix('_')?;
    let (row, column) = rest.split_once('-')?;
    Some((row.parse().ok()?, LayoutColumn::parse(column)?))
}

/// Lay out the searchable fields of `collection` in rows inside `area`.
///
/// Structural controls keep their positions. The source collection is left as is.
pub fn apply_row_layout(
    collection: &SearchFieldCollection,
    area: &str,
    layout: SearchLayout,
) -> SearchFieldCollection {
    let columns = layout.columns();
    let mut placed = 0;
    let fields = collection.iter().map(|field| {
        if !field.is_searchable() {
            return field.clone();
        }
        let row = placed / columns + 1;
        let column = match (layout, placed % columns) {
            (SearchLayout::Vertical, _) => LayoutColumn::Full,
            (SearchLayout::Horizontal, 0) => LayoutColumn::Left,
            (SearchLayout::Horizontal, _) => LayoutColumn::Right,
        };
        placed += 1;
        field.clone().at_position(row_position(area, row, column))
    });

    let mut laid_out = match collection.form_id() {
        Some(form_id) => SearchFieldCollection::for_form(form_id),
        None => SearchFieldCollection::new(),
    };
    laid_out.add(fields.collect::<Vec<SearchField>>());
    laid_out
}

/// Read the rows of `area` back out of a laid-out collection, in row order.
pub fn rows(collection: &SearchFieldCollection, area: &str) -> Vec<LayoutRow> {
    let mut rows: Vec<LayoutRow> = Vec::new();

    for field in collection {
        let Some((index, column)) = field
            .position()
            .and_then(|position| parse_row_position(area, position))
        else {
            continue;
        };

        let row_at = match rows.iter().position(|row| row.index == index) {
            Some(existing) => existing,
            None => {
                rows.push(LayoutRow {
                    index,
                    cells: Vec::new(),
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[row_at];
        match row.cells.iter_mut().find(|cell| cell.column == column) {
            Some(cell) => cell.uids.push(field.uid().to_string()),
            None => row.cells.push(LayoutCell {
                column,
                uids: vec![field.uid().to_string()],
            }),
        }
    }

    rows.sort_by_key(|row| row.index);
    for row in &mut rows {
        row.cells.sort_by_key(|cell| cell.column as u8);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::SearchFieldKind;

    fn collection() -> SearchFieldCollection {
        SearchFieldCollection::new().with_fields([
            SearchField::new(SearchFieldKind::AllFields),
            SearchField::new(SearchFieldKind::EntryId),
            SearchField::new(SearchFieldKind::CreatedBy),
            SearchField::new(SearchFieldKind::Submit).at_position(ACTIONS_AREA),
        ])
    }

    #[test]
    fn horizontal_places_two_per_row() {
        let source = collection();
        let laid_out = apply_row_layout(&source, DEFAULT_AREA, SearchLayout::Horizontal);

        let positions: Vec<_> = laid_out.iter().filter_map(SearchField::position).collect();
        assert_eq!(
            positions,
            vec![
                "search-general_1-left",
                "search-general_1-right",
                "search-general_2-left",
                ACTIONS_AREA
            ]
        );
        assert!(source.iter().all(|f| !f.position().unwrap_or_default().contains('_')));

        let rows = rows(&laid_out, DEFAULT_AREA);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells.len(), 2);
        assert_eq!(rows[0].cells[1].column, LayoutColumn::Right);
        assert_eq!(rows[1].cells[0].uids, vec!["created_by_1".to_string()]);
    }

    #[test]
    fn vertical_stacks_one_per_row() {
        let laid_out = apply_row_layout(&collection(), DEFAULT_AREA, SearchLayout::Vertical);
        let rows = rows(&laid_out, DEFAULT_AREA);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.cells.len() == 1 && row.cells[0].column == LayoutColumn::Full));
        assert_eq!(rows[2].index, 3);
    }

    #[test]
    fn lenient_layout_names() {
        assert_eq!(SearchLayout::parse_lenient(Some("Vertical")), SearchLayout::Vertical);
        assert_eq!(SearchLayout::parse_lenient(Some("grid")), SearchLayout::Horizontal);
        assert_eq!(SearchLayout::parse_lenient(None), SearchLayout::Horizontal);
    }
}
