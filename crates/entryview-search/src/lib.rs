//! Search request compilation for EntryView.
//!
//! The pipeline has three stages:
//! - [`parser`] turns raw request arguments into a [`SearchRequest`] (mode plus filter intents)
//! - [`registry`] and [`collection`] describe which fields a view lets visitors search
//! - [`builder`] combines the two with the view's date bounds into [`SearchCriteria`]
//!
//! Everything is request-scoped and synchronous; request arguments are always passed in
//! explicitly.

pub mod builder;
pub mod collection;
pub mod criteria;
pub mod fields;
pub mod layout;
pub mod legacy;
pub mod parameters;
pub mod parser;
pub mod registry;
pub mod view;

pub use builder::{FilterBuilder, to_search_criteria};
pub use collection::{RequiredFieldsConfig, SearchFieldCollection};
pub use criteria::{FieldFilter, FieldFilterEntry, SearchCriteria};
pub use fields::{CustomFieldType, FormFieldRef, SearchField, SearchFieldKind};
pub use layout::{
    ACTIONS_AREA, DEFAULT_AREA, LayoutCell, LayoutColumn, LayoutRow, SearchLayout, apply_row_layout,
    rows,
};
pub use legacy::translate_legacy_record;
pub use parameters::{Operator, SearchMode};
pub use parser::{FilterIntent, SearchRequest, SearchRequestParser};
pub use registry::{FieldRegistrant, FieldRegistry, FieldSource, FnRegistrant, StaticFieldSource};
pub use view::SearchView;
