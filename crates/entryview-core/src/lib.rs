pub mod error;
pub mod request;
pub mod source;
pub mod time;
pub mod viewer;

pub use error::{CoreError, Result};
pub use request::{RequestArgs, RequestValue, parse_query};
pub use source::{SourceFieldDescriptor, SourceInput};
pub use time::{DateBounds, format_search_date, parse_search_date};
pub use viewer::{Viewer, ViewerContext};
