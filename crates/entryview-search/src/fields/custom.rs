//! Extension point for field types registered outside this crate.

use std::fmt;

use entryview_core::ViewerContext;

use super::SearchField;
use crate::parameters::Operator;
use crate::parser::SearchRequestParser;

/// A third-party search field type.
///
/// Register instances through a [`crate::registry::FieldRegistrant`], which adds a
/// [`SearchField`] with [`super::SearchFieldKind::Custom`] to the candidate list.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug)]
/// struct ApprovalStatus;
///
/// impl CustomFieldType for ApprovalStatus {
///     fn type_name(&self) -> &str { "is_approved" }
///     fn default_label(&self) -> &str { "Approval Status" }
///     fn allowed_operators(&self) -> &[Operator] { &[Operator::Eq, Operator::Ne] }
/// }
/// ```
pub trait CustomFieldType: fmt::Debug + Send + Sync {
    /// Type discriminator, unique among field types.
    fn type_name(&self) -> &str;

    /// Field id used in request keys and filter criteria.
    fn field_id(&self) -> &str {
        self.type_name()
    }

    fn default_label(&self) -> &str;

    fn allowed_operators(&self) -> &[Operator] {
        &[Operator::Eq]
    }

    fn default_input(&self) -> &str {
        "input_text"
    }

    /// Structural controls return false and are left out of template data.
    fn is_searchable(&self) -> bool {
        true
    }

    /// Extra visibility condition on top of `only_loggedin`.
    fn is_visible(&self, _field: &SearchField, _ctx: &ViewerContext) -> bool {
        true
    }

    fn request_keys(&self) -> Vec<String> {
        vec![SearchRequestParser::encode_field_key(self.field_id(), None)]
    }
}
