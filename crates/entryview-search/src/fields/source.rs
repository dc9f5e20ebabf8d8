//! Adapter for fields that live on a source form.

use entryview_core::SourceFieldDescriptor;

use crate::parameters::Operator;

const TEXT_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Contains,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::Like,
    Operator::Is,
    Operator::IsNot,
];

const NUMBER_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Gt,
    Operator::Lt,
    Operator::Ge,
    Operator::Le,
    Operator::Is,
    Operator::IsNot,
];

const CHOICE_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Is,
    Operator::IsNot,
    Operator::In,
    Operator::NotIn,
    Operator::Contains,
];

/// How a source field type is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFamily {
    Text,
    Number,
    Choice,
    Date,
}

impl SourceFamily {
    pub fn of(field_type: &str) -> Self {
        match field_type {
            "number" | "total" | "quantity" | "product" | "price" | "calculation" => Self::Number,
            "select" | "multiselect" | "radio" | "checkbox" | "option" | "post_category"
            | "workflow_step" => Self::Choice,
            "date" | "date_created" | "date_updated" => Self::Date,
            _ => Self::Text,
        }
    }

    pub fn operators(self) -> &'static [Operator] {
        match self {
            Self::Text => TEXT_OPERATORS,
            Self::Number | Self::Date => NUMBER_OPERATORS,
            Self::Choice => CHOICE_OPERATORS,
        }
    }

    pub fn default_input(self) -> &'static str {
        match self {
            Self::Text | Self::Number => "input_text",
            Self::Choice => "select",
            Self::Date => "date",
        }
    }
}

/// A reference to a field (or one sub-input of a field) on a source form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFieldRef {
    /// `4` for a whole field, `4.3` for a sub-input
    pub field_id: String,
    /// Set when the field belongs to a form other than the view's own
    pub form_id: Option<String>,
    pub source_type: String,
    pub source_label: String,
    pub input_types: Vec<String>,
}

impl FormFieldRef {
    /// # Panics
    ///
    /// Panics when `field_id` is empty; that is a caller defect, not bad request input.
    pub fn new(field_id: impl Into<String>, source_type: impl Into<String>) -> Self {
        let field_id = field_id.into();
        assert!(
            !field_id.trim().is_empty(),
            "form field reference requires a non-empty field id"
        );
        Self {
            field_id,
            form_id: None,
            source_type: source_type.into(),
            source_label: String::new(),
            input_types: Vec::new(),
        }
    }

    /// Adapters for a descriptor: the whole field first, then each sub-input.
    pub fn from_descriptor(descriptor: &SourceFieldDescriptor) -> Vec<Self> {
        let whole = Self {
            field_id: descriptor.id.clone(),
            form_id: None,
            source_type: descriptor.field_type.clone(),
            source_label: descriptor.label.clone(),
            input_types: descriptor.available_input_types.clone(),
        };

        let inputs = descriptor.inputs.iter().map(|input| Self {
            field_id: input.id.clone(),
            form_id: None,
            source_type: descriptor.field_type.clone(),
            source_label: if input.label.is_empty() {
                descriptor.label.clone()
            } else {
                format!("{} ({})", descriptor.label, input.label)
            },
            input_types: descriptor.available_input_types.clone(),
        });

        std::iter::once(whole).chain(inputs).collect()
    }

    pub fn family(&self) -> SourceFamily {
        SourceFamily::of(&self.source_type)
    }

    pub fn default_input(&self) -> &str {
        self.input_types
            .first()
            .map_or(self.family().default_input(), String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_expands_sub_inputs() {
        let descriptor = SourceFieldDescriptor::new("4", "name", "Name")
            .with_input("4.3", "First")
            .with_input("4.6", "Last");
        let refs = FormFieldRef::from_descriptor(&descriptor);

        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].field_id, "4");
        assert_eq!(refs[1].field_id, "4.3");
        assert_eq!(refs[1].source_label, "Name (First)");
        assert_eq!(refs[2].source_label, "Name (Last)");
        assert!(refs.iter().all(|r| r.form_id.is_none()));
    }

    #[test]
    fn operators_follow_source_family() {
        let number = FormFieldRef::new("2", "number");
        assert!(number.family().operators().contains(&Operator::Gt));
        assert!(!number.family().operators().contains(&Operator::Contains));

        let text = FormFieldRef::new("3", "text");
        assert!(text.family().operators().contains(&Operator::StartsWith));
        assert_eq!(text.default_input(), "input_text");

        let choice = FormFieldRef::new("5", "select");
        assert!(choice.family().operators().contains(&Operator::In));
        assert_eq!(choice.default_input(), "select");
    }

    #[test]
    #[should_panic(expected = "non-empty field id")]
    fn empty_field_id_is_a_caller_defect() {
        let _ = FormFieldRef::new("", "text");
    }
}
