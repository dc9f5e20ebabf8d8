use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators understood by the downstream query engine.
///
/// The string forms are a wire contract and must stay verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "starts_with")]
    StartsWith,
    #[serde(rename = "ends_with")]
    EndsWith,
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "isnot")]
    IsNot,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
    #[serde(rename = "like")]
    Like,
}

impl Operator {
    pub const ALL: [Operator; 14] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Lt,
        Self::Ge,
        Self::Le,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::Is,
        Self::IsNot,
        Self::In,
        Self::NotIn,
        Self::Like,
    ];

    /// Parse an operator from its wire form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Is => "is",
            Self::IsNot => "isnot",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Like => "like",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether all filters must match or any one is enough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Any,
    All,
}

impl SearchMode {
    /// Case-insensitive parse; anything unrecognized is `Any`.
    pub fn parse_lenient(s: Option<&str>) -> Self {
        match s.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("all") => Self::All,
            _ => Self::Any,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::All => "all",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_wire_forms_round_trip() {
        for op in Operator::ALL {
            assert_eq!(Operator::parse(op.as_str()), Some(op));
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.as_str()));
        }
        assert_eq!(Operator::parse("not in"), Some(Operator::NotIn));
        assert_eq!(Operator::parse("<>"), None);
        assert_eq!(Operator::parse("NOT IN"), None);
    }

    #[test]
    fn mode_normalization() {
        assert_eq!(SearchMode::parse_lenient(Some("ALL")), SearchMode::All);
        assert_eq!(SearchMode::parse_lenient(Some(" all ")), SearchMode::All);
        assert_eq!(SearchMode::parse_lenient(Some("Any")), SearchMode::Any);
        assert_eq!(SearchMode::parse_lenient(Some("bogus")), SearchMode::Any);
        assert_eq!(SearchMode::parse_lenient(None), SearchMode::Any);
    }
}
