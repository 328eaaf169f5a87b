use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Value written into one template field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Checkbox(bool),
    /// Export value of the selected option.
    Radio(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Checkbox(_) => FieldKind::Checkbox,
            Self::Radio(_) => FieldKind::Radio,
        }
    }

    /// Empty text or an unchecked box.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) | Self::Radio(text) => text.is_empty(),
            Self::Checkbox(checked) => !checked,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Checkbox(true) => f.write_str("[x]"),
            Self::Checkbox(false) => f.write_str("[ ]"),
            Self::Radio(option) => write!(f, "({option})"),
        }
    }
}

/// Kind of a field as declared by a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Checkbox,
    Radio,
}

/// Fully qualified field names a template declares, with their kinds.
pub type TemplateNamespace = BTreeMap<String, FieldKind>;

/// Field assignments ready to write into a template.
pub type FieldValues = BTreeMap<String, FieldValue>;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn blank_values() {
        assert!(FieldValue::text("").is_blank());
        assert!(FieldValue::Checkbox(false).is_blank());
        assert!(!FieldValue::Radio("Yes".to_string()).is_blank());
    }

    #[test]
    fn serializes_tagged() {
        let json = serde_json::to_string(&FieldValue::Checkbox(true)).unwrap();

        assert_eq!(json, r#"{"type":"checkbox","value":true}"#);
    }
}
