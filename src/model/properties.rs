use super::RichTextItem;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// A page property value, reduced to the types the exporter reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichTextItem>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichTextItem>,
    },
    Select {
        #[serde(default)]
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

impl PropertyValue {
    /// Decodes a single property, falling back to `Unsupported` when the
    /// payload doesn't match its declared type.
    pub fn from_json(name: &str, value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            log::warn!(
                "Property '{}' could not be decoded ({}); treating it as unsupported",
                name,
                e
            );
            PropertyValue::Unsupported
        })
    }
}

/// Deserializes a property map without letting one malformed property fail the page.
pub(crate) fn lenient_properties<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, PropertyValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let parsed = PropertyValue::from_json(&name, value);
            (name, parsed)
        })
        .collect())
}
