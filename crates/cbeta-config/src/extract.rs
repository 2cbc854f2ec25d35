use std::collections::HashMap;

use cbeta_types::RecordField;
use serde::{Deserialize, Serialize};

/// Namespace of `xml:id` and friends
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

fn default_field_mapping() -> HashMap<String, RecordField> {
    [
        ("big5", RecordField::Big5),
        ("Character in the Siddham font", RecordField::CharInSiddhamFont),
        ("composition", RecordField::Zzs),
        ("normalized form", RecordField::Normal),
        ("rjchar", RecordField::Rjchar),
        ("Romanized form in CBETA transcription", RecordField::RomanCbeta),
        ("Romanized form in Unicode transcription", RecordField::Roman),
    ]
    .into_iter()
    .map(|(local_name, field)| (local_name.to_string(), field))
    .collect()
}

fn default_reserved_namespace() -> String {
    XML_NAMESPACE.to_string()
}

fn default_declarations_tag() -> String {
    "charDecl".to_string()
}

fn default_char_tag() -> String {
    "char".to_string()
}

fn default_property_tag() -> String {
    "charProp".to_string()
}

fn default_mapping_tag() -> String {
    "mapping".to_string()
}

fn default_local_name_tag() -> String {
    "localName".to_string()
}

fn default_value_tag() -> String {
    "value".to_string()
}

fn default_mapping_prefix_len() -> usize {
    2
}

fn default_mapping_suffix_len() -> usize {
    1
}

/// Vocabulary and document shape used when pulling records out of a
/// character declaration.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ExtractConfig {
    /// `charProp/localName` -> record field
    #[serde(default = "default_field_mapping")]
    pub field_mapping: HashMap<String, RecordField>,
    /// Attributes in this namespace are renamed to their local name
    #[serde(default = "default_reserved_namespace")]
    pub reserved_namespace: String,
    #[serde(default = "default_declarations_tag")]
    pub declarations_tag: String,
    #[serde(default = "default_char_tag")]
    pub char_tag: String,
    #[serde(default = "default_property_tag")]
    pub property_tag: String,
    #[serde(default = "default_mapping_tag")]
    pub mapping_tag: String,
    #[serde(default = "default_local_name_tag")]
    pub local_name_tag: String,
    #[serde(default = "default_value_tag")]
    pub value_tag: String,
    /// Characters dropped from the front of a mapping payload
    #[serde(default = "default_mapping_prefix_len")]
    pub mapping_prefix_len: usize,
    /// Characters dropped from the end of a mapping payload
    #[serde(default = "default_mapping_suffix_len")]
    pub mapping_suffix_len: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            field_mapping: default_field_mapping(),
            reserved_namespace: default_reserved_namespace(),
            declarations_tag: default_declarations_tag(),
            char_tag: default_char_tag(),
            property_tag: default_property_tag(),
            mapping_tag: default_mapping_tag(),
            local_name_tag: default_local_name_tag(),
            value_tag: default_value_tag(),
            mapping_prefix_len: default_mapping_prefix_len(),
            mapping_suffix_len: default_mapping_suffix_len(),
        }
    }
}

impl ExtractConfig {
    /// Look up the canonical field for a `localName`
    pub fn field_for(&self, local_name: &str) -> Option<RecordField> {
        self.field_mapping.get(local_name).copied()
    }
}
