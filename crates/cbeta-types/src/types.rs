use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One missing-character entry, keyed by its CBETA code (e.g. `CB00006`)
/// in the surrounding table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// Legacy Big5 code point label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub big5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_in_siddham_font: Option<String>,
    /// Composition expression, e.g. `[(王*巨)/木]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zzs: Option<String>,
    /// Normalized form in standard script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rjchar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roman_cbeta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roman: Option<String>,
    /// Hex code point of the normalized form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_unicode: Option<String>,
    /// Hex code point, when the character has since been encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode: Option<String>,
    /// Character decoded from `unicode`
    #[serde(
        rename = "unicode-char",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub unicode_char: Option<String>,
    /// Bopomofo readings. Only present in the shipped table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zhuyin: Option<Vec<String>>,
    /// Keys this version does not know about, kept so a load/save cycle
    /// does not lose them.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CharacterRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one of the property-backed fields
    pub fn set_field(&mut self, field: RecordField, value: String) {
        let slot = match field {
            RecordField::Big5 => &mut self.big5,
            RecordField::CharInSiddhamFont => &mut self.char_in_siddham_font,
            RecordField::Zzs => &mut self.zzs,
            RecordField::Normal => &mut self.normal,
            RecordField::Rjchar => &mut self.rjchar,
            RecordField::RomanCbeta => &mut self.roman_cbeta,
            RecordField::Roman => &mut self.roman,
        };
        *slot = Some(value);
    }

    /// Set the hex value carried by a retained mapping
    pub fn set_mapping(&mut self, kind: MappingKind, hex: String) {
        match kind {
            MappingKind::NormalUnicode => self.normal_unicode = Some(hex),
            MappingKind::Unicode => self.unicode = Some(hex),
        }
    }
}

/// Canonical record fields that can be filled from a `charProp`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Big5,
    CharInSiddhamFont,
    Zzs,
    Normal,
    Rjchar,
    RomanCbeta,
    Roman,
}

impl RecordField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Big5 => "big5",
            RecordField::CharInSiddhamFont => "char_in_siddham_font",
            RecordField::Zzs => "zzs",
            RecordField::Normal => "normal",
            RecordField::Rjchar => "rjchar",
            RecordField::RomanCbeta => "roman_cbeta",
            RecordField::Roman => "roman",
        }
    }
}

/// Mapping types kept from a `mapping` node; everything else is ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingKind {
    NormalUnicode,
    Unicode,
}

impl MappingKind {
    /// Parse a `type` attribute value
    pub fn from_type(s: &str) -> Option<Self> {
        match s {
            "normal_unicode" => Some(MappingKind::NormalUnicode),
            "unicode" => Some(MappingKind::Unicode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MappingKind::NormalUnicode => "normal_unicode",
            MappingKind::Unicode => "unicode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let mut record = CharacterRecord::new();
        record.set_field(RecordField::Normal, "璩".to_string());
        record.set_mapping(MappingKind::Unicode, "249B2".to_string());
        record.unicode_char = Some("𤦲".to_string());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"normal": "璩", "unicode": "249B2", "unicode-char": "𤦲"})
        );
    }

    #[test]
    fn test_unknown_keys_survive_deserialization() {
        let json = r#"{"zzs": "[(王*巨)/木]", "zhuyin": ["ㄑㄩˊ"], "future_field": 3}"#;
        let record: CharacterRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.zzs.as_deref(), Some("[(王*巨)/木]"));
        assert_eq!(record.zhuyin, Some(vec!["ㄑㄩˊ".to_string()]));
        assert_eq!(record.extra.get("future_field"), Some(&serde_json::json!(3)));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["future_field"], serde_json::json!(3));
    }

    #[test]
    fn test_record_field_names_match_serde() {
        for field in [
            RecordField::Big5,
            RecordField::CharInSiddhamFont,
            RecordField::Zzs,
            RecordField::Normal,
            RecordField::Rjchar,
            RecordField::RomanCbeta,
            RecordField::Roman,
        ] {
            let json = serde_json::to_value(field).unwrap();
            assert_eq!(json, serde_json::json!(field.as_str()));
        }
    }

    #[test]
    fn test_mapping_kind_from_type() {
        assert_eq!(MappingKind::from_type("unicode"), Some(MappingKind::Unicode));
        assert_eq!(
            MappingKind::from_type("normal_unicode"),
            Some(MappingKind::NormalUnicode)
        );
        assert_eq!(MappingKind::from_type("entity"), None);
    }
}
