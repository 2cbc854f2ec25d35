use cbeta_config::ExtractConfig;
use cbeta_types::{CharacterRecord, MappingKind};

use crate::diagnostics::{DiagnosticsSink, TracingSink};
use crate::error::ExtractError;
use crate::xml::{Document, Element};

/// Attribute carrying the CBETA code once `xml:id` has been normalized
pub const ID_ATTRIBUTE: &str = "id";

/// Turns normalized `char` declarations into records
pub struct CharacterExtractor<S = TracingSink> {
    config: ExtractConfig,
    sink: S,
}

impl<S: DiagnosticsSink> CharacterExtractor<S> {
    pub fn new(config: ExtractConfig, sink: S) -> Self {
        Self { config, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Every `char` directly under a `charDecl`, anywhere in the document.
    /// Tags must already be normalized.
    pub fn declarations<'d>(&self, document: &'d Document) -> Vec<&'d Element> {
        let config = &self.config;
        document
            .iter()
            .filter(|e| e.tag == config.declarations_tag)
            .flat_map(|decl| decl.children_named(&config.char_tag))
            .collect()
    }

    pub fn declaration_id<'a>(&self, node: &'a Element) -> Result<&'a str, ExtractError> {
        node.attribute(ID_ATTRIBUTE)
            .ok_or_else(|| ExtractError::MissingIdentifier {
                attribute: ID_ATTRIBUTE.to_string(),
            })
    }

    /// Build a record from one `char` node. `id` is only used for
    /// diagnostics; the caller keys the table.
    pub fn extract_record(&mut self, id: &str, node: &Element) -> CharacterRecord {
        let mut record = CharacterRecord::new();

        for prop in node.children_named(&self.config.property_tag) {
            let local_name = prop.child(&self.config.local_name_tag).map(child_text);
            let value = prop.child(&self.config.value_tag).map(child_text);

            match (local_name, value) {
                (Some(local_name), Some(value)) => match self.config.field_for(local_name) {
                    Some(field) => record.set_field(field, value.to_string()),
                    None => self.sink.unmapped_property(id, local_name, value),
                },
                (local_name, value) => {
                    tracing::warn!(char_id = id, "charProp without localName or value");
                    self.sink
                        .unmapped_property(id, local_name.unwrap_or(""), value.unwrap_or(""));
                }
            }
        }

        for mapping in node.children_named(&self.config.mapping_tag) {
            let Some(kind) = mapping.attribute("type").and_then(MappingKind::from_type) else {
                continue;
            };

            let payload = mapping.text().unwrap_or("");
            let Some(hex) = self.strip_payload(payload) else {
                tracing::warn!(
                    char_id = id,
                    mapping_type = kind.as_str(),
                    payload,
                    "mapping payload too short, skipping"
                );
                continue;
            };

            if kind == MappingKind::Unicode {
                match decode_code_point(hex) {
                    Some(c) => record.unicode_char = Some(c.to_string()),
                    None => {
                        tracing::warn!(
                            char_id = id,
                            hex,
                            "unicode mapping is not a valid code point"
                        );
                    }
                }
            }
            record.set_mapping(kind, hex.to_string());
        }

        tracing::debug!(char_id = id, ?record, "extracted character");
        record
    }

    fn strip_payload<'a>(&self, payload: &'a str) -> Option<&'a str> {
        let prefix = self.config.mapping_prefix_len;
        let suffix = self.config.mapping_suffix_len;
        let count = payload.chars().count();
        if count < prefix + suffix {
            return None;
        }

        let offset = |n: usize| {
            payload
                .char_indices()
                .nth(n)
                .map_or(payload.len(), |(i, _)| i)
        };
        Some(&payload[offset(prefix)..offset(count - suffix)])
    }
}

fn child_text(element: &Element) -> &str {
    element.text().unwrap_or("")
}

/// Hex code point -> character
pub fn decode_code_point(hex: &str) -> Option<char> {
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}
