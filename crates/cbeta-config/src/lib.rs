use serde::{Deserialize, Serialize};

pub use self::extract::{ExtractConfig, XML_NAMESPACE};
pub use self::scan::ScanConfig;
pub use self::table::TableConfig;

pub mod extract;
pub mod scan;
pub mod table;

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractConfig,
    pub table: TableConfig,
    pub scan: ScanConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        Config {
            extract: ExtractConfig::default(),
            table: TableConfig::new(),
            scan: ScanConfig::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use cbeta_types::RecordField;

    use super::*;

    #[test]
    fn test_default_field_mapping() {
        let config = ExtractConfig::default();
        assert_eq!(config.field_mapping.len(), 7);
        assert_eq!(config.field_for("composition"), Some(RecordField::Zzs));
        assert_eq!(config.field_for("normalized form"), Some(RecordField::Normal));
        assert_eq!(
            config.field_for("Romanized form in Unicode transcription"),
            Some(RecordField::Roman)
        );
        assert_eq!(config.field_for("unknown"), None);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let json = r#"{"table": {"path": "data/table.json"}, "scan": {"continue_on_error": true}}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.table.path, "data/table.json");
        assert!(config.table.pretty);
        assert!(config.scan.continue_on_error);
        assert_eq!(config.extract.char_tag, "char");
        assert_eq!(config.extract.reserved_namespace, XML_NAMESPACE);
        assert_eq!(config.extract.mapping_prefix_len, 2);
    }

    #[test]
    fn test_custom_vocabulary() {
        let json = r#"{"field_mapping": {"decomp": "zzs"}}"#;
        let config: ExtractConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.field_mapping.len(), 1);
        assert_eq!(config.field_for("decomp"), Some(RecordField::Zzs));
        assert_eq!(config.field_for("composition"), None);
    }

    #[test]
    fn test_unknown_field_name_is_rejected() {
        let json = r#"{"field_mapping": {"decomp": "not_a_field"}}"#;
        assert!(serde_json::from_str::<ExtractConfig>(json).is_err());
    }

    #[test]
    fn test_extension_filter() {
        let mut scan = ScanConfig::default();
        assert!(scan.accepts_extension(None));
        assert!(scan.accepts_extension(Some("txt")));

        scan.extensions = vec!["xml".to_string()];
        assert!(scan.accepts_extension(Some("xml")));
        assert!(scan.accepts_extension(Some("XML")));
        assert!(!scan.accepts_extension(Some("json")));
        assert!(!scan.accepts_extension(None));
    }
}
