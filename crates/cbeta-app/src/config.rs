use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use cbeta_config::Config;

/// Config from the JSON file named by `CBETA_CONFIG`, or defaults with
/// environment overrides
pub fn load_config() -> anyhow::Result<Config> {
    match env::var("CBETA_CONFIG") {
        Ok(path) => load_config_file(Path::new(&path)),
        Err(_) => Ok(Config::new()),
    }
}

pub fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "table": {"path": "out/table.json", "pretty": false},
                "scan": {"extensions": ["xml"]}
            }"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();

        assert_eq!(config.table.path, "out/table.json");
        assert!(!config.table.pretty);
        assert_eq!(config.scan.extensions, vec!["xml".to_string()]);
        assert_eq!(config.extract.field_mapping.len(), 7);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_file(&dir.path().join("none.json")).is_err());
    }
}
