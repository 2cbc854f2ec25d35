use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ScanConfig {
    /// Root of the P5 source tree to scan, if any
    pub source_dir: Option<String>,
    /// Log and skip documents that fail to parse instead of aborting the walk
    pub continue_on_error: bool,
    /// Only scan files with one of these extensions. Empty means every file.
    pub extensions: Vec<String>,
}

impl ScanConfig {
    pub fn new() -> Self {
        let source_dir = env::var("CBETA_SOURCE_DIR").ok();

        let continue_on_error = env::var("CBETA_CONTINUE_ON_ERROR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);

        let extensions = env::var("CBETA_EXTENSIONS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|ext| !ext.is_empty())
                    .map(|ext| ext.trim_start_matches('.').to_string())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            source_dir,
            continue_on_error,
            extensions,
        }
    }

    /// Whether a file with this extension should be scanned
    pub fn accepts_extension(&self, ext: Option<&str>) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        ext.is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}
