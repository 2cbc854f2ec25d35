use std::env;

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "resources/missing_character.json".to_string()
}

fn default_pretty() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TableConfig {
    /// Location of the persisted JSON table
    #[serde(default = "default_path")]
    pub path: String,
    /// Pretty-print the table when writing it back
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            pretty: default_pretty(),
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        let path = env::var("CBETA_TABLE_PATH").unwrap_or_else(|_| default_path());

        Self {
            path,
            ..Self::default()
        }
    }
}
