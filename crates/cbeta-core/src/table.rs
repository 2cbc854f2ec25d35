use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use cbeta_config::TableConfig;
use cbeta_types::CharacterRecord;
use tempfile::NamedTempFile;

use crate::error::StoreError;

pub type Records = BTreeMap<String, CharacterRecord>;

/// CBETA code -> record, plus a composition (`zzs`) -> code index.
///
/// The index is built when the table is created and only refreshed by
/// [`CharacterTable::rebuild_index`]; inserts leave it alone.
#[derive(Debug, Default, Clone)]
pub struct CharacterTable {
    records: Records,
    zzs_index: HashMap<String, String>,
}

impl CharacterTable {
    pub fn new(records: Records) -> Self {
        let mut table = Self {
            records,
            zzs_index: HashMap::new(),
        };
        table.rebuild_index();
        table
    }

    /// Recompute the composition index from the current records. When two
    /// records share a composition, the smaller code keeps it.
    pub fn rebuild_index(&mut self) {
        self.zzs_index.clear();
        for (code, record) in &self.records {
            let Some(zzs) = &record.zzs else {
                continue;
            };
            if let Some(existing) = self.zzs_index.get(zzs) {
                tracing::warn!(
                    zzs = %zzs,
                    kept = %existing,
                    dropped = %code,
                    "duplicate composition"
                );
                continue;
            }
            self.zzs_index.insert(zzs.clone(), code.clone());
        }
        tracing::debug!(entries = self.zzs_index.len(), "rebuilt composition index");
    }

    /// Insert or replace the whole record for `code`
    pub fn insert(
        &mut self,
        code: impl Into<String>,
        record: CharacterRecord,
    ) -> Option<CharacterRecord> {
        self.records.insert(code.into(), record)
    }

    pub fn get(&self, code: &str) -> Option<&CharacterRecord> {
        self.records.get(code)
    }

    /// Bopomofo readings for `code`, if the table has any
    pub fn phonetic_notation(&self, code: &str) -> Option<&[String]> {
        self.records.get(code)?.zhuyin.as_deref()
    }

    /// CBETA code whose composition is `zzs`, e.g. `[(王*巨)/木]` -> `CB00006`
    pub fn code_for_composition(&self, zzs: &str) -> Option<&str> {
        self.zzs_index.get(zzs).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &Records {
        &self.records
    }
}

/// Persistence for the table
pub trait TableStore {
    fn load(&self) -> Result<Records, StoreError>;

    fn save(&self, records: &Records) -> Result<(), StoreError>;
}

/// The table as one JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    pub fn from_config(config: &TableConfig) -> Self {
        Self {
            path: PathBuf::from(&config.path),
            pretty: config.pretty,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> StoreError {
        StoreError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl TableStore for JsonFileStore {
    fn load(&self) -> Result<Records, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "table file not found, starting empty");
                return Ok(Records::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let records: Records =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| self.json_error(e))?;
        tracing::info!(path = %self.path.display(), "Loaded {} missing characters", records.len());
        Ok(records)
    }

    fn save(&self, records: &Records) -> Result<(), StoreError> {
        let parent_dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_dir).map_err(|e| self.io_error(e))?;

        let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| self.io_error(e))?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            let written = if self.pretty {
                serde_json::to_writer_pretty(&mut writer, records)
            } else {
                serde_json::to_writer(&mut writer, records)
            };
            written.map_err(|e| self.json_error(e))?;
            writer.flush().map_err(|e| self.io_error(e))?;
        }

        temp_file
            .persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        tracing::info!(path = %self.path.display(), "Saved {} missing characters", records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(zzs: Option<&str>) -> CharacterRecord {
        CharacterRecord {
            zzs: zzs.map(str::to_string),
            ..CharacterRecord::default()
        }
    }

    #[test]
    fn test_composition_index_built_on_creation() {
        let mut records = Records::new();
        records.insert("CB00006".to_string(), record(Some("[(王*巨)/木]")));
        records.insert("CB00007".to_string(), record(None));

        let table = CharacterTable::new(records);

        assert_eq!(table.code_for_composition("[(王*巨)/木]"), Some("CB00006"));
        assert_eq!(table.code_for_composition("[a/b]"), None);
    }

    #[test]
    fn test_index_is_stale_until_rebuilt() {
        let mut table = CharacterTable::default();
        table.insert("CB1", record(Some("[a/b]")));

        assert_eq!(table.get("CB1").and_then(|r| r.zzs.as_deref()), Some("[a/b]"));
        assert_eq!(table.code_for_composition("[a/b]"), None);

        table.rebuild_index();
        assert_eq!(table.code_for_composition("[a/b]"), Some("CB1"));
    }

    #[test]
    fn test_duplicate_composition_keeps_smallest_code() {
        let mut records = Records::new();
        records.insert("CB00200".to_string(), record(Some("[x/y]")));
        records.insert("CB00100".to_string(), record(Some("[x/y]")));

        let table = CharacterTable::new(records);

        assert_eq!(table.code_for_composition("[x/y]"), Some("CB00100"));
    }

    #[test]
    fn test_phonetic_notation() {
        let mut with_zhuyin = record(None);
        with_zhuyin.zhuyin = Some(vec!["ㄍㄢˇ".to_string(), "ㄍㄢ".to_string()]);

        let mut table = CharacterTable::default();
        table.insert("CB00023", with_zhuyin);
        table.insert("CB00024", record(None));

        assert_eq!(
            table.phonetic_notation("CB00023"),
            Some(&["ㄍㄢˇ".to_string(), "ㄍㄢ".to_string()][..])
        );
        assert_eq!(table.phonetic_notation("CB00024"), None);
        assert_eq!(table.phonetic_notation("nonexistent"), None);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing.json"));

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        fs::write(&path, "[1, 2").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
    }

    #[test]
    fn test_save_then_load_keeps_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("table.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{"CB00023": {"zhuyin": ["ㄧㄤˊ"], "note": {"source": "manual"}}}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path).pretty(false);
        let records = store.load().unwrap();
        store.save(&records).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            saved,
            serde_json::json!({"CB00023": {"zhuyin": ["ㄧㄤˊ"], "note": {"source": "manual"}}})
        );
    }
}
