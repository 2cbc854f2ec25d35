use std::path::Path;

use cbeta_config::{Config, ExtractConfig, ScanConfig};
use cbeta_types::CharacterRecord;
use walkdir::{DirEntry, WalkDir};

use crate::diagnostics::{DiagnosticsSink, TracingSink};
use crate::error::{ScanError, StoreError};
use crate::extract::CharacterExtractor;
use crate::namespace::NamespaceNormalizer;
use crate::table::{CharacterTable, TableStore};
use crate::xml::{Document, ParseFileError};

/// Outcome of scanning one document
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    /// `char` nodes found under `charDecl`
    pub declarations: usize,
    /// Records written to the table
    pub extracted: usize,
    /// Declarations skipped for lacking an identifier
    pub missing_id: usize,
}

/// Outcome of scanning a directory tree
#[derive(Debug, Default)]
pub struct TreeSummary {
    pub documents: usize,
    pub extracted: usize,
    pub missing_id: usize,
    /// Documents that failed while `continue_on_error` was set
    pub failures: Vec<ScanError>,
}

impl TreeSummary {
    fn add(&mut self, summary: ScanSummary) {
        self.documents += 1;
        self.extracted += summary.extracted;
        self.missing_id += summary.missing_id;
    }
}

/// The missing-character table together with everything needed to keep it
/// up to date from P5 sources.
pub struct MissingCharacters<S = TracingSink> {
    table: CharacterTable,
    extractor: CharacterExtractor<S>,
    normalizer: NamespaceNormalizer,
    scan: ScanConfig,
}

impl MissingCharacters<TracingSink> {
    /// Load the table from `store` and build the composition index
    pub fn load(config: &Config, store: &impl TableStore) -> Result<Self, StoreError> {
        let records = store.load()?;
        Ok(Self::with_table(
            CharacterTable::new(records),
            config.extract.clone(),
            config.scan.clone(),
            TracingSink,
        ))
    }
}

impl<S: DiagnosticsSink> MissingCharacters<S> {
    pub fn with_table(
        table: CharacterTable,
        extract: ExtractConfig,
        scan: ScanConfig,
        sink: S,
    ) -> Self {
        let normalizer = NamespaceNormalizer::new(&extract.reserved_namespace);
        Self {
            table,
            extractor: CharacterExtractor::new(extract, sink),
            normalizer,
            scan,
        }
    }

    pub fn table(&self) -> &CharacterTable {
        &self.table
    }

    pub fn sink(&self) -> &S {
        self.extractor.sink()
    }

    /// Full record for a CBETA code
    pub fn lookup(&self, code: &str) -> Option<&CharacterRecord> {
        self.table.get(code)
    }

    /// Bopomofo readings for a CBETA code
    pub fn lookup_phonetic(&self, code: &str) -> Option<&[String]> {
        self.table.phonetic_notation(code)
    }

    /// CBETA code for a composition. Reflects the table as of the last
    /// index rebuild.
    pub fn code_for_composition(&self, zzs: &str) -> Option<&str> {
        self.table.code_for_composition(zzs)
    }

    pub fn rebuild_index(&mut self) {
        self.table.rebuild_index();
    }

    pub fn save(&self, store: &impl TableStore) -> Result<(), StoreError> {
        store.save(self.table.records())
    }

    /// Parse one P5 file and merge its declarations into the table
    pub fn scan_document(&mut self, path: &Path) -> Result<ScanSummary, ScanError> {
        tracing::info!("Read Cbeta P5 file {}", path.display());

        let mut document = Document::parse_file(path).map_err(|e| {
            let err = match e {
                ParseFileError::Io(source) => ScanError::Read {
                    path: path.to_path_buf(),
                    source,
                },
                ParseFileError::Xml(source) => ScanError::Parse {
                    path: path.to_path_buf(),
                    source,
                },
            };
            tracing::error!("open file error: {err}");
            err
        })?;

        Ok(self.apply_document(&mut document))
    }

    /// Same as [`Self::scan_document`] for an in-memory source. `label`
    /// stands in for the path in errors.
    pub fn scan_str(&mut self, source: &str, label: &str) -> Result<ScanSummary, ScanError> {
        let mut document = Document::parse_str(source).map_err(|source| {
            let err = ScanError::Parse {
                path: label.into(),
                source,
            };
            tracing::error!("parse error: {err}");
            err
        })?;

        Ok(self.apply_document(&mut document))
    }

    /// Normalize `document` with its own default namespace, then insert or
    /// overwrite one record per declaration.
    pub fn apply_document(&mut self, document: &mut Document) -> ScanSummary {
        let namespace = document.default_namespace.clone().unwrap_or_default();
        self.normalizer.normalize(document, &namespace);

        let document: &Document = document;
        let mut summary = ScanSummary::default();

        for node in self.extractor.declarations(document) {
            summary.declarations += 1;

            let id = match self.extractor.declaration_id(node) {
                Ok(id) => id,
                Err(e) => {
                    tracing::error!("skipping character declaration: {e}");
                    summary.missing_id += 1;
                    continue;
                }
            };

            let record = self.extractor.extract_record(id, node);
            if self.table.insert(id, record).is_some() {
                tracing::debug!(char_id = id, "overwrote existing record");
            }
            summary.extracted += 1;
        }

        summary
    }

    /// Scan every non-hidden file below `root`
    pub fn scan_tree(&mut self, root: &Path) -> Result<TreeSummary, ScanError> {
        let mut summary = TreeSummary::default();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.fail(ScanError::Walk(e), &mut summary)?;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let ext = entry.path().extension().and_then(|ext| ext.to_str());
            if !self.scan.accepts_extension(ext) {
                tracing::debug!(path = %entry.path().display(), "skipping by extension");
                continue;
            }

            match self.scan_document(entry.path()) {
                Ok(scanned) => summary.add(scanned),
                Err(e) => self.fail(e, &mut summary)?,
            }
        }

        tracing::info!(
            documents = summary.documents,
            extracted = summary.extracted,
            failures = summary.failures.len(),
            "finished scanning {}",
            root.display()
        );
        Ok(summary)
    }

    fn fail(&self, err: ScanError, summary: &mut TreeSummary) -> Result<(), ScanError> {
        if !self.scan.continue_on_error {
            return Err(err);
        }
        tracing::warn!("continuing after error: {err}");
        summary.failures.push(err);
        Ok(())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::diagnostics::CollectingSink;

    fn missing() -> MissingCharacters<CollectingSink> {
        MissingCharacters::with_table(
            CharacterTable::default(),
            ExtractConfig::default(),
            ScanConfig::default(),
            CollectingSink::new(),
        )
    }

    #[test]
    fn test_document_without_declarations_leaves_table_unchanged() {
        let mut missing = missing();
        missing
            .table
            .insert("CB1", CharacterRecord { normal: Some("a".into()), ..Default::default() });

        let summary = missing
            .scan_str(r#"<TEI xmlns="urn:tei"><text><p>nothing</p></text></TEI>"#, "empty.xml")
            .unwrap();

        assert_eq!(summary, ScanSummary::default());
        assert_eq!(missing.table().len(), 1);
        assert_eq!(missing.lookup("CB1").and_then(|r| r.normal.as_deref()), Some("a"));
    }

    #[test]
    fn test_missing_id_skips_only_that_declaration() {
        let source = r#"<TEI><charDecl>
            <char><charProp><localName>big5</localName><value>A</value></charProp></char>
            <char xml:id="CB2">
                <charProp><localName>big5</localName><value>B</value></charProp>
            </char>
        </charDecl></TEI>"#;

        let mut missing = missing();
        let summary = missing.scan_str(source, "doc.xml").unwrap();

        assert_eq!(
            summary,
            ScanSummary {
                declarations: 2,
                extracted: 1,
                missing_id: 1,
            }
        );
        assert_eq!(missing.lookup("CB2").and_then(|r| r.big5.as_deref()), Some("B"));
        assert_eq!(missing.table().len(), 1);
    }

    #[test]
    fn test_parse_error_is_returned() {
        let mut missing = missing();
        let err = missing.scan_str("<TEI><charDecl></TEI>", "bad.xml").unwrap_err();

        assert!(matches!(err, ScanError::Parse { .. }));
        assert_eq!(err.path(), Some(Path::new("bad.xml")));
    }

    #[test]
    fn test_lookup_absent() {
        let missing = missing();

        assert!(missing.lookup("nonexistent").is_none());
        assert!(missing.lookup_phonetic("nonexistent").is_none());
        assert!(missing.code_for_composition("[a/b]").is_none());
    }
}
