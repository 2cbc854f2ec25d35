use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("Malformed markup: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid UTF-8 in name: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Unbound namespace prefix: {0}")]
    UnboundPrefix(String),

    #[error("Document has no root element")]
    NoRoot,

    #[error("Content after the root element: <{0}>")]
    MultipleRoots(String),

    #[error("Unexpected end of document inside <{0}>")]
    UnexpectedEof(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Character declaration has no `{attribute}` attribute")]
    MissingIdentifier { attribute: String },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid table JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: XmlError,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ScanError {
    /// Path of the document that failed, when known
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ScanError::Read { path, .. } | ScanError::Parse { path, .. } => Some(path),
            ScanError::Walk(e) => e.path(),
        }
    }
}
