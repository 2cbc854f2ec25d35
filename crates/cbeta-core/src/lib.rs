pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod missing;
pub mod namespace;
pub mod table;
pub mod xml;

pub use diagnostics::{CollectingSink, DiagnosticsSink, TracingSink, UnmappedProperty};
pub use error::{ExtractError, ScanError, StoreError, XmlError};
pub use extract::CharacterExtractor;
pub use missing::{MissingCharacters, ScanSummary, TreeSummary};
pub use namespace::{NamespaceNormalizer, normalize};
pub use table::{CharacterTable, JsonFileStore, Records, TableStore};
pub use xml::{Document, Element};
