pub mod types;

pub use types::{CharacterRecord, MappingKind, RecordField};
