/// Receives `charProp` entries that the field table does not cover.
/// Purely observational; nothing here can fail an extraction.
pub trait DiagnosticsSink {
    fn unmapped_property(&mut self, id: &str, local_name: &str, value: &str);
}

/// Reports unmapped properties through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn unmapped_property(&mut self, id: &str, local_name: &str, value: &str) {
        tracing::info!(
            char_id = id,
            key = local_name,
            value = value,
            "Not handling charProp"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedProperty {
    pub id: String,
    pub local_name: String,
    pub value: String,
}

/// Keeps every report for later inspection
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    entries: Vec<UnmappedProperty>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[UnmappedProperty] {
        &self.entries
    }
}

impl DiagnosticsSink for CollectingSink {
    fn unmapped_property(&mut self, id: &str, local_name: &str, value: &str) {
        self.entries.push(UnmappedProperty {
            id: id.to_string(),
            local_name: local_name.to_string(),
            value: value.to_string(),
        });
    }
}
