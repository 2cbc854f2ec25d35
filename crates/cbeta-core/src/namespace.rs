use cbeta_config::XML_NAMESPACE;

use crate::xml::Document;

/// Strips the document's content namespace from tags and the reserved
/// namespace from attribute names, so that later lookups can use bare
/// names like `char` and `id`.
#[derive(Debug, Clone)]
pub struct NamespaceNormalizer {
    reserved_prefix: String,
}

impl Default for NamespaceNormalizer {
    fn default() -> Self {
        Self::new(XML_NAMESPACE)
    }
}

impl NamespaceNormalizer {
    pub fn new(reserved_namespace: &str) -> Self {
        Self {
            reserved_prefix: format!("{{{reserved_namespace}}}"),
        }
    }

    /// Rewrite `document` in place. An empty `namespace_uri` matches no tag,
    /// leaving only the attribute rename.
    pub fn normalize(&self, document: &mut Document, namespace_uri: &str) {
        let tag_prefix = format!("{{{namespace_uri}}}");
        let reserved_prefix = self.reserved_prefix.as_str();

        document.walk_mut(&mut |element| {
            if let Some(local) = element.tag.strip_prefix(tag_prefix.as_str()) {
                let local = local.to_string();
                element.tag = local;
            }

            let reserved: Vec<usize> = element
                .attributes
                .iter()
                .enumerate()
                .filter(|(_, (name, _))| name.starts_with(reserved_prefix))
                .map(|(i, _)| i)
                .collect();

            // Removal goes back to front so earlier indices stay valid
            let mut renamed = Vec::with_capacity(reserved.len());
            for i in reserved.into_iter().rev() {
                let (name, value) = element.attributes.remove(i);
                renamed.push((name[reserved_prefix.len()..].to_string(), value));
            }
            for (name, value) in renamed.into_iter().rev() {
                element.set_attribute(name, value);
            }
        });
    }
}

/// Normalize with the standard `xml` reserved namespace
pub fn normalize(document: &mut Document, namespace_uri: &str) {
    NamespaceNormalizer::default().normalize(document, namespace_uri);
}
