use tracing::warn;

/// Destination for named build properties.
///
/// Implemented by the host build integration; [`PropertyMap`] is the
/// in-memory implementation used by the CLI and by tests.
pub trait PropertySink {
    /// Register a property. Setting a name that already exists is allowed:
    /// the new value wins, and implementations should warn rather than fail.
    fn set_property(&mut self, name: &str, value: String);
}

/// An insertion-ordered property collection.
///
/// Order is preserved so the per-entry property block always reads the same
/// way: `repository`, `path`, `revision`, `mixedRevisions`,
/// `committedRevision`, `committedDate`, `status`, `specialStatus`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: Vec<(String, String)>,
}

impl PropertyMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PropertySink for PropertyMap {
    fn set_property(&mut self, name: &str, value: String) {
        if let Some(existing) = self.entries.iter_mut().find(|(key, _)| key == name) {
            warn!(
                "the \"{name}\" property is already defined and will be overwritten. \
                 The possible causes for this are: \
                 the configuration contains two or more entries with the same prefix, \
                 the tool runs multiple times with the same configuration, \
                 or the property is already defined by the host build."
            );
            existing.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }
}
