//! Citation records collected while rendering.

use indexmap::IndexMap;

/// Whether a cited document is required reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CitationKind {
    Normative,
    Informative,
}

impl CitationKind {
    /// Title of the generated `<references>` group.
    #[must_use]
    pub fn group_title(self) -> &'static str {
        match self {
            Self::Normative => "Normative References",
            Self::Informative => "Informative References",
        }
    }
}

/// A single citation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CitationRecord {
    /// Cited identifier, e.g. `RFC2119`. Used as the `xref` target.
    pub target: String,
    pub kind: CitationKind,
    /// File to include instead of the one derived from the identifier.
    pub filename: Option<String>,
}

impl CitationRecord {
    /// Informative citation without an explicit filename.
    #[must_use]
    pub fn informative(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: CitationKind::Informative,
            filename: None,
        }
    }

    /// Normative citation without an explicit filename.
    #[must_use]
    pub fn normative(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: CitationKind::Normative,
            filename: None,
        }
    }

    /// Set an explicit filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Citations keyed by target, in first-seen order.
///
/// Citing a target again replaces its record but keeps its position, so the
/// generated references section is stable across runs.
#[derive(Clone, Debug, Default)]
pub struct Citations {
    records: IndexMap<String, CitationRecord>,
}

impl Citations {
    /// Insert or replace the record for `record.target`.
    pub fn insert(&mut self, record: CitationRecord) {
        self.records.insert(record.target.clone(), record);
    }

    #[must_use]
    pub fn get(&self, target: &str) -> Option<&CitationRecord> {
        self.records.get(target)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one kind, in first-seen order.
    pub fn of_kind(&self, kind: CitationKind) -> impl Iterator<Item = &CitationRecord> {
        self.records.values().filter(move |c| c.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut citations = Citations::default();
        citations.insert(CitationRecord::normative("RFC2119"));
        assert_eq!(citations.len(), 1);
        assert_eq!(
            citations.get("RFC2119").map(|c| c.kind),
            Some(CitationKind::Normative)
        );
    }

    #[test]
    fn test_last_write_wins_keeps_position() {
        let mut citations = Citations::default();
        citations.insert(CitationRecord::informative("A"));
        citations.insert(CitationRecord::informative("B"));
        citations.insert(CitationRecord::normative("A").with_filename("a.xml"));

        assert_eq!(citations.len(), 2);
        let a = citations.get("A").unwrap();
        assert_eq!(a.kind, CitationKind::Normative);
        assert_eq!(a.filename.as_deref(), Some("a.xml"));

        let informative: Vec<_> = citations
            .of_kind(CitationKind::Informative)
            .map(|c| c.target.as_str())
            .collect();
        assert_eq!(informative, vec!["B"]);
    }

    #[test]
    fn test_of_kind_preserves_order() {
        let mut citations = Citations::default();
        citations.insert(CitationRecord::normative("C"));
        citations.insert(CitationRecord::informative("B"));
        citations.insert(CitationRecord::normative("A"));

        let normative: Vec<_> = citations
            .of_kind(CitationKind::Normative)
            .map(|c| c.target.as_str())
            .collect();
        assert_eq!(normative, vec!["C", "A"]);
    }

    #[test]
    fn test_group_titles() {
        assert_eq!(
            CitationKind::Informative.group_title(),
            "Informative References"
        );
        assert_eq!(CitationKind::Normative.group_title(), "Normative References");
    }
}
