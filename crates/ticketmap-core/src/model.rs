use serde::{Deserialize, Serialize};

/// One row of a ticket hierarchy export.
///
/// Optional text fields are normalized once at construction: surrounding whitespace is
/// trimmed and an empty value is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub key: String,
    /// Distance from the root of the traversal that produced the export. Roots have depth 0.
    pub depth: u32,
    /// Key of the ticket that links to this one.
    #[serde(default)]
    pub from_key: Option<String>,
    /// Free-text relationship label, e.g. `is blocked by` or `child`.
    #[serde(default)]
    pub link_via: Option<String>,
    /// Human-readable title. May still carry a `(via ...)` annotation.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl TicketRecord {
    pub fn new(key: impl Into<String>, depth: u32) -> Self {
        Self {
            key: key.into(),
            depth,
            from_key: None,
            link_via: None,
            summary: String::new(),
            status: None,
        }
    }

    pub fn with_from_key(mut self, from_key: impl AsRef<str>) -> Self {
        self.from_key = non_empty(from_key.as_ref());
        self
    }

    pub fn with_link_via(mut self, link_via: impl AsRef<str>) -> Self {
        self.link_via = non_empty(link_via.as_ref());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_status(mut self, status: impl AsRef<str>) -> Self {
        self.status = non_empty(status.as_ref());
        self
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// The relationship label, or `""` when the row has none.
    pub fn link_label(&self) -> &str {
        self.link_via.as_deref().unwrap_or("")
    }

    pub fn status_text(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }
}

/// True when at least one record names its source ticket.
pub fn has_explicit_links(records: &[TicketRecord]) -> bool {
    records.iter().any(|r| r.from_key.is_some())
}

/// The first depth-0 record in input order.
pub fn first_root(records: &[TicketRecord]) -> Option<&TicketRecord> {
    records.iter().find(|r| r.is_root())
}

pub(crate) fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_normalizes_optional_fields() {
        let record = TicketRecord::new("STL-2", 1)
            .with_from_key("  STL-1 ")
            .with_link_via("   ")
            .with_status("In Progress");
        assert_eq!(record.from_key.as_deref(), Some("STL-1"));
        assert_eq!(record.link_via, None);
        assert_eq!(record.link_label(), "");
        assert_eq!(record.status_text(), "In Progress");
        assert!(!record.is_root());
    }

    #[test]
    fn explicit_links_require_a_non_empty_source() {
        let records = vec![
            TicketRecord::new("A", 0),
            TicketRecord::new("B", 1).with_from_key(""),
        ];
        assert!(!has_explicit_links(&records));

        let records = vec![
            TicketRecord::new("A", 0),
            TicketRecord::new("B", 1).with_from_key("A"),
        ];
        assert!(has_explicit_links(&records));
    }

    #[test]
    fn first_root_uses_input_order() {
        let records = vec![
            TicketRecord::new("B", 1),
            TicketRecord::new("R1", 0),
            TicketRecord::new("R2", 0),
        ];
        assert_eq!(first_root(&records).map(|r| r.key.as_str()), Some("R1"));
        assert!(first_root(&records[..1]).is_none());
    }
}
