//! Display rows and sections produced for the settings screen.

use serde::Serialize;

/// What a row renders as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowKind {
    /// A boolean switch bound to a preference key
    Toggle {
        /// Preference key the switch edits
        key: String,
        /// Value at build time
        value: bool,
    },
    /// Informational text with no value
    Info,
}

/// A single display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Human-readable label
    pub description: String,
    /// Toggle or informational text
    #[serde(flatten)]
    pub kind: RowKind,
}

impl Row {
    /// Creates a toggle row.
    pub fn toggle(description: impl Into<String>, key: impl Into<String>, value: bool) -> Self {
        Self {
            description: description.into(),
            kind: RowKind::Toggle {
                key: key.into(),
                value,
            },
        }
    }

    /// Creates an informational row.
    pub fn info(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            kind: RowKind::Info,
        }
    }

    /// Preference key, for toggle rows.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            RowKind::Toggle { key, .. } => Some(key),
            RowKind::Info => None,
        }
    }

    /// Build-time value, for toggle rows.
    #[must_use]
    pub const fn value(&self) -> Option<bool> {
        match &self.kind {
            RowKind::Toggle { value, .. } => Some(*value),
            RowKind::Info => None,
        }
    }

    /// Returns true for toggle rows.
    #[must_use]
    pub const fn is_toggle(&self) -> bool {
        matches!(self.kind, RowKind::Toggle { .. })
    }
}

/// An ordered group of rows with optional header and footer text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Rows in display order
    pub rows: Vec<Row>,
    /// Title shown above the section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Explanatory text shown below the section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl Section {
    /// Creates a section without header or footer.
    #[must_use]
    pub const fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            header: None,
            footer: None,
        }
    }

    /// Creates a section with footer text.
    pub fn with_footer(rows: Vec<Row>, footer: impl Into<String>) -> Self {
        Self {
            rows,
            header: None,
            footer: Some(footer.into()),
        }
    }
}
