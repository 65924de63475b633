//! Rule fault types
//!
//! A fault is a defect in a rule's own logic, never a property of the data.
//! Data problems are reported as matches (or as no match).

/// A rule broke one of its own assumptions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleFault {
    #[error("rule read missing field '{field}' of source {raw:?}")]
    MissingField { field: &'static str, raw: String },

    #[error("rule invariant violated on source {raw:?}: {message}")]
    Invariant { message: String, raw: String },
}

impl RuleFault {
    /// Build an invariant fault for a source string
    pub fn invariant(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
            raw: raw.into(),
        }
    }
}
