//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Tooling
    /// Configuration loaded
    ConfigLoaded,
    /// Declaration registered
    SchemaLoaded,
    /// Declaration compiled into an artifact
    SchemaCompiled,
    /// Artifact files written to disk
    ArtifactWritten,

    // Record operations
    /// Record created
    RecordCreated,
    /// Record updated
    RecordUpdated,
    /// Record deleted
    RecordDeleted,

    // Rejections
    /// Authorization denied an operation
    AccessDenied,
    /// Record failed validation
    ValidationRejected,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaCompiled => "SCHEMA_COMPILED",
            Event::ArtifactWritten => "ARTIFACT_WRITTEN",
            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::AccessDenied => "ACCESS_DENIED",
            Event::ValidationRejected => "VALIDATION_REJECTED",
        }
    }

    /// Rejections are logged at WARN, everything else at INFO
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::AccessDenied | Event::ValidationRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::RecordCreated.as_str(), "RECORD_CREATED");
        assert_eq!(Event::AccessDenied.to_string(), "ACCESS_DENIED");
    }

    #[test]
    fn test_rejections() {
        assert!(Event::AccessDenied.is_rejection());
        assert!(Event::ValidationRejected.is_rejection());
        assert!(!Event::RecordDeleted.is_rejection());
    }
}
