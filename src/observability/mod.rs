//! Observability subsystem
//!
//! Structured JSON-line logging of typed events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on record operations
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use concierge_data::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RecordCreated, &[("model", "Wishlist"), ("id", id)]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Severity a lifecycle event is logged at
pub fn event_severity(event: Event) -> Severity {
    if event.is_rejection() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_log_at_warn() {
        assert_eq!(event_severity(Event::AccessDenied), Severity::Warn);
        assert_eq!(event_severity(Event::ValidationRejected), Severity::Warn);
        assert_eq!(event_severity(Event::ConfigLoaded), Severity::Info);
        assert_eq!(event_severity(Event::RecordCreated), Severity::Info);
    }
}
