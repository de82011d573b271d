//! User-facing notification model.
//!
//! Every degraded-but-recovered path (fallback data, failed lookups, undo
//! boundaries) and every record mutation surfaces exactly one transient
//! [`Notification`].

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Severity of a notification, in increasing order of urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A single transient message for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub timestamp: Timestamp,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_severity() {
        assert_eq!(Notification::info("a").severity, Severity::Info);
        assert_eq!(Notification::success("a").severity, Severity::Success);
        assert_eq!(Notification::warning("a").severity, Severity::Warning);
        assert_eq!(Notification::error("a").severity, Severity::Error);
    }

    #[test]
    fn severity_serialises_lowercase() {
        let json = serde_json::to_value(Notification::warning("offline")).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["message"], "offline");
        assert_eq!(Severity::Error.as_str(), "error");
    }
}
