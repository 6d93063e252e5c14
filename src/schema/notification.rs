use serde::{Deserialize, Serialize};

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Neutral, informational styling.
    Info,
    /// Error/warning styling for failed or blocked actions.
    Destructive,
}

impl Severity {
    /// Returns the tag string for this severity (e.g., "severity:info").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Info => "severity:info",
            Self::Destructive => "severity:destructive",
        }
    }
}

/// A toast-style payload handed to the presentation layer.
///
/// The core only constructs these; rendering (toast, banner, etc.) belongs
/// to the consuming UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}
