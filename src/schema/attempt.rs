use serde::{Deserialize, Serialize};

/// One publish attempt as seen by the gate.
///
/// Created fresh per call and discarded when the call returns; nothing here
/// is persisted or shared across attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishAttempt {
    pub title: String,
    pub content: String,
    pub is_signed_in: bool,
    /// Whether the attempt has entered its in-progress phase.
    pub in_progress: bool,
}

impl PublishAttempt {
    pub fn new(title: impl Into<String>, content: impl Into<String>, is_signed_in: bool) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            is_signed_in,
            in_progress: false,
        }
    }
}
