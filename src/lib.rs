//! Storycraft — text normalization and publish gating for story authoring.
//!
//! Cleans up free-form prose with a deterministic pipeline of ordered
//! rewrite rules (whitespace collapsing, contraction repair, sentence
//! capitalization, paragraph-boundary punctuation) and gates publish
//! attempts on content validity and authentication state. Rendering,
//! persistence, and identity are external collaborators reached through
//! trait seams.

pub mod core;
pub mod schema;

pub use crate::core::normalize::{normalize, RuleConfig, RuleSet};
pub use crate::core::publish::{
    ComingSoonPublisher, NotificationSink, Publisher, PublishGate, RequiredFields, Validator,
    VecSink,
};
pub use crate::schema::notification::{Notification, Severity};
