//! WASM bindings for storycraft — powers the browser story studio.

use wasm_bindgen::prelude::*;

use storycraft::core::normalize::RuleSet;
use storycraft::core::publish::{ComingSoonPublisher, PublishGate, RequiredFields, VecSink};

/// Normalize a draft with the standard rule pipeline.
#[wasm_bindgen]
pub fn normalize(text: &str) -> String {
    storycraft::normalize(text)
}

/// Normalize a draft with a custom RON rule pipeline.
#[wasm_bindgen]
pub fn normalize_with_rules(text: &str, rules_ron: &str) -> Result<String, JsError> {
    let rules = RuleSet::parse_ron(rules_ron)
        .map_err(|e| JsError::new(&format!("Rule set parse error: {e}")))?;
    Ok(rules.normalize(text))
}

/// StoryStudio — the main exported struct.
///
/// Wraps the publish gate with the shipped collaborators and hands
/// notifications to JS as JSON, e.g.:
/// ```json
/// [{"title":"Coming soon!","description":"...","severity":"Info"}]
/// ```
#[wasm_bindgen]
pub struct StoryStudio {
    gate: PublishGate<RequiredFields, VecSink, ComingSoonPublisher>,
    in_progress: bool,
}

#[wasm_bindgen]
impl StoryStudio {
    #[wasm_bindgen(constructor)]
    pub fn new() -> StoryStudio {
        StoryStudio {
            gate: PublishGate::with_defaults(),
            in_progress: false,
        }
    }

    /// Run one publish attempt. Notifications accumulate until drained
    /// with `take_notifications`.
    pub fn attempt_publish(&mut self, title: &str, content: &str, is_signed_in: bool) {
        let mut in_progress = self.in_progress;
        self.gate
            .attempt_publish(title, content, is_signed_in, |v| in_progress = v);
        self.in_progress = in_progress;
    }

    /// Whether a publish attempt is currently in its in-progress phase.
    /// The UI should disable the submit action while this is true.
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Drain accumulated notifications as a JSON array, oldest first.
    pub fn take_notifications(&mut self) -> Result<String, JsError> {
        let notifications = self.gate.sink_mut().take();
        serde_json::to_string(&notifications)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }
}

impl Default for StoryStudio {
    fn default() -> Self {
        Self::new()
    }
}
