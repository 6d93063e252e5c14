//! Publish gate — validation, auth gating, and the publish side effect.
//!
//! Orchestrates one publish attempt at a time over three collaborator seams:
//! a validator, a notification sink, and the publisher performing the actual
//! network call. All failures resolve to a notification; nothing escapes
//! `attempt_publish` as an error or panic of its own.

use thiserror::Error;

use crate::schema::attempt::PublishAttempt;
use crate::schema::notification::Notification;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish backend error: {0}")]
    Backend(String),
}

/// Decides whether a (title, content) pair is publishable.
///
/// A validator owns its own failure signaling (e.g. inline form errors); the
/// gate stays silent on validation failure.
pub trait Validator {
    fn validate(&mut self, title: &str, content: &str) -> bool;
}

/// Receives notification payloads for rendering. The gate only constructs
/// payloads; presentation belongs to the implementor.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Performs the publish side effect and reports the outcome notification.
/// This is the seam where a real network call will eventually live.
pub trait Publisher {
    fn publish(&mut self, attempt: &PublishAttempt) -> Result<Notification, PublishError>;
}

/// Requires a non-blank title and content. The default validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFields;

impl Validator for RequiredFields {
    fn validate(&mut self, title: &str, content: &str) -> bool {
        !title.trim().is_empty() && !content.trim().is_empty()
    }
}

/// Collects notifications in order. Used by tests and the wasm bindings.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    notifications: Vec<Notification>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Drain collected notifications, oldest first.
    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl NotificationSink for VecSink {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

/// Placeholder publisher: real publishing is not built yet, so a successful
/// attempt produces an informational announcement instead of a network call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComingSoonPublisher;

impl Publisher for ComingSoonPublisher {
    fn publish(&mut self, _attempt: &PublishAttempt) -> Result<Notification, PublishError> {
        Ok(Notification::info(
            "Coming soon!",
            "Publishing stories will be available in a future update.",
        ))
    }
}

/// Sets the caller's in-progress flag on creation and clears it on drop,
/// covering every exit path out of the in-progress phase, unwinding
/// included.
struct ProgressGuard<'a, F: FnMut(bool)> {
    set: &'a mut F,
}

impl<'a, F: FnMut(bool)> ProgressGuard<'a, F> {
    fn new(set: &'a mut F) -> Self {
        (set)(true);
        ProgressGuard { set }
    }
}

impl<F: FnMut(bool)> Drop for ProgressGuard<'_, F> {
    fn drop(&mut self) {
        (self.set)(false);
    }
}

/// The publish gate. Stateless across calls; each attempt owns its own
/// `PublishAttempt` and only touches the caller-supplied progress flag.
pub struct PublishGate<V, S, P> {
    validator: V,
    sink: S,
    publisher: P,
}

impl PublishGate<RequiredFields, VecSink, ComingSoonPublisher> {
    /// A gate wired with the shipped collaborators.
    pub fn with_defaults() -> Self {
        PublishGate::new(RequiredFields, VecSink::new(), ComingSoonPublisher)
    }
}

impl<V, S, P> PublishGate<V, S, P>
where
    V: Validator,
    S: NotificationSink,
    P: Publisher,
{
    pub fn new(validator: V, sink: S, publisher: P) -> Self {
        Self {
            validator,
            sink,
            publisher,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Run one publish attempt.
    ///
    /// Outcomes:
    /// - validation fails → return with no gate notification and no flag
    ///   change (the validator signals on its own);
    /// - signed out → destructive "Login required" notification, flag never
    ///   set;
    /// - signed in and valid → flag set true, publisher invoked, its outcome
    ///   notification emitted (a publisher error becomes a destructive
    ///   "Publishing failed" notification), flag cleared on exit.
    ///
    /// No retries and no cancellation; serializing overlapping attempts is
    /// the caller's responsibility.
    pub fn attempt_publish(
        &mut self,
        title: &str,
        content: &str,
        is_signed_in: bool,
        mut set_in_progress: impl FnMut(bool),
    ) {
        if !self.validator.validate(title, content) {
            return;
        }

        if !is_signed_in {
            self.sink.notify(Notification::destructive(
                "Login required",
                "You need to sign in before you can publish a story.",
            ));
            return;
        }

        let mut attempt = PublishAttempt::new(title, content, is_signed_in);
        let _guard = ProgressGuard::new(&mut set_in_progress);
        attempt.in_progress = true;

        match self.publisher.publish(&attempt) {
            Ok(notification) => self.sink.notify(notification),
            Err(err) => {
                log::warn!("publish attempt {:?} failed: {}", attempt.title, err);
                self.sink.notify(Notification::destructive(
                    "Publishing failed",
                    "Something went wrong while publishing your story. Please try again.",
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::notification::Severity;

    struct FailingPublisher;

    impl Publisher for FailingPublisher {
        fn publish(&mut self, _attempt: &PublishAttempt) -> Result<Notification, PublishError> {
            Err(PublishError::Backend("connection refused".to_string()))
        }
    }

    struct RejectEverything;

    impl Validator for RejectEverything {
        fn validate(&mut self, _title: &str, _content: &str) -> bool {
            false
        }
    }

    #[test]
    fn signed_out_attempt_is_rejected_without_flag_change() {
        let mut gate = PublishGate::with_defaults();
        let mut flag_history = Vec::new();

        gate.attempt_publish("Title", "Content", false, |v| flag_history.push(v));

        assert!(flag_history.is_empty(), "flag must never be touched");
        let notifications = gate.sink().notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Login required");
        assert_eq!(notifications[0].severity, Severity::Destructive);
    }

    #[test]
    fn valid_signed_in_attempt_toggles_flag_and_announces() {
        let mut gate = PublishGate::with_defaults();
        let mut flag_history = Vec::new();

        gate.attempt_publish("Title", "Content", true, |v| flag_history.push(v));

        assert_eq!(flag_history, vec![true, false]);
        let notifications = gate.sink().notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Coming soon!");
        assert_eq!(notifications[0].severity, Severity::Info);
    }

    #[test]
    fn invalid_content_is_silent() {
        let mut gate = PublishGate::with_defaults();
        let mut flag_history = Vec::new();

        gate.attempt_publish("", "Content", true, |v| flag_history.push(v));

        assert!(flag_history.is_empty());
        assert!(gate.sink().notifications().is_empty());
    }

    #[test]
    fn blank_title_counts_as_missing() {
        let mut gate = PublishGate::with_defaults();
        gate.attempt_publish("   ", "Content", true, |_| {});
        assert!(gate.sink().notifications().is_empty());
    }

    #[test]
    fn publisher_failure_becomes_notification_and_flag_still_clears() {
        let mut gate = PublishGate::new(RequiredFields, VecSink::new(), FailingPublisher);
        let mut flag_history = Vec::new();

        gate.attempt_publish("Title", "Content", true, |v| flag_history.push(v));

        assert_eq!(flag_history, vec![true, false]);
        let notifications = gate.sink().notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Publishing failed");
        assert_eq!(notifications[0].severity, Severity::Destructive);
    }

    #[test]
    fn custom_validator_gates_before_auth_check() {
        let mut gate = PublishGate::new(RejectEverything, VecSink::new(), ComingSoonPublisher);
        let mut flag_history = Vec::new();

        // Signed out, but validation fails first: not even "Login required".
        gate.attempt_publish("Title", "Content", false, |v| flag_history.push(v));

        assert!(flag_history.is_empty());
        assert!(gate.sink().notifications().is_empty());
    }

    #[test]
    fn attempts_are_independent() {
        let mut gate = PublishGate::with_defaults();
        gate.attempt_publish("A", "First", true, |_| {});
        gate.attempt_publish("B", "Second", true, |_| {});
        assert_eq!(gate.sink().notifications().len(), 2);
    }

    #[test]
    fn take_drains_the_sink() {
        let mut gate = PublishGate::with_defaults();
        gate.attempt_publish("Title", "Content", true, |_| {});
        let drained = gate.sink_mut().take();
        assert_eq!(drained.len(), 1);
        assert!(gate.sink().notifications().is_empty());
    }
}
