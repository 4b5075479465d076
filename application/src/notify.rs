//! Change notifier
//!
//! Fans out "the question set changed" events to any number of long-lived
//! subscribers without letting a slow consumer block the publisher.
//!
//! Built on [`tokio::sync::watch`], whose semantics are exactly the
//! delivery contract: publishing a newer stamp overwrites the pending
//! value (rapid replaces coalesce into one wake-up carrying the newest
//! stamp), `publish` never blocks or fails, and dropped listeners
//! release their slot automatically. Publishing is monotonic: a stale
//! stamp from a publisher that lost a race is dropped, so subscribers
//! only ever observe the version increasing — never how many
//! intermediate versions they missed, and never a step backwards.

use quizcast_domain::{ChangeEvent, VersionStamp};
use tokio::sync::watch;
use tracing::debug;

/// Broadcast point for question-set change events.
///
/// The store's owner publishes into this after every successful replace;
/// streaming handlers subscribe for the lifetime of their connection.
pub struct ChangeNotifier {
    tx: watch::Sender<VersionStamp>,
}

impl ChangeNotifier {
    /// Create a notifier whose subscribers start from `initial`.
    pub fn new(initial: VersionStamp) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Announce a new version. Non-blocking; succeeds with or without
    /// live subscribers. Stamps at or below the current one are dropped,
    /// so a delayed publish can never move subscribers backwards.
    pub fn publish(&self, version: VersionStamp) {
        debug!(version = %version, subscribers = self.tx.receiver_count(), "publishing change");
        self.tx.send_if_modified(|current| {
            if version > *current {
                *current = version;
                true
            } else {
                false
            }
        });
    }

    /// Open an independent subscription.
    pub fn subscribe(&self) -> ChangeListener {
        ChangeListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of currently live subscriptions.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(VersionStamp::ZERO)
    }
}

/// One subscriber's view of the change stream.
pub struct ChangeListener {
    rx: watch::Receiver<VersionStamp>,
}

impl ChangeListener {
    /// Wait for the next change and return the newest stamp.
    ///
    /// Intermediate stamps published while the caller was away are
    /// coalesced away. Returns `None` once the notifier is gone, which
    /// ends the subscription.
    pub async fn next_change(&mut self) -> Option<ChangeEvent> {
        self.rx.changed().await.ok()?;
        let version = *self.rx.borrow_and_update();
        Some(ChangeEvent { version })
    }

    /// The stamp current at the last observation (or subscription time).
    pub fn last_seen(&self) -> VersionStamp {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_sees_published_version() {
        let notifier = ChangeNotifier::new(VersionStamp::ZERO);
        let mut listener = notifier.subscribe();

        notifier.publish(VersionStamp::from_millis(10));

        let event = listener.next_change().await.unwrap();
        assert_eq!(event.version, VersionStamp::from_millis(10));
    }

    #[tokio::test]
    async fn test_rapid_publishes_coalesce_to_latest() {
        let notifier = ChangeNotifier::new(VersionStamp::ZERO);
        let mut listener = notifier.subscribe();

        // Subscriber is not polling while these land.
        for v in 1..=5 {
            notifier.publish(VersionStamp::from_millis(v));
        }

        let event = listener.next_change().await.unwrap();
        assert_eq!(event.version, VersionStamp::from_millis(5));

        // Nothing further pending: the intermediates were coalesced.
        assert!(!listener.rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_stale_publish_does_not_regress_version() {
        let notifier = ChangeNotifier::new(VersionStamp::ZERO);
        let mut listener = notifier.subscribe();

        notifier.publish(VersionStamp::from_millis(5));
        let event = listener.next_change().await.unwrap();
        assert_eq!(event.version, VersionStamp::from_millis(5));

        // A replace that lost the race publishes its older stamp late.
        notifier.publish(VersionStamp::from_millis(3));
        assert!(!listener.rx.has_changed().unwrap());
        assert_eq!(listener.last_seen(), VersionStamp::from_millis(5));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_succeeds() {
        let notifier = ChangeNotifier::new(VersionStamp::ZERO);
        notifier.publish(VersionStamp::from_millis(1));
        assert_eq!(notifier.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_listener_ends_when_notifier_dropped() {
        let notifier = ChangeNotifier::new(VersionStamp::ZERO);
        let mut listener = notifier.subscribe();
        drop(notifier);
        assert!(listener.next_change().await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_listener_releases_slot() {
        let notifier = ChangeNotifier::new(VersionStamp::ZERO);
        let listener = notifier.subscribe();
        assert_eq!(notifier.receiver_count(), 1);
        drop(listener);
        assert_eq!(notifier.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriptions_are_independent() {
        let notifier = ChangeNotifier::new(VersionStamp::ZERO);
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();

        notifier.publish(VersionStamp::from_millis(7));

        assert_eq!(
            a.next_change().await.unwrap().version,
            VersionStamp::from_millis(7)
        );
        assert_eq!(
            b.next_change().await.unwrap().version,
            VersionStamp::from_millis(7)
        );
    }
}
