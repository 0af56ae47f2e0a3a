//! Device location seam.
//!
//! # Responsibility
//! - Carry the platform's position fixes into core as a tri-state status.
//! - Hand out scoped subscriptions so the embedding layer knows when the
//!   hardware watch can be stopped.
//!
//! # Invariants
//! - Status is never a hard error: a denied permission or sensor failure
//!   becomes `Unavailable`, not a panic.
//! - Dropping a subscription releases it unconditionally; no explicit
//!   unsubscribe call exists.

use crate::model::place::Coordinates;
use tokio::sync::watch;

/// Current device position as seen by presentation code.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LocationStatus {
    /// Watch started, no fix yet.
    #[default]
    Acquiring,
    /// Last known fix.
    Available(Coordinates),
    /// The platform cannot deliver fixes right now.
    Unavailable { reason: String },
}

impl LocationStatus {
    /// Coordinates of the fix, when one is available.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Available(coordinates) => Some(*coordinates),
            Self::Acquiring | Self::Unavailable { .. } => None,
        }
    }
}

/// Publisher side of the location seam, owned by the embedding layer.
///
/// Every publish counts as a change, repeated identical fixes included;
/// subscribers wake once per published sample.
pub struct LocationFeed {
    tx: watch::Sender<LocationStatus>,
}

impl LocationFeed {
    /// Creates a feed in the `Acquiring` state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LocationStatus::Acquiring);
        Self { tx }
    }

    /// Publishes a position fix.
    pub fn publish_fix(&self, coordinates: Coordinates) {
        self.tx.send_replace(LocationStatus::Available(coordinates));
    }

    /// Publishes that fixes are unavailable, with a human-readable reason.
    pub fn publish_unavailable(&self, reason: impl Into<String>) {
        self.tx.send_replace(LocationStatus::Unavailable {
            reason: reason.into(),
        });
    }

    /// Latest published status.
    pub fn current(&self) -> LocationStatus {
        self.tx.borrow().clone()
    }

    /// Opens a scoped subscription starting at the current status.
    pub fn subscribe(&self) -> LocationSubscription {
        LocationSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions; zero means the platform watch can be
    /// stopped.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LocationFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader side of the location seam; dropping it releases the
/// subscription.
pub struct LocationSubscription {
    rx: watch::Receiver<LocationStatus>,
}

impl LocationSubscription {
    /// Latest published status without waiting.
    pub fn current(&self) -> LocationStatus {
        self.rx.borrow().clone()
    }

    /// Waits for the next published status.
    ///
    /// Returns `None` once the feed has been dropped and no further
    /// samples can arrive.
    pub async fn next_change(&mut self) -> Option<LocationStatus> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Coordinates, LocationFeed, LocationStatus};

    const FIX: Coordinates = Coordinates {
        lat: 48.8566,
        lng: 2.3522,
    };

    #[test]
    fn feed_starts_acquiring() {
        let feed = LocationFeed::new();
        assert_eq!(feed.current(), LocationStatus::Acquiring);
        assert_eq!(feed.current().coordinates(), None);
    }

    #[test]
    fn publish_fix_replaces_status_without_subscribers() {
        let feed = LocationFeed::new();
        feed.publish_fix(FIX);
        assert_eq!(feed.current().coordinates(), Some(FIX));

        feed.publish_unavailable("permission denied");
        assert_eq!(
            feed.current(),
            LocationStatus::Unavailable {
                reason: "permission denied".to_string()
            }
        );
    }

    #[test]
    fn subscription_starts_at_current_status() {
        let feed = LocationFeed::new();
        feed.publish_fix(FIX);

        let subscription = feed.subscribe();
        assert_eq!(subscription.current().coordinates(), Some(FIX));
    }

    #[test]
    fn subscriber_count_tracks_drops() {
        let feed = LocationFeed::new();
        assert_eq!(feed.subscriber_count(), 0);

        let first = feed.subscribe();
        let second = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 2);

        drop(first);
        assert_eq!(feed.subscriber_count(), 1);
        drop(second);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn next_change_delivers_published_samples() {
        let feed = LocationFeed::new();
        let mut subscription = feed.subscribe();

        feed.publish_fix(FIX);
        assert_eq!(
            subscription.next_change().await,
            Some(LocationStatus::Available(FIX))
        );

        feed.publish_unavailable("gps off");
        assert_eq!(
            subscription.next_change().await,
            Some(LocationStatus::Unavailable {
                reason: "gps off".to_string()
            })
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn next_change_ends_when_feed_drops() {
        let feed = LocationFeed::new();
        let mut subscription = feed.subscribe();

        drop(feed);
        assert_eq!(subscription.next_change().await, None);
    }
}
