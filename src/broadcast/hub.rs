use crate::broadcast::mailbox::{mailbox, Mailbox, MailboxSender};
use crate::subscription::protocol::EntityFrame;
use crate::world::{MutationEvent, MutationListener};
use anyhow::{Context, Result};
use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Everything a session needs for one attached subscriber: its registry id,
/// the mailbox it drains, and a sender for enqueueing the attach snapshot.
pub struct SubscriberHandle {
    pub id: Uuid,
    pub sender: MailboxSender,
    pub mailbox: Mailbox,
}

/// Fans every mutation event out to all attached subscribers.
///
/// Registered with the world store as a mutation listener. Each event is
/// serialized once and pushed into every active mailbox; pushes never block,
/// so one slow subscriber cannot delay the writer or its peers.
pub struct BroadcastHub {
    /// Active subscriber set. Sessions insert on attach and remove on detach;
    /// fan-out iterates concurrently with both.
    subscribers: DashMap<Uuid, MailboxSender>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    /// Register a new subscriber and hand back its mailbox.
    pub fn attach(&self) -> SubscriberHandle {
        let (sender, mailbox) = mailbox();
        let id = Uuid::new_v4();
        self.subscribers.insert(id, sender.clone());

        info!(subscriber_id = %id, subscribers = self.subscriber_count(), "Subscriber attached");

        SubscriberHandle {
            id,
            sender,
            mailbox,
        }
    }

    /// Remove a subscriber from the active set. Safe to call for an id that
    /// was already removed.
    pub fn detach(&self, id: &Uuid) {
        if self.subscribers.remove(id).is_some() {
            info!(subscriber_id = %id, subscribers = self.subscriber_count(), "Subscriber detached");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Push a serialized frame into every active mailbox.
    fn fan_out(&self, frame: &str) {
        for entry in self.subscribers.iter() {
            // A failed push means the subscriber dropped its mailbox while
            // detaching; its session removes the registry entry itself.
            if !entry.value().push(frame.to_string()) {
                debug!(subscriber_id = %entry.key(), "Skipped push to detaching subscriber");
            }
        }
    }
}

impl MutationListener for BroadcastHub {
    fn on_mutation(&self, event: &MutationEvent) -> Result<()> {
        let frame = EntityFrame::from(event)
            .encode()
            .context("Failed to serialize mutation event")?;
        self.fan_out(&frame);
        Ok(())
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}
