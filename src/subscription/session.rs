use crate::broadcast::{BroadcastHub, MailboxSender, SubscriberHandle};
use crate::subscription::protocol::EntityFrame;
use crate::world::WorldStore;
use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Coordinates one subscriber connection.
///
/// On attach the session registers with the hub and enqueues a full world
/// snapshot into its own mailbox, one frame per entity. It then multiplexes
/// two flows until either side fails: inbound text frames become wholesale
/// entity replacements in the store, and mailbox frames are written out to
/// the socket. Any exit path detaches the subscriber exactly once.
pub struct SubscriberSession {
    store: Arc<WorldStore>,
    hub: Arc<BroadcastHub>,
}

impl SubscriberSession {
    pub fn new(store: Arc<WorldStore>, hub: Arc<BroadcastHub>) -> Self {
        Self { store, hub }
    }

    /// Run the session to completion. Consumes the socket; returns once the
    /// subscriber is detached.
    pub async fn run(self, mut socket: WebSocket) {
        let SubscriberHandle {
            id,
            sender,
            mut mailbox,
        } = self.hub.attach();

        // Snapshot-on-attach. Registration happened first, so a mutation
        // racing with the snapshot may be delivered twice (stale snapshot
        // entry plus live frame) but is never lost.
        if let Err(e) = enqueue_snapshot(&sender, &self.store) {
            error!(subscriber_id = %id, error = %e, "Failed to enqueue world snapshot");
            self.hub.detach(&id);
            return;
        }

        loop {
            tokio::select! {
                // Inbound: client mutations
                inbound = socket.recv() => {
                    match inbound {
                        Some(Ok(Message::Text(text))) => {
                            apply_inbound(&self.store, &text);
                        }
                        Some(Ok(Message::Close(_))) => {
                            info!(subscriber_id = %id, "Subscriber closed stream");
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                warn!(subscriber_id = %id, error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Some(Ok(_)) => {
                            // Ignore binary, pong messages
                        }
                        Some(Err(e)) => {
                            warn!(subscriber_id = %id, error = %e, "WebSocket read failed");
                            break;
                        }
                        None => break,
                    }
                }

                // Outbound: relay mailbox frames to the transport
                outbound = mailbox.recv() => {
                    match outbound {
                        Some(frame) => {
                            if let Err(e) = socket.send(Message::Text(frame)).await {
                                warn!(subscriber_id = %id, error = %e, "WebSocket write failed");
                                break;
                            }
                        }
                        // All senders gone — cannot happen while the hub still
                        // holds ours, but terminal if it does.
                        None => break,
                    }
                }
            }
        }

        self.hub.detach(&id);
    }
}

/// Enqueue one frame per existing entity into a freshly attached subscriber's
/// mailbox.
pub fn enqueue_snapshot(sender: &MailboxSender, store: &WorldStore) -> Result<(), serde_json::Error> {
    for (entity_id, attributes) in store.snapshot() {
        let frame = EntityFrame::new(entity_id, attributes).encode()?;
        sender.push(frame);
    }
    Ok(())
}

/// Apply an inbound text frame: each entity key becomes a wholesale replace.
/// A frame that fails to decode is logged and discarded; the session carries
/// on.
pub fn apply_inbound(store: &WorldStore, text: &str) {
    match EntityFrame::decode_incoming(text) {
        Ok(frames) => {
            for frame in frames {
                store.replace(&frame.entity_id, frame.attributes);
            }
        }
        Err(e) => {
            warn!(error = %e, "Discarding malformed inbound frame");
        }
    }
}
