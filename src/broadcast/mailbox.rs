use tokio::sync::mpsc;

/// Create a connected sender/mailbox pair for one subscriber.
pub fn mailbox() -> (MailboxSender, Mailbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MailboxSender { tx }, Mailbox { rx })
}

/// Producer half of a subscriber's mailbox. Held by the broadcast hub (and by
/// the session itself for the attach-time snapshot).
#[derive(Clone)]
pub struct MailboxSender {
    tx: mpsc::UnboundedSender<String>,
}

impl MailboxSender {
    /// Append a frame. Never blocks — the queue is unbounded, so a stalled
    /// consumer cannot back-pressure the writer. Returns false if the owning
    /// subscriber has already dropped its mailbox.
    pub fn push(&self, frame: String) -> bool {
        self.tx.send(frame).is_ok()
    }
}

/// Consumer half: the ordered queue of outbound frames owned by exactly one
/// subscriber session.
pub struct Mailbox {
    rx: mpsc::UnboundedReceiver<String>,
}

impl Mailbox {
    /// Wait for the next pending frame. Resolves the instant one is enqueued;
    /// returns None once every sender is gone.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Non-blocking pop, for tests and drain loops.
    pub fn try_recv(&mut self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}
