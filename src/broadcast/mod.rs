// Per-subscriber mailboxes and the broadcast hub

mod hub;
mod mailbox;

pub use hub::{BroadcastHub, SubscriberHandle};
pub use mailbox::{mailbox, Mailbox, MailboxSender};
