use crate::world::MutationEvent;
use anyhow::Result;
use std::sync::Mutex;

/// Callback invoked synchronously after every world mutation.
///
/// Implementations must not block and must not call back into the store;
/// notification runs inside the mutating call, which does not return until
/// every listener has completed. A returned error is logged by the store and
/// does not abort the mutation or prevent later listeners from running.
pub trait MutationListener: Send + Sync {
    fn on_mutation(&self, event: &MutationEvent) -> Result<()>;
}

/// Listener that records every event it receives. Used by tests in place of
/// the broadcast hub.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<MutationEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events received so far, in delivery order.
    pub fn events(&self) -> Vec<MutationEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl MutationListener for RecordingListener {
    fn on_mutation(&self, event: &MutationEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
