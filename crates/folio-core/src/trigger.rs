//! Single-slot mailbox for "ask the assistant this" requests coming from
//! outside the chat panel. Last write wins; nothing queues.
//!
//! The UI loop polls [`TriggerReceiver::take`] after every event it handles,
//! and only while no reply is streaming, so a trigger fired mid-reply waits
//! in the slot.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

#[derive(Clone)]
pub struct TriggerSender {
    slot: Arc<Mutex<Option<String>>>,
}

pub struct TriggerReceiver {
    slot: Arc<Mutex<Option<String>>>,
}

pub fn channel() -> (TriggerSender, TriggerReceiver) {
    let slot = Arc::new(Mutex::new(None));
    (
        TriggerSender { slot: Arc::clone(&slot) },
        TriggerReceiver { slot },
    )
}

impl TriggerSender {
    /// Queue `message`, replacing any trigger not yet consumed
    pub fn fire(&self, message: impl Into<String>) {
        let replaced = self.slot.lock().replace(message.into());
        if replaced.is_some() {
            debug!("unconsumed trigger overwritten");
        }
    }
}

impl TriggerReceiver {
    /// Take the pending trigger, leaving the slot empty
    pub fn take(&self) -> Option<String> {
        self.slot.lock().take()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let (tx, rx) = channel();
        tx.fire("first");
        tx.fire("second");
        assert_eq!(rx.take().as_deref(), Some("second"));
        assert_eq!(rx.take(), None);
    }

    #[test]
    fn test_sender_clones_share_slot() {
        let (tx, rx) = channel();
        let other = tx.clone();
        tx.fire("from hero");
        other.fire("from suggestion");
        assert!(rx.is_pending());
        assert_eq!(rx.take().as_deref(), Some("from suggestion"));
        assert!(!rx.is_pending());
    }

    #[test]
    fn test_take_empties_slot_for_next_fire() {
        let (tx, rx) = channel();
        assert_eq!(rx.take(), None);
        tx.fire("one");
        assert_eq!(rx.take().as_deref(), Some("one"));
        tx.fire("two");
        assert_eq!(rx.take().as_deref(), Some("two"));
    }
}
