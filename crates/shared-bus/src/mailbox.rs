//! # Mailbox Router
//!
//! Point-to-point delivery to registered handlers over bounded
//! `tokio::sync::mpsc` channels. The sender never shares state with the
//! handler: it hands off an owned value and returns.

use parking_lot::RwLock;
use shared_types::Address;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Reasons a hand-off can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailboxError {
    /// No handler registered at this address.
    #[error("no mailbox registered for {0}")]
    NotRegistered(Address),

    /// The handler's queue is full.
    #[error("mailbox for {0} is full")]
    Full(Address),

    /// The handler dropped its receiver.
    #[error("mailbox for {0} is closed")]
    Closed(Address),
}

/// Address-keyed set of bounded mailboxes.
pub struct MailboxRouter<T> {
    mailboxes: RwLock<HashMap<Address, mpsc::Sender<T>>>,
    capacity: usize,
}

impl<T: Send + 'static> MailboxRouter<T> {
    /// Router whose mailboxes buffer up to `capacity` items each.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            mailboxes: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Open (or replace) the mailbox for `address`.
    pub fn register(&self, address: Address) -> mpsc::Receiver<T> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.mailboxes.write().insert(address, tx);
        debug!(%address, "Mailbox registered");
        rx
    }

    /// Close the mailbox for `address`. Returns false if none existed.
    pub fn unregister(&self, address: &Address) -> bool {
        self.mailboxes.write().remove(address).is_some()
    }

    /// True if a handler is registered at `address`.
    #[must_use]
    pub fn is_registered(&self, address: &Address) -> bool {
        self.mailboxes.read().contains_key(address)
    }

    /// Hand `item` to the handler at `address` without waiting.
    pub fn deliver(&self, address: &Address, item: T) -> Result<(), MailboxError> {
        let sender = self
            .mailboxes
            .read()
            .get(address)
            .cloned()
            .ok_or(MailboxError::NotRegistered(*address))?;

        sender.try_send(item).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => MailboxError::Full(*address),
            mpsc::error::TrySendError::Closed(_) => MailboxError::Closed(*address),
        })
    }
}

impl<T: Send + 'static> Default for MailboxRouter<T> {
    fn default() -> Self {
        Self::new(crate::DEFAULT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deliver_to_registered() {
        let router = MailboxRouter::new(4);
        let addr = Address::new([1; 20]);
        let mut rx = router.register(addr);

        router.deliver(&addr, 42u32).unwrap();
        assert_eq!(rx.recv().await, Some(42));
    }

    #[test]
    fn test_unknown_address() {
        let router: MailboxRouter<u32> = MailboxRouter::new(4);
        let addr = Address::new([9; 20]);
        assert_eq!(router.deliver(&addr, 1), Err(MailboxError::NotRegistered(addr)));
    }

    #[test]
    fn test_full_mailbox() {
        let router = MailboxRouter::new(1);
        let addr = Address::new([1; 20]);
        let _rx = router.register(addr);

        router.deliver(&addr, 1u8).unwrap();
        assert_eq!(router.deliver(&addr, 2u8), Err(MailboxError::Full(addr)));
    }

    #[test]
    fn test_closed_mailbox() {
        let router = MailboxRouter::new(1);
        let addr = Address::new([1; 20]);
        drop(router.register(addr));

        assert_eq!(router.deliver(&addr, 1u8), Err(MailboxError::Closed(addr)));
    }

    #[test]
    fn test_unregister() {
        let router: MailboxRouter<u8> = MailboxRouter::new(1);
        let addr = Address::new([1; 20]);
        let _rx = router.register(addr);
        assert!(router.is_registered(&addr));
        assert!(router.unregister(&addr));
        assert!(!router.is_registered(&addr));
    }
}
