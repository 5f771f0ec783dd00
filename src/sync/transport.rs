//! Outbound message delivery.
//!
//! The core never blocks on the network. Resolution queues messages in an
//! `Outbox`; the session flushes the outbox into the real transport once
//! an action has fully resolved.

use serde::{Deserialize, Serialize};

use super::message::PeerMessage;
use crate::core::PlayerId;

/// Where a message goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipient {
    Peer(PlayerId),
    Broadcast,
}

/// Fire-and-forget message sink provided by the networking layer.
pub trait PeerTransport {
    fn send(&mut self, to: Recipient, message: PeerMessage);
}

/// Messages queued during one action, in send order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outbox {
    queued: Vec<(Recipient, PeerMessage)>,
}

impl Outbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queued.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Recipient, PeerMessage)> {
        self.queued.iter()
    }

    /// Remove and return everything queued so far.
    pub fn drain(&mut self) -> Vec<(Recipient, PeerMessage)> {
        std::mem::take(&mut self.queued)
    }

    /// Hand every queued message to `transport`, oldest first.
    pub fn flush_into<T: PeerTransport + ?Sized>(&mut self, transport: &mut T) {
        for (to, message) in self.queued.drain(..) {
            transport.send(to, message);
        }
    }
}

impl PeerTransport for Outbox {
    fn send(&mut self, to: Recipient, message: PeerMessage) {
        self.queued.push((to, message));
    }
}
