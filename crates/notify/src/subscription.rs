//! Channel-backed subscription (mechanics only).

use std::sync::mpsc::{Receiver, TryRecvError};

/// A queue of messages addressed to one subscriber.
///
/// Publishers never block on a subscription: sends go into an unbounded
/// channel and the subscriber drains it on its own schedule. Dropping the
/// subscription detaches it; publishers prune it on their next send.
///
/// ## Usage Pattern
///
/// ```ignore
/// let (_ctx, subscription) = origin.attach();
///
/// for signal in subscription.drain() {
///     handle(signal);
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain everything currently queued.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}
