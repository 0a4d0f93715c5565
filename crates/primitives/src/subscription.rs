//! The [`Subscription`] type through which capabilities report ongoing chain activity.
use std::{
    pin::Pin,
    task::{Context, Poll},
};

use tokio::sync::mpsc;

/// A stream of updates pushed by a long-running capability operation.
///
/// It wraps an unbounded channel receiver and implements [`futures::Stream`]. The stream ends
/// once every producer handle has been dropped.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Creates a new subscription from an unbounded receiver.
    pub const fn from_receiver(receiver: mpsc::UnboundedReceiver<T>) -> Subscription<T> {
        Subscription { receiver }
    }

    /// Creates a subscription together with the sender that feeds it.
    pub fn channel() -> (mpsc::UnboundedSender<T>, Subscription<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Subscription::from_receiver(receiver))
    }

    /// Creates a subscription that yields the given items and then ends.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Subscription<T> {
        let (sender, subscription) = Subscription::channel();
        for item in items {
            // the receiver is alive until this function returns
            let _ = sender.send(item);
        }
        subscription
    }

    /// Returns the number of updates that have been pushed but not yet consumed.
    pub fn backlog(&self) -> usize {
        self.receiver.len()
    }

    /// Waits for the next update, returning `None` once the producer is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }
}

impl<T> futures::Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
