use std::fmt;
use std::sync::Weak;

/// Something a [`Subscription`] can detach itself from.
pub(crate) trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, slot: usize);
}

/// RAII guard for a store subscriber.
///
/// The subscriber receives values for as long as the guard lives. Dropping
/// it, or calling [`unsubscribe`](Self::unsubscribe), ends notifications for
/// this subscriber only; the store and its other subscribers are unaffected.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    slot: usize,
    source: Option<Weak<dyn Unsubscribe>>,
}

impl Subscription {
    pub(crate) fn new(slot: usize, source: Weak<dyn Unsubscribe>) -> Self {
        Self {
            slot,
            source: Some(source),
        }
    }

    /// Stop receiving values.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keep the subscriber registered for as long as the store lives.
    pub fn detach(mut self) {
        self.source = None;
    }

    fn release(&mut self) {
        if let Some(source) = self.source.take().and_then(|weak| weak.upgrade()) {
            source.unsubscribe(self.slot);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("slot", &self.slot)
            .field("attached", &self.source.is_some())
            .finish()
    }
}
