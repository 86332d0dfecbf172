//! Cooperative per-frame callback scheduling.
//!
//! The host calls [`FrameLoop::take_due`] once per rendered frame. A
//! request fires at most once; the playback sync re-requests itself each
//! time it runs. Every request gets a fresh id, and a request is only
//! honoured while its id is the pending one, so cancelling is simply
//! forgetting the pending id.

/// Identifies one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequestId(u64);

/// Schedules at most one pending frame callback per owner.
#[derive(Debug, Default)]
pub struct FrameLoop {
    next_id: u64,
    pending: Option<FrameRequestId>,
    disposed: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a callback for the next frame, replacing any pending one.
    ///
    /// Returns None once the loop has been disposed.
    pub fn request(&mut self) -> Option<FrameRequestId> {
        if self.disposed {
            log::warn!("Frame requested after dispose, ignoring");
            return None;
        }
        self.cancel();
        let id = FrameRequestId(self.next_id);
        self.next_id += 1;
        self.pending = Some(id);
        log::trace!("Frame requested: {:?}", id);
        Some(id)
    }

    /// Drop the pending callback, if any.
    pub fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            log::trace!("Frame cancelled: {:?}", id);
        }
    }

    /// Consume the pending request for this frame.
    pub fn take_due(&mut self) -> Option<FrameRequestId> {
        if self.disposed {
            return None;
        }
        self.pending.take()
    }

    /// Check if a callback is waiting for the next frame.
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel and refuse all future requests.
    pub fn dispose(&mut self) {
        self.cancel();
        self.disposed = true;
        log::debug!("Frame loop disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_fires_once() {
        let mut frames = FrameLoop::new();
        let id = frames.request().unwrap();
        assert!(frames.is_scheduled());
        assert_eq!(frames.take_due(), Some(id));
        assert_eq!(frames.take_due(), None);
        assert!(!frames.is_scheduled());
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let mut frames = FrameLoop::new();
        let first = frames.request().unwrap();
        let second = frames.request().unwrap();
        assert_ne!(first, second);
        assert_eq!(frames.take_due(), Some(second));
        assert_eq!(frames.take_due(), None);
    }

    #[test]
    fn test_cancel() {
        let mut frames = FrameLoop::new();
        frames.request();
        frames.cancel();
        assert!(!frames.is_scheduled());
        assert_eq!(frames.take_due(), None);
    }

    #[test]
    fn test_nothing_fires_after_dispose() {
        let mut frames = FrameLoop::new();
        frames.request();
        frames.dispose();
        assert_eq!(frames.take_due(), None);
        assert_eq!(frames.request(), None);
        assert!(!frames.is_scheduled());
    }
}
