use std::sync::atomic::{AtomicBool, Ordering};

/// The client's current belief about reachability of the API.
///
/// Advisory, not authoritative: it only reflects the most recent transport
/// outcome. A fresh client assumes online. The transport is the single
/// writer: a transport-level failure marks the client offline, a successful
/// probe marks it back online. Nothing else flips the flag.
#[derive(Debug)]
pub struct Connectivity {
    online: AtomicBool,
}

impl Connectivity {
    pub(crate) fn new() -> Self {
        Self {
            online: AtomicBool::new(true),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    /// Record a transport-level failure. Logs only on the edge.
    pub(crate) fn mark_offline(&self) {
        if self.online.swap(false, Ordering::Relaxed) {
            tracing::warn!("[api] transport failure, client now considered offline");
        }
    }

    /// Record a successful probe. Logs only on the edge.
    pub(crate) fn mark_online(&self) {
        if !self.online.swap(true, Ordering::Relaxed) {
            tracing::info!("[api] connectivity restored, client back online");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_online() {
        let connectivity = Connectivity::new();
        assert!(connectivity.is_online());
    }

    #[test]
    fn test_offline_then_online() {
        let connectivity = Connectivity::new();

        connectivity.mark_offline();
        assert!(!connectivity.is_online());

        connectivity.mark_online();
        assert!(connectivity.is_online());
    }

    #[test]
    fn test_marks_are_idempotent() {
        let connectivity = Connectivity::new();

        connectivity.mark_offline();
        connectivity.mark_offline();
        assert!(!connectivity.is_online());

        connectivity.mark_online();
        connectivity.mark_online();
        assert!(connectivity.is_online());
    }
}
