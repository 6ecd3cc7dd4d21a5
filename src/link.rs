//! Network link state as seen by the draw loop.

use core::sync::atomic::{AtomicBool, Ordering};

/// Set by the network stack while the link carrying frames is up
///
/// While it is down the draw loop leaves the frame queues alone and local
/// effects may take over.
#[derive(Debug, Default)]
pub struct LinkStatus {
    up: AtomicBool,
}

impl LinkStatus {
    /// Starts with the link down
    pub const fn new() -> Self {
        Self {
            up: AtomicBool::new(false),
        }
    }

    pub fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::Release);
    }

    pub fn is_up(&self) -> bool {
        self.up.load(Ordering::Acquire)
    }
}
