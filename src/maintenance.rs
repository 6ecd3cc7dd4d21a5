//! Cooperative throttle while background maintenance runs.

use core::sync::atomic::{AtomicBool, Ordering};

/// Raised while a firmware update is being written
///
/// The draw loop keeps running but idles longer each tick so the update
/// gets the CPU.
#[derive(Debug, Default)]
pub struct MaintenanceFlag {
    active: AtomicBool,
}

impl MaintenanceFlag {
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
        }
    }

    pub fn begin(&self) {
        self.active.store(true, Ordering::Release);
    }

    pub fn end(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}
