//! Frame scheduling
//!
//! The session never loops on its own. After each frame it asks the host to
//! call it again; teardown cancels the outstanding request.

use std::cell::RefCell;
use std::rc::Rc;

/// Host-side frame loop
pub trait FrameScheduler {
    /// Request one more frame callback
    fn schedule_next_frame(&mut self);

    /// Drop any outstanding request and refuse new ones
    fn cancel(&mut self);
}

#[derive(Debug, Default)]
struct ScheduleLog {
    requests: u64,
    pending: bool,
    cancelled: bool,
}

/// Scheduler driven by hand. Clones share state, so a host (or test) can
/// keep a handle while the session owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    log: Rc<RefCell<ScheduleLog>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the outstanding request, if any
    pub fn take_pending(&self) -> bool {
        std::mem::replace(&mut self.log.borrow_mut().pending, false)
    }

    pub fn is_pending(&self) -> bool {
        self.log.borrow().pending
    }

    /// Total requests accepted
    pub fn requests(&self) -> u64 {
        self.log.borrow().requests
    }

    pub fn is_cancelled(&self) -> bool {
        self.log.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next_frame(&mut self) {
        let mut log = self.log.borrow_mut();
        if log.cancelled {
            return;
        }
        log.requests += 1;
        log.pending = true;
    }

    fn cancel(&mut self) {
        let mut log = self.log.borrow_mut();
        log.cancelled = true;
        log.pending = false;
    }
}
