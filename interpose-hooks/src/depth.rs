//! Reentrancy depth accounting.

use interpose_core::DepthScope;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

static NEXT_TRACKER_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    // Per-thread depth, keyed by tracker id. Entries at zero are removed.
    static THREAD_DEPTHS: RefCell<HashMap<u64, usize>> = RefCell::new(HashMap::new());
}

/// Counts how many wrapped calls are active for one adopting type.
///
/// A depth of zero means no wrapped call is on the stack, so the next
/// wrapped call is an outermost call. With [`DepthScope::PerThread`] each
/// thread has its own counter; with [`DepthScope::Shared`] every thread
/// shares one.
pub struct DepthTracker {
    id: u64,
    scope: DepthScope,
    shared: AtomicUsize,
}

impl DepthTracker {
    /// Create a tracker starting at depth zero.
    pub fn new(scope: DepthScope) -> Self {
        Self {
            id: NEXT_TRACKER_ID.fetch_add(1, Ordering::Relaxed),
            scope,
            shared: AtomicUsize::new(0),
        }
    }

    /// The scope this tracker counts in.
    pub fn scope(&self) -> DepthScope {
        self.scope
    }

    /// Current depth, as seen from the calling thread.
    pub fn depth(&self) -> usize {
        match self.scope {
            DepthScope::Shared => self.shared.load(Ordering::SeqCst),
            _ => THREAD_DEPTHS.with(|d| d.borrow().get(&self.id).copied().unwrap_or(0)),
        }
    }

    /// Whether no wrapped call is currently active.
    pub fn is_outermost(&self) -> bool {
        self.depth() == 0
    }

    /// Increment the depth. It is decremented when the guard drops, on
    /// every exit path including unwinding.
    #[must_use = "dropping the guard immediately leaves the wrapped call"]
    pub fn enter(&self) -> DepthGuard<'_> {
        match self.scope {
            DepthScope::Shared => {
                self.shared.fetch_add(1, Ordering::SeqCst);
            }
            _ => THREAD_DEPTHS.with(|d| {
                *d.borrow_mut().entry(self.id).or_insert(0) += 1;
            }),
        }
        DepthGuard { tracker: self }
    }

    fn leave(&self) {
        match self.scope {
            DepthScope::Shared => {
                let _ = self
                    .shared
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
            }
            _ => THREAD_DEPTHS.with(|d| {
                let mut depths = d.borrow_mut();
                if let Some(n) = depths.get_mut(&self.id) {
                    *n = n.saturating_sub(1);
                    if *n == 0 {
                        depths.remove(&self.id);
                    }
                }
            }),
        }
    }
}

/// Marks one active wrapped call. Dropping it leaves the call.
pub struct DepthGuard<'a> {
    tracker: &'a DepthTracker,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.tracker.leave();
    }
}
