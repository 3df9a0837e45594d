//! Hard-navigation sink and the view-liveness guard.
//!
//! A forced navigation (403 teardown) is terminal for whatever view is
//! current: results of sibling requests still in flight must be dropped,
//! not applied and not treated as errors. The guard makes that check
//! explicit -- capture one at view mount, test `is_live()` before writing
//! state.

use pointage_client::{NavTarget, Navigator};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Records forced navigations and invalidates outstanding [`ViewGuard`]s.
#[derive(Default)]
pub struct HardNavigator {
    current: Mutex<Option<NavTarget>>,
    epoch: AtomicU64,
}

impl HardNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the last forced navigation pointed, if any.
    pub fn current(&self) -> Option<NavTarget> {
        *self.current.lock().unwrap()
    }

    /// Capture the liveness of the view being mounted right now.
    pub fn guard(self: &Arc<Self>) -> ViewGuard {
        ViewGuard {
            nav: Arc::clone(self),
            epoch: self.epoch.load(Ordering::Acquire),
        }
    }
}

impl Navigator for HardNavigator {
    fn goto(&self, target: NavTarget) {
        tracing::info!(target = target.path(), "hard navigation");
        *self.current.lock().unwrap() = Some(target);
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }
}

/// "Is this view still live" token captured at mount.
pub struct ViewGuard {
    nav: Arc<HardNavigator>,
    epoch: u64,
}

impl ViewGuard {
    /// False once any forced navigation has happened since capture.
    pub fn is_live(&self) -> bool {
        self.nav.epoch.load(Ordering::Acquire) == self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_goes_stale_after_forced_navigation() {
        let nav = Arc::new(HardNavigator::new());
        let guard = nav.guard();
        assert!(guard.is_live());
        assert!(nav.current().is_none());

        nav.goto(NavTarget::Login);

        assert!(!guard.is_live());
        assert_eq!(nav.current(), Some(NavTarget::Login));

        // A view mounted after the redirect is live again.
        let fresh = nav.guard();
        assert!(fresh.is_live());
    }
}
