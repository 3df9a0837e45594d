//! The kiosk shell: a parallel state machine gated by the device token.
//!
//! Unconfigured until a valid setup code pairs the device; once ready it
//! loops on attendance marks. A 403 on any kiosk call (observed via the
//! session bus) throws it back to the setup screen.

use pointage_client::{CredentialStore, NavTarget, SessionEvent};
use pointage_core::{ClientError, Employee, KioskSetup};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KioskState {
    Unconfigured,
    Ready,
}

pub struct KioskShell {
    state: KioskState,
    store: Arc<dyn CredentialStore>,
    /// Check-in roster from the last setup call.
    roster: Vec<Employee>,
    company_name: Option<String>,
}

impl KioskShell {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let state = if store.kiosk_token().is_some() {
            KioskState::Ready
        } else {
            KioskState::Unconfigured
        };
        Self {
            state,
            store,
            roster: Vec::new(),
            company_name: None,
        }
    }

    pub fn state(&self) -> KioskState {
        self.state
    }

    pub fn roster(&self) -> &[Employee] {
        &self.roster
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    /// Device paired: move to the check-in screen.
    pub fn on_paired(&mut self) -> NavTarget {
        self.state = KioskState::Ready;
        NavTarget::MarkAttendance
    }

    /// Roster loaded for the check-in screen.
    pub fn on_setup(&mut self, setup: KioskSetup) {
        self.company_name = Some(setup.company_name);
        self.roster = setup.employees;
        self.state = KioskState::Ready;
    }

    /// An attendance mark finished. Success and ordinary failures both
    /// leave the kiosk on the check-in screen for the next attempt; only a
    /// rejected device session (already torn down by the gateway) drops
    /// back to setup.
    pub fn on_mark_result<T>(&mut self, result: &Result<T, ClientError>) {
        if let Err(e) = result {
            if e.status() == Some(403) {
                self.reset();
            }
        }
    }

    pub fn on_session_event(&mut self, event: SessionEvent) {
        if event == SessionEvent::KioskDeauthorized {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.state = KioskState::Unconfigured;
        self.roster.clear();
        self.company_name = None;
    }

    /// Operator-initiated unpair from the kiosk chrome.
    pub fn unpair(&mut self) -> NavTarget {
        self.store.clear_kiosk_session();
        self.reset();
        NavTarget::CameraSetup
    }
}
