//! The user shell: routes an authenticated user into exactly one of the
//! two page trees, with face enrollment as a one-shot detour for
//! employees who have not enrolled yet.

use pointage_client::{CredentialStore, NavTarget, SessionEvent};
use pointage_core::{AuthOutcome, Role};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserState {
    Unauthenticated,
    Manager,
    Employee,
    /// Strict sub-state of Employee: reachable only from login, left only
    /// by completing enrollment.
    FaceEnrollment,
}

pub struct UserShell {
    state: UserState,
    store: Arc<dyn CredentialStore>,
}

impl UserShell {
    /// Resume from stored credentials. Enrollment status is not persisted,
    /// so a stored employee session resumes in the Employee tree; the
    /// server answers 403/400 on anything enrollment actually gates.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let state = match store.current_role() {
            Some(Role::Manager) => UserState::Manager,
            Some(Role::Employee) => UserState::Employee,
            None => UserState::Unauthenticated,
        };
        Self { state, store }
    }

    pub fn state(&self) -> UserState {
        self.state
    }

    /// Route a successful login. Employees without a registered face land
    /// in enrollment, everyone else goes straight to their dashboard.
    pub fn on_login(&mut self, outcome: &AuthOutcome) -> NavTarget {
        let (state, target) = match outcome.role {
            Role::Manager => (UserState::Manager, NavTarget::ManagerDashboard),
            Role::Employee if outcome.has_registered_face == Some(false) => {
                (UserState::FaceEnrollment, NavTarget::FaceEnrollment)
            }
            Role::Employee => (UserState::Employee, NavTarget::EmployeeDashboard),
        };
        tracing::info!(?state, "user shell mounted");
        self.state = state;
        target
    }

    /// Enrollment done: forward into the employee tree. Any other state is
    /// left untouched.
    pub fn on_enrollment_complete(&mut self) -> Option<NavTarget> {
        if self.state != UserState::FaceEnrollment {
            return None;
        }
        self.state = UserState::Employee;
        Some(NavTarget::EmployeeDashboard)
    }

    /// Shell-chrome logout: clear the session and fall back to the login
    /// view. Safe to call repeatedly.
    pub fn logout(&mut self) -> NavTarget {
        self.store.clear_user_session();
        self.state = UserState::Unauthenticated;
        NavTarget::Login
    }

    /// React to a broadcast session event (e.g. a 403 teardown triggered
    /// by some other in-flight call). Kiosk events don't concern us.
    pub fn on_session_event(&mut self, event: SessionEvent) {
        if event == SessionEvent::UserLoggedOut {
            self.state = UserState::Unauthenticated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointage_client::MemoryStore;

    fn shell() -> (UserShell, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (UserShell::new(store.clone()), store)
    }

    fn outcome(role: Role, has_registered_face: Option<bool>) -> AuthOutcome {
        serde_json::from_str(&format!(
            r#"{{"token":"t","role":"{role}","hasRegisteredFace":{}}}"#,
            match has_registered_face {
                Some(b) => b.to_string(),
                None => "null".into(),
            }
        ))
        .unwrap()
    }

    #[test]
    fn manager_login_lands_in_manager_shell() {
        let (mut shell, _) = shell();
        let target = shell.on_login(&outcome(Role::Manager, None));
        assert_eq!(shell.state(), UserState::Manager);
        assert_eq!(target, NavTarget::ManagerDashboard);
    }

    #[test]
    fn unenrolled_employee_is_detoured_to_enrollment() {
        let (mut shell, _) = shell();
        let target = shell.on_login(&outcome(Role::Employee, Some(false)));
        assert_eq!(shell.state(), UserState::FaceEnrollment);
        assert_eq!(target, NavTarget::FaceEnrollment);

        let forward = shell.on_enrollment_complete().unwrap();
        assert_eq!(shell.state(), UserState::Employee);
        assert_eq!(forward, NavTarget::EmployeeDashboard);
    }

    #[test]
    fn enrolled_employee_goes_straight_to_dashboard() {
        let (mut shell, _) = shell();
        let target = shell.on_login(&outcome(Role::Employee, Some(true)));
        assert_eq!(shell.state(), UserState::Employee);
        assert_eq!(target, NavTarget::EmployeeDashboard);
        // Completing enrollment from here is meaningless.
        assert!(shell.on_enrollment_complete().is_none());
    }

    #[test]
    fn logout_clears_session_and_is_idempotent() {
        let (mut shell, store) = shell();
        store.set_user_session("t", Role::Manager);
        shell.on_login(&outcome(Role::Manager, None));

        assert_eq!(shell.logout(), NavTarget::Login);
        assert_eq!(shell.logout(), NavTarget::Login);
        assert_eq!(shell.state(), UserState::Unauthenticated);
        assert!(store.user_token().is_none());
    }

    #[test]
    fn resumed_employee_session_has_no_enrollment_detour() {
        let store = Arc::new(MemoryStore::new());
        store.set_user_session("t", Role::Employee);
        let mut shell = UserShell::new(store);
        // Enrollment status is not persisted, so a resumed session is
        // always in the plain Employee tree.
        assert_eq!(shell.state(), UserState::Employee);
        assert!(shell.on_enrollment_complete().is_none());
    }

    #[test]
    fn resumes_from_stored_role() {
        let store = Arc::new(MemoryStore::new());
        store.set_user_session("t", Role::Manager);
        let shell = UserShell::new(store);
        assert_eq!(shell.state(), UserState::Manager);
    }

    #[test]
    fn forced_logout_event_resets_state() {
        let (mut shell, _) = shell();
        shell.on_login(&outcome(Role::Manager, None));
        shell.on_session_event(SessionEvent::KioskDeauthorized);
        assert_eq!(shell.state(), UserState::Manager);
        shell.on_session_event(SessionEvent::UserLoggedOut);
        assert_eq!(shell.state(), UserState::Unauthenticated);
    }
}
