//! E2E integration tests — require a live Pointage backend.
//!
//! Run: `POINTAGE_API_URL=http://localhost:8080/api \
//!       POINTAGE_TEST_USERNAME=... POINTAGE_TEST_PASSWORD=... \
//!       cargo test -p pointage-client -- --ignored`

use pointage_client::auth::AuthApi;
use pointage_client::employees::EmployeesApi;
use pointage_client::kiosk::KioskApi;
use pointage_client::{
    CredentialStore, Gateway, MemoryStore, Namespace, NavTarget, Navigator, SessionBus,
};
use pointage_core::{LoginRequest, Role};
use std::sync::Arc;

struct NullNavigator;

impl Navigator for NullNavigator {
    fn goto(&self, _target: NavTarget) {}
}

fn gateway(namespace: Namespace) -> (Arc<Gateway>, Arc<MemoryStore>) {
    let api_url = std::env::var("POINTAGE_API_URL").expect("Set POINTAGE_API_URL to run E2E tests");
    let store = Arc::new(MemoryStore::new());
    let gw = Gateway::new(
        &api_url,
        namespace,
        store.clone(),
        Arc::new(NullNavigator),
        SessionBus::new(),
    )
    .expect("Failed to build gateway");
    (Arc::new(gw), store)
}

fn credentials() -> LoginRequest {
    LoginRequest {
        username: std::env::var("POINTAGE_TEST_USERNAME")
            .expect("Set POINTAGE_TEST_USERNAME to run E2E tests"),
        password: std::env::var("POINTAGE_TEST_PASSWORD")
            .expect("Set POINTAGE_TEST_PASSWORD to run E2E tests"),
    }
}

#[tokio::test]
#[ignore]
async fn login_stores_session_and_lists_employees() {
    let (gw, store) = gateway(Namespace::User);
    let auth = AuthApi::new(gw.clone());

    let outcome = auth.login(&credentials()).await.expect("Login failed");
    assert!(!outcome.token.is_empty(), "token should not be empty");
    assert_eq!(store.user_token().as_deref(), Some(outcome.token.as_str()));
    eprintln!("[e2e] Logged in as {}", outcome.role);

    if outcome.role == Role::Manager {
        let employees = EmployeesApi::new(gw)
            .list()
            .await
            .expect("Roster fetch failed");
        eprintln!("[e2e] Roster has {} employees", employees.len());
    }
}

#[tokio::test]
#[ignore]
async fn bad_login_surfaces_server_message() {
    let (gw, store) = gateway(Namespace::User);
    let auth = AuthApi::new(gw);

    let err = auth
        .login(&LoginRequest {
            username: "nobody-at-all".into(),
            password: "wrong".into(),
        })
        .await
        .expect_err("Login with bogus credentials should fail");

    assert!(err.status().is_some(), "expected an API-level failure: {err}");
    assert!(store.user_token().is_none());
    eprintln!("[e2e] Bad login rejected: {err}");
}

#[tokio::test]
#[ignore]
async fn stale_user_token_is_torn_down_on_403() {
    let (gw, store) = gateway(Namespace::User);
    store.set_user_session("not-a-real-token", Role::Manager);

    let err = EmployeesApi::new(gw)
        .list()
        .await
        .expect_err("Stale token should be rejected");

    assert_eq!(err.status(), Some(403), "unexpected failure: {err}");
    assert!(
        store.user_token().is_none(),
        "403 should have cleared the user session"
    );
}

#[tokio::test]
#[ignore]
async fn kiosk_pairing_round_trip() {
    let camera_code = std::env::var("POINTAGE_TEST_CAMERA_CODE")
        .expect("Set POINTAGE_TEST_CAMERA_CODE to run this test");

    let (gw, store) = gateway(Namespace::Kiosk);
    let kiosk = KioskApi::new(gw.clone());

    let token = kiosk
        .authenticate(&camera_code)
        .await
        .expect("Kiosk pairing failed");
    assert!(!token.is_empty());
    assert_eq!(store.kiosk_token().as_deref(), Some(token.as_str()));
    assert!(store.user_token().is_none(), "user slot must stay empty");

    let setup = kiosk.setup().await.expect("Kiosk setup fetch failed");
    eprintln!(
        "[e2e] Kiosk paired for {} ({} employees on roster)",
        setup.company_name,
        setup.employees.len()
    );
}
