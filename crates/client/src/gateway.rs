//! The authenticated gateway: one instance per token namespace.
//!
//! A [`Gateway`] owns the HTTP client, the base URL, and the injected
//! credential store, and funnels every non-2xx response through the fault
//! interpreter. A 403 is terminal for the current session: the namespace's
//! credentials are cleared, a [`SessionEvent`] is broadcast, and the
//! navigator is told to hard-redirect -- the caller still gets the error,
//! but the shell is already on its way to the login (or camera-setup) view.

use crate::headers;
use crate::store::CredentialStore;
use pointage_core::{ApiError, ClientError, ClientResult};
use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use url::Url;

/// Which token slot a gateway reads, and where it redirects on 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    User,
    Kiosk,
}

impl Namespace {
    /// Redirect target when this namespace's session is rejected.
    pub fn expiry_target(&self) -> NavTarget {
        match self {
            Namespace::User => NavTarget::Login,
            Namespace::Kiosk => NavTarget::CameraSetup,
        }
    }
}

/// Route targets for hard navigation. Paths mirror the web front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Login,
    ManagerDashboard,
    EmployeeDashboard,
    FaceEnrollment,
    CameraSetup,
    MarkAttendance,
}

impl NavTarget {
    pub fn path(&self) -> &'static str {
        match self {
            NavTarget::Login => "/login",
            NavTarget::ManagerDashboard => "/manager-dashboard",
            NavTarget::EmployeeDashboard => "/employee-dashboard",
            NavTarget::FaceEnrollment => "/face-recognition",
            NavTarget::CameraSetup => "/camera",
            NavTarget::MarkAttendance => "/mark-attendance",
        }
    }
}

/// Sink for forced full navigations.
///
/// A `goto` is deliberately hard: whatever view is current must treat it as
/// terminal and stop applying state from in-flight requests.
pub trait Navigator: Send + Sync {
    fn goto(&self, target: NavTarget);
}

/// Session lifecycle notifications other live views can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    UserLoggedOut,
    KioskDeauthorized,
}

/// In-process broadcast of [`SessionEvent`]s.
#[derive(Clone)]
pub struct SessionBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Publishing with no live subscribers is fine; the event is dropped.
    pub fn publish(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for SessionBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a failed response's status and body into an [`ApiError`].
///
/// Prefers the body's `message` field, then `error`, then the generic
/// status-coded fallback. Pure so it is testable without a socket.
pub fn interpret_failure(status: u16, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .or_else(|| v.get("error").and_then(|m| m.as_str()))
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("Request failed with status: {status}"));
    ApiError::new(status, message)
}

/// Authenticated HTTP client bound to one token namespace.
pub struct Gateway {
    http: reqwest::Client,
    base_url: Url,
    namespace: Namespace,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    bus: SessionBus,
}

impl Gateway {
    pub fn new(
        base_url: &str,
        namespace: Namespace,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        bus: SessionBus,
    ) -> ClientResult<Self> {
        if base_url.is_empty() {
            return Err(ClientError::InvalidInput(
                "API base URL must not be empty".into(),
            ));
        }
        // A trailing slash keeps Url::join from eating the last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_owned()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| ClientError::InvalidInput(format!("invalid API base URL: {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            namespace,
            store,
            navigator,
            bus,
        })
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.bus.subscribe()
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidInput(format!("invalid endpoint {path}: {e}")))
    }

    // -- request helpers ----------------------------------------------------

    /// GET expecting a JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let req = self
            .http
            .get(self.endpoint(path)?)
            .query(query)
            .headers(headers::json_headers(self.store.as_ref(), self.namespace));
        let resp = self.send(req).await?;
        self.expect_success(resp).await
    }

    /// GET where the server answers 204 to mean "no resource for this query".
    /// The 204 short-circuits to `Ok(None)` before any JSON parse.
    pub async fn get_optional_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<Option<T>> {
        let req = self
            .http
            .get(self.endpoint(path)?)
            .query(query)
            .headers(headers::json_headers(self.store.as_ref(), self.namespace));
        let resp = self.send(req).await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(self.fail(resp).await);
        }
        Ok(Some(self.decode(resp).await?))
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self
            .http
            .post(self.endpoint(path)?)
            .headers(headers::json_headers(self.store.as_ref(), self.namespace))
            .json(body);
        let resp = self.send(req).await?;
        self.expect_success(resp).await
    }

    /// POST where only HTTP 201 counts as success. Any other status --
    /// including a stray 200 -- goes through the fault interpreter.
    pub async fn post_json_created<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self
            .http
            .post(self.endpoint(path)?)
            .headers(headers::json_headers(self.store.as_ref(), self.namespace))
            .json(body);
        let resp = self.send(req).await?;
        if resp.status() != StatusCode::CREATED {
            return Err(self.fail(resp).await);
        }
        self.decode(resp).await
    }

    /// POST without auth headers, for login / registration / kiosk pairing.
    pub async fn post_json_public<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.http.post(self.endpoint(path)?).json(body);
        let resp = self.send(req).await?;
        self.expect_success(resp).await
    }

    /// Unauthenticated POST where only HTTP 201 counts as success.
    pub async fn post_json_public_created<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.http.post(self.endpoint(path)?).json(body);
        let resp = self.send(req).await?;
        if resp.status() != StatusCode::CREATED {
            return Err(self.fail(resp).await);
        }
        self.decode(resp).await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> ClientResult<T> {
        let req = self
            .http
            .put(self.endpoint(path)?)
            .query(query)
            .headers(headers::json_headers(self.store.as_ref(), self.namespace))
            .json(body);
        let resp = self.send(req).await?;
        self.expect_success(resp).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self
            .http
            .delete(self.endpoint(path)?)
            .headers(headers::json_headers(self.store.as_ref(), self.namespace));
        let resp = self.send(req).await?;
        self.expect_success(resp).await
    }

    /// Multipart POST. Auth header only; reqwest supplies the boundary
    /// content-type.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> ClientResult<T> {
        let req = self
            .http
            .post(self.endpoint(path)?)
            .headers(headers::auth_only_headers(
                self.store.as_ref(),
                self.namespace,
            ))
            .multipart(form);
        let resp = self.send(req).await?;
        self.expect_success(resp).await
    }

    // -- plumbing -----------------------------------------------------------

    async fn send(&self, req: RequestBuilder) -> ClientResult<Response> {
        req.send()
            .await
            .map_err(|e| ClientError::Transport(format!("Request failed: {e}")))
    }

    async fn expect_success<T: DeserializeOwned>(&self, resp: Response) -> ClientResult<T> {
        if !resp.status().is_success() {
            return Err(self.fail(resp).await);
        }
        self.decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(&self, resp: Response) -> ClientResult<T> {
        resp.json()
            .await
            .map_err(|e| ClientError::Decode(format!("Failed to decode response body: {e}")))
    }

    /// Interpret a failed response and apply the 403 side effects.
    async fn fail(&self, resp: Response) -> ClientError {
        let status = resp.status().as_u16();
        let body = resp.bytes().await.unwrap_or_default();
        self.handle_failure(status, &body)
    }

    fn handle_failure(&self, status: u16, body: &[u8]) -> ClientError {
        let err = interpret_failure(status, body);
        if err.is_forbidden() {
            self.deauthorize();
        } else {
            tracing::debug!(status, message = %err.message, "api call failed");
        }
        err.into()
    }

    /// Session teardown on 403: clear this namespace's credentials,
    /// broadcast the event, and hard-navigate. Idempotent.
    fn deauthorize(&self) {
        let event = match self.namespace {
            Namespace::User => {
                self.store.clear_user_session();
                SessionEvent::UserLoggedOut
            }
            Namespace::Kiosk => {
                self.store.clear_kiosk_session();
                SessionEvent::KioskDeauthorized
            }
        };
        let target = self.namespace.expiry_target();
        tracing::warn!(namespace = ?self.namespace, target = target.path(), "session rejected, forcing re-authentication");
        self.bus.publish(event);
        self.navigator.goto(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pointage_core::Role;
    use std::sync::Mutex;

    struct RecordingNavigator {
        targets: Mutex<Vec<NavTarget>>,
    }

    impl RecordingNavigator {
        fn new() -> Self {
            Self {
                targets: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> Option<NavTarget> {
            self.targets.lock().unwrap().last().copied()
        }
    }

    impl Navigator for RecordingNavigator {
        fn goto(&self, target: NavTarget) {
            self.targets.lock().unwrap().push(target);
        }
    }

    fn gateway(namespace: Namespace) -> (Gateway, Arc<MemoryStore>, Arc<RecordingNavigator>) {
        let store = Arc::new(MemoryStore::new());
        let nav = Arc::new(RecordingNavigator::new());
        let gw = Gateway::new(
            "http://localhost:8080/api",
            namespace,
            store.clone(),
            nav.clone(),
            SessionBus::new(),
        )
        .unwrap();
        (gw, store, nav)
    }

    #[test]
    fn message_field_wins() {
        let err = interpret_failure(400, br#"{"message": "X", "error": "Y"}"#);
        assert_eq!(err.message, "X");
        assert_eq!(err.status, 400);
    }

    #[test]
    fn error_field_is_second_choice() {
        let err = interpret_failure(500, br#"{"error": "boom"}"#);
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn non_json_body_gets_status_fallback() {
        let err = interpret_failure(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.message, "Request failed with status: 502");
    }

    #[test]
    fn json_without_known_fields_gets_status_fallback() {
        let err = interpret_failure(418, br#"{"detail": "teapot"}"#);
        assert_eq!(err.message, "Request failed with status: 418");
    }

    #[test]
    fn forbidden_user_call_tears_down_user_session() {
        let (gw, store, nav) = gateway(Namespace::User);
        store.set_user_session("tok", Role::Manager);
        store.set_kiosk_session("ktok");

        let mut events = gw.subscribe();
        let err = gw.handle_failure(403, br#"{"message": "Invalid token"}"#);

        assert_eq!(err.status(), Some(403));
        assert!(store.user_token().is_none());
        assert!(store.current_role().is_none());
        // The kiosk namespace is untouched.
        assert_eq!(store.kiosk_token().as_deref(), Some("ktok"));
        assert_eq!(nav.last(), Some(NavTarget::Login));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::UserLoggedOut);
    }

    #[test]
    fn forbidden_kiosk_call_redirects_to_camera_setup() {
        let (gw, store, nav) = gateway(Namespace::Kiosk);
        store.set_user_session("usr", Role::Employee);
        store.set_kiosk_session("ktok");

        let err = gw.handle_failure(403, b"");

        assert_eq!(err.status(), Some(403));
        assert!(store.kiosk_token().is_none());
        // The unrelated user token is left in place.
        assert_eq!(store.user_token().as_deref(), Some("usr"));
        assert_eq!(nav.last(), Some(NavTarget::CameraSetup));
    }

    #[test]
    fn non_forbidden_failure_has_no_session_side_effects() {
        let (gw, store, nav) = gateway(Namespace::User);
        store.set_user_session("tok", Role::Manager);

        let err = gw.handle_failure(400, br#"{"message": "Date is required"}"#);

        assert_eq!(err.to_string(), "Date is required");
        assert_eq!(store.user_token().as_deref(), Some("tok"));
        assert!(nav.last().is_none());
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::new());
        let nav: Arc<dyn Navigator> = Arc::new(RecordingNavigator::new());
        let res = Gateway::new("", Namespace::User, store, nav, SessionBus::new());
        assert!(res.is_err());
    }

    #[test]
    fn namespace_expiry_targets() {
        assert_eq!(Namespace::User.expiry_target(), NavTarget::Login);
        assert_eq!(Namespace::Kiosk.expiry_target(), NavTarget::CameraSetup);
    }

    /// One-shot local HTTP server returning a canned response, so the
    /// response-handling paths can be exercised without a backend.
    async fn serve_once(response: String) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/api/")
    }

    fn local_gateway(base_url: &str) -> Gateway {
        Gateway::new(
            base_url,
            Namespace::User,
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNavigator::new()),
            SessionBus::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn no_content_answer_is_none_not_a_decode_error() {
        let base = serve_once(
            "HTTP/1.1 204 No Content\r\ncontent-length: 0\r\n\r\n".to_owned(),
        )
        .await;
        let gw = local_gateway(&base);

        let res: ClientResult<Option<serde_json::Value>> =
            gw.get_optional_json("schedule/showSchedule/1", &[]).await;

        assert!(matches!(res, Ok(None)), "expected Ok(None), got {res:?}");
    }

    #[tokio::test]
    async fn present_body_decodes_to_some() {
        let body = r#"{"message":"ok","success":true}"#;
        let base = serve_once(format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{body}",
            body.len()
        ))
        .await;
        let gw = local_gateway(&base);

        let res: ClientResult<Option<serde_json::Value>> =
            gw.get_optional_json("schedule/showSchedule/1", &[]).await;

        let value = res.unwrap().expect("body should decode to Some");
        assert_eq!(value["success"], serde_json::Value::Bool(true));
    }
}
