//! Auth header construction: pure read-and-format over the credential store.
//!
//! Four call shapes exist: `{user, json}`, `{user, multipart}`,
//! `{kiosk, json}`, `{kiosk, multipart}`. The multipart shapes carry only
//! `Authorization` so the transport can set the boundary content-type.

use crate::gateway::Namespace;
use crate::store::CredentialStore;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

/// `Authorization` + `Content-Type: application/json`.
pub fn json_headers(store: &dyn CredentialStore, namespace: Namespace) -> HeaderMap {
    let mut headers = auth_only_headers(store, namespace);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// `Authorization` only, for multipart uploads.
pub fn auth_only_headers(store: &dyn CredentialStore, namespace: Namespace) -> HeaderMap {
    let token = match namespace {
        Namespace::User => store.user_token(),
        Namespace::Kiosk => store.kiosk_token(),
    };
    let mut headers = HeaderMap::with_capacity(2);
    headers.insert(AUTHORIZATION, bearer(token.as_deref()));
    headers
}

/// An absent token yields `Bearer ` (empty credential). The request then
/// fails authorization server-side, which is the intended path -- never
/// "Bearer null" or a locally raised error.
fn bearer(token: Option<&str>) -> HeaderValue {
    let value = format!("Bearer {}", token.unwrap_or(""));
    HeaderValue::try_from(value).unwrap_or_else(|_| HeaderValue::from_static("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pointage_core::Role;

    #[test]
    fn missing_token_yields_empty_bearer() {
        let store = MemoryStore::new();
        let headers = json_headers(&store, Namespace::User);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer ");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn user_and_kiosk_namespaces_read_their_own_slot() {
        let store = MemoryStore::new();
        store.set_user_session("usr-tok", Role::Manager);
        store.set_kiosk_session("kiosk-tok");

        let user = json_headers(&store, Namespace::User);
        assert_eq!(user.get(AUTHORIZATION).unwrap(), "Bearer usr-tok");

        let kiosk = json_headers(&store, Namespace::Kiosk);
        assert_eq!(kiosk.get(AUTHORIZATION).unwrap(), "Bearer kiosk-tok");
    }

    #[test]
    fn multipart_shape_omits_content_type() {
        let store = MemoryStore::new();
        store.set_user_session("tok", Role::Employee);
        let headers = auth_only_headers(&store, Namespace::User);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn control_characters_in_token_degrade_to_empty_bearer() {
        let store = MemoryStore::new();
        store.set_user_session("bad\ntoken", Role::Manager);
        let headers = auth_only_headers(&store, Namespace::User);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer ");
    }
}
