//! Login, registration, and credential changes.
//!
//! `login` and `register` are the only unauthenticated user calls; a
//! successful login (or details change, which re-issues the token) writes
//! the session straight into the credential store.

use crate::gateway::Gateway;
use pointage_core::{
    AuthOutcome, ChangePasswordRequest, ChangeUserDetailsRequest, ClientResult, Feedback,
    LoginRequest, RegisterRequest,
};
use std::sync::Arc;

pub struct AuthApi {
    gw: Arc<Gateway>,
}

impl AuthApi {
    /// Takes the user-namespace gateway.
    pub fn new(gw: Arc<Gateway>) -> Self {
        Self { gw }
    }

    /// Authenticate and persist the returned token + role.
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<AuthOutcome> {
        let outcome: AuthOutcome = self.gw.post_json_public("auth/login", request).await?;
        self.gw
            .store()
            .set_user_session(&outcome.token, outcome.role);
        tracing::info!(role = %outcome.role, "logged in");
        Ok(outcome)
    }

    /// Register a manager + company. Success is strictly HTTP 201.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<Feedback> {
        self.gw
            .post_json_public_created("auth/register", request)
            .await
    }

    /// Change username/phone. The backend re-issues the token, which is
    /// stored in place of the old one.
    pub async fn change_user_details(
        &self,
        request: &ChangeUserDetailsRequest,
    ) -> ClientResult<AuthOutcome> {
        let outcome: AuthOutcome = self
            .gw
            .post_json("changeCreds/changeUserDetails", request)
            .await?;
        self.gw
            .store()
            .set_user_session(&outcome.token, outcome.role);
        Ok(outcome)
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> ClientResult<Feedback> {
        self.gw
            .post_json("changeCreds/changePassword", request)
            .await
    }

    /// Local logout: clear the session. No server call to invalidate the
    /// token; expiry is the server's concern.
    pub fn logout(&self) {
        self.gw.store().clear_user_session();
        tracing::info!("logged out");
    }
}
