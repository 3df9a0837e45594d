//! Session & API gateway layer for the Pointage attendance service.
//!
//! Everything here sits between the shells and the remote REST backend:
//! the credential store (who am I), the header builder (how do I prove it),
//! the gateway with its fault interpreter (what happened when it failed),
//! and one thin service module per backend resource.
//!
//! Two token namespaces exist -- the role-carrying user token and the
//! device-session kiosk token -- and they never mix: a [`Gateway`] is bound
//! to exactly one [`Namespace`] at construction.

pub mod attendance;
pub mod auth;
pub mod company;
pub mod employees;
pub mod gateway;
pub mod headers;
pub mod kiosk;
pub mod schedules;
pub mod self_service;
pub mod store;

pub use gateway::{Gateway, Namespace, NavTarget, Navigator, SessionBus, SessionEvent};
pub use store::{CredentialStore, FileStore, MemoryStore};

/// Query-string date format the backend expects (`YYYY-MM-DD`).
pub(crate) fn iso_date(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
