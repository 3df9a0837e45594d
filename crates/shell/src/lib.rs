//! Role-gated view composition for Pointage.
//!
//! Two independent state machines: the user shell (manager vs. employee
//! page trees, with the one-shot face-enrollment sub-state) and the kiosk
//! shell (unconfigured vs. ready). Transitions are driven purely by call
//! outcomes surfaced from `pointage-client`; there is no client-side
//! token-expiry timer.

pub mod kiosk;
pub mod nav;
pub mod user;

pub use kiosk::{KioskShell, KioskState};
pub use nav::{HardNavigator, ViewGuard};
pub use user::{UserShell, UserState};
