//! Domain models, wire DTOs, and error definitions.
//!
//! Foundation crate -- no async or I/O dependencies.

pub mod error;
pub mod types;

pub use error::{ApiError, ClientError, ClientResult};
pub use types::{
    AttendanceRecord, AuthOutcome, ChangePasswordRequest, ChangeUserDetailsRequest,
    CompanyInfo, CompanyProfile, DashboardStats, DayStats, Employee, EmployeeDashboard,
    EmployeeDetailed, Feedback, KioskAuthRequest, KioskAuthResponse, KioskSetup, LoginRequest,
    ManagerSettings, NewEmployee, NewSchedule,
    PresenceStatus, RecurringKind, RegisterRequest, Role, Schedule, UserDetails,
};
