//! Wire DTOs and domain types for the Pointage attendance service.
//!
//! Field names follow the backend's JSON contract (camelCase, with the
//! backend's French-flavored "entreprise" keys mapped to English names).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Coarse-grained permission class returned at login.
///
/// Determines which shell the user lands in; the wire strings are the
/// backend's Spring-style authority names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_MANAGER")]
    Manager,
    #[serde(rename = "ROLE_EMPLOYEE")]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "ROLE_MANAGER",
            Role::Employee => "ROLE_EMPLOYEE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = crate::error::ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_MANAGER" => Ok(Role::Manager),
            "ROLE_EMPLOYEE" => Ok(Role::Employee),
            other => Err(crate::error::ClientError::InvalidInput(format!(
                "unknown role: {other}"
            ))),
        }
    }
}

/// Result of a successful login, as stored and as routed on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOutcome {
    pub token: String,
    pub role: Role,
    /// Only populated for employees; managers never enroll a face.
    pub has_registered_face: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub manager_first_name: String,
    pub manager_last_name: String,
    pub manager_username: String,
    pub manager_email: String,
    pub manager_phone: String,
    pub manager_password: String,
    #[serde(rename = "entrepriseName")]
    pub company_name: String,
    #[serde(rename = "entrepriseSector")]
    pub company_sector: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUserDetailsRequest {
    pub new_username: String,
    pub new_phone_number: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Generic `{message, success}` acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i32,
    pub employee_first_name: String,
    pub employee_last_name: String,
    pub employee_username: Option<String>,
    #[serde(rename = "employeeEntreprise")]
    pub employee_company: Option<String>,
    pub employee_email: String,
    pub employee_phone: Option<String>,
    pub employee_position_title: Option<String>,
}

/// One employee with their schedule and attendance history attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetailed {
    pub employee_details: Employee,
    pub employee_schedules: Vec<Schedule>,
    pub employee_attendances: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub employee_first_name: String,
    pub employee_last_name: String,
    pub employee_email: String,
    pub employee_phone: String,
    pub employee_position_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub user_id: i32,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
    pub user_phone: Option<String>,
    pub user_username: String,
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurringKind {
    None,
    Daily,
    Weekly,
}

impl FromStr for RecurringKind {
    type Err = crate::error::ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NONE" => Ok(RecurringKind::None),
            "DAILY" => Ok(RecurringKind::Daily),
            "WEEKLY" => Ok(RecurringKind::Weekly),
            other => Err(crate::error::ClientError::InvalidInput(format!(
                "unknown recurrence: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub schedule_id: i32,
    pub employee_first_name: String,
    pub employee_last_name: String,
    pub schedule_name: String,
    pub date: NaiveDate,
    pub checkin_time: Option<NaiveTime>,
    pub checkout_time: Option<NaiveTime>,
    pub break_start_time: Option<NaiveTime>,
    pub break_end_time: Option<NaiveTime>,
    pub is_day_off: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub schedule_name: String,
    pub date: NaiveDate,
    pub checkin_time: Option<NaiveTime>,
    pub checkout_time: Option<NaiveTime>,
    pub break_start_time: Option<NaiveTime>,
    pub break_end_time: Option<NaiveTime>,
    pub is_day_off: bool,
    pub recurring_type: RecurringKind,
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

/// Attendance status as computed server-side from check-in times and the
/// manager's lateness/absence thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PresenceStatus {
    Present,
    Absent,
    Late,
    /// Day off, nothing expected.
    Free,
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PresenceStatus::Present => "PRESENT",
            PresenceStatus::Absent => "ABSENT",
            PresenceStatus::Late => "LATE",
            PresenceStatus::Free => "FREE",
        };
        f.write_str(s)
    }
}

impl FromStr for PresenceStatus {
    type Err = crate::error::ClientError;

    /// Case-insensitive: callers pass user input, the wire wants uppercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PRESENT" => Ok(PresenceStatus::Present),
            "ABSENT" => Ok(PresenceStatus::Absent),
            "LATE" => Ok(PresenceStatus::Late),
            "FREE" => Ok(PresenceStatus::Free),
            other => Err(crate::error::ClientError::InvalidInput(format!(
                "unknown presence status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub employee_id: i32,
    pub employee_first_name: String,
    pub employee_last_name: String,
    pub checkin_time: Option<NaiveTime>,
    pub checkout_time: Option<NaiveTime>,
    pub date: NaiveDate,
    pub status: PresenceStatus,
}

// ---------------------------------------------------------------------------
// Company / dashboards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSettings {
    pub absence_threshold_minutes: i32,
    pub late_threshold_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    #[serde(rename = "entrepriseName")]
    pub name: String,
    #[serde(rename = "entrepriseAddress")]
    pub address: Option<String>,
    #[serde(rename = "entrepriseWebsite")]
    pub website: Option<String>,
    #[serde(rename = "entreprisePhone")]
    pub phone: Option<String>,
    #[serde(rename = "entrepriseEmail")]
    pub email: Option<String>,
    #[serde(rename = "entrepriseSector")]
    pub sector: Option<String>,
}

/// Company + manager settings bundle shown on the settings page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// One-time setup code handed to kiosk devices.
    #[serde(rename = "entrepriseCameraCode")]
    pub camera_code: Option<String>,
    pub manager_details: UserDetails,
    #[serde(rename = "entrepriseInfo")]
    pub company_info: CompanyInfo,
    pub manager_settings: ManagerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub day_name: String,
    pub total_present: i32,
    pub total_absent: i32,
    pub total_late: i32,
    pub total_free: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub manager_name: String,
    pub manager_email: String,
    pub company_name: String,
    pub total_employees: i32,
    pub total_schedules: i32,
    pub total_attendances: i32,
    pub week_presence_stats: Vec<DayStats>,
}

/// The employee's own dashboard: who they are plus today's slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub employee_first_name: String,
    pub employee_last_name: String,
    pub today_schedule: Option<Schedule>,
    pub today_attendance: Option<AttendanceRecord>,
}

// ---------------------------------------------------------------------------
// Kiosk
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskAuthRequest {
    pub camera_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KioskAuthResponse {
    pub token: String,
}

/// What the kiosk needs to run: the company name and the employees
/// scheduled soon enough to be offered on the check-in screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskSetup {
    #[serde(rename = "entrepriseName")]
    pub company_name: String,
    pub employees: Vec<Employee>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_strings_roundtrip() {
        assert_eq!(
            serde_json::to_string(&Role::Manager).unwrap(),
            "\"ROLE_MANAGER\""
        );
        assert_eq!(
            serde_json::from_str::<Role>("\"ROLE_EMPLOYEE\"").unwrap(),
            Role::Employee
        );
        assert_eq!("ROLE_MANAGER".parse::<Role>().unwrap(), Role::Manager);
        assert!("ROLE_ADMIN".parse::<Role>().is_err());
    }

    #[test]
    fn auth_outcome_decodes_login_body() {
        let body = r#"{"token":"abc","role":"ROLE_EMPLOYEE","hasRegisteredFace":false}"#;
        let out: AuthOutcome = serde_json::from_str(body).unwrap();
        assert_eq!(out.role, Role::Employee);
        assert_eq!(out.has_registered_face, Some(false));
    }

    #[test]
    fn presence_status_uppercases_from_user_input() {
        assert_eq!("late".parse::<PresenceStatus>().unwrap(), PresenceStatus::Late);
        assert_eq!(PresenceStatus::Late.to_string(), "LATE");
        assert!("maybe".parse::<PresenceStatus>().is_err());
    }

    #[test]
    fn schedule_decodes_with_nullable_times() {
        let body = r#"{
            "scheduleId": 4,
            "employeeFirstName": "Nadia",
            "employeeLastName": "B",
            "scheduleName": "Morning shift",
            "date": "2025-03-10",
            "checkinTime": "09:00:00",
            "checkoutTime": "17:00:00",
            "breakStartTime": null,
            "breakEndTime": null,
            "isDayOff": false
        }"#;
        let s: Schedule = serde_json::from_str(body).unwrap();
        assert_eq!(s.schedule_id, 4);
        assert!(s.break_start_time.is_none());
        assert_eq!(s.is_day_off, Some(false));
    }

    #[test]
    fn company_profile_maps_entreprise_keys() {
        let body = r#"{
            "entrepriseCameraCode": "c0de",
            "managerDetails": {
                "userId": 1, "userFirstName": "A", "userLastName": "B",
                "userEmail": "a@b.c", "userPhone": null, "userUsername": "ab"
            },
            "entrepriseInfo": {
                "entrepriseName": "Acme", "entrepriseAddress": null,
                "entrepriseWebsite": null, "entreprisePhone": null,
                "entrepriseEmail": null, "entrepriseSector": "retail"
            },
            "managerSettings": {"absenceThresholdMinutes": 60, "lateThresholdMinutes": 15}
        }"#;
        let p: CompanyProfile = serde_json::from_str(body).unwrap();
        assert_eq!(p.company_info.name, "Acme");
        assert_eq!(p.manager_settings.late_threshold_minutes, 15);
    }
}
