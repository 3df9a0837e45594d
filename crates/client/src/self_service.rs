//! Employee-facing self-service: own profile, schedule, attendance, and
//! biometric enrollment.

use crate::gateway::Gateway;
use crate::iso_date;
use chrono::NaiveDate;
use pointage_core::{
    AttendanceRecord, ClientResult, Employee, EmployeeDashboard, Feedback, Schedule,
};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;

pub struct SelfServiceApi {
    gw: Arc<Gateway>,
}

impl SelfServiceApi {
    pub fn new(gw: Arc<Gateway>) -> Self {
        Self { gw }
    }

    pub async fn info(&self) -> ClientResult<Employee> {
        self.gw.get_json("employeeSelf/details", &[]).await
    }

    pub async fn dashboard(&self) -> ClientResult<EmployeeDashboard> {
        self.gw.get_json("employeeSelf/getDashboard", &[]).await
    }

    /// Own schedule for a day. 204 means no schedule.
    pub async fn schedule(&self, date: NaiveDate) -> ClientResult<Option<Schedule>> {
        self.gw
            .get_optional_json("employeeSelf/schedule", &[("date", iso_date(date))])
            .await
    }

    /// Own attendance for a day. 204 means nothing recorded.
    pub async fn attendance(&self, date: NaiveDate) -> ClientResult<Option<AttendanceRecord>> {
        self.gw
            .get_optional_json("employeeSelf/presence", &[("date", iso_date(date))])
            .await
    }

    /// Enroll the face image used by kiosk check-in. Multipart: an
    /// `employeeId` field plus the binary `file` part, auth header only.
    pub async fn register_face(
        &self,
        employee_id: i32,
        file_name: &str,
        image: Vec<u8>,
    ) -> ClientResult<Feedback> {
        let form = Form::new()
            .text("employeeId", employee_id.to_string())
            .part("file", Part::bytes(image).file_name(file_name.to_owned()));
        self.gw.post_multipart("employeeSelf/registerFace", form).await
    }
}
