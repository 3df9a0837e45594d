//! Manager-side attendance records.

use crate::gateway::Gateway;
use crate::iso_date;
use chrono::NaiveDate;
use pointage_core::{AttendanceRecord, ClientResult, PresenceStatus};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate {
    presence_status: PresenceStatus,
}

pub struct AttendanceApi {
    gw: Arc<Gateway>,
}

impl AttendanceApi {
    pub fn new(gw: Arc<Gateway>) -> Self {
        Self { gw }
    }

    /// One employee's record for a given day. 204 means nothing recorded.
    pub async fn of_employee(
        &self,
        employee_id: i32,
        date: NaiveDate,
    ) -> ClientResult<Option<AttendanceRecord>> {
        self.gw
            .get_optional_json(
                &format!("presence/employee/{employee_id}"),
                &[("date", iso_date(date))],
            )
            .await
    }

    pub async fn records(&self, date: NaiveDate) -> ClientResult<Vec<AttendanceRecord>> {
        self.gw
            .get_json("presence/employees", &[("date", iso_date(date))])
            .await
    }

    /// Override an employee's status for a day (manual correction).
    pub async fn update_status(
        &self,
        employee_id: i32,
        date: NaiveDate,
        status: PresenceStatus,
    ) -> ClientResult<AttendanceRecord> {
        self.gw
            .put_json(
                &format!("presence/updatePresence/{employee_id}"),
                &[("date", iso_date(date))],
                &StatusUpdate {
                    presence_status: status,
                },
            )
            .await
    }
}
