//! Manager-side shift schedule operations.

use crate::gateway::Gateway;
use crate::iso_date;
use chrono::NaiveDate;
use pointage_core::{ClientResult, Feedback, NewSchedule, Schedule};
use serde::Serialize;
use std::sync::Arc;

/// Assignment body: one schedule applied to several employees at once.
#[derive(Serialize)]
struct ScheduleAssignment<'a> {
    employees_ids: &'a [i32],
    schedule: &'a NewSchedule,
}

pub struct SchedulesApi {
    gw: Arc<Gateway>,
}

impl SchedulesApi {
    pub fn new(gw: Arc<Gateway>) -> Self {
        Self { gw }
    }

    /// One employee's schedule for a given day. 204 means no schedule.
    pub async fn for_employee(
        &self,
        employee_id: i32,
        date: NaiveDate,
    ) -> ClientResult<Option<Schedule>> {
        self.gw
            .get_optional_json(
                &format!("schedule/showSchedule/{employee_id}"),
                &[("date", iso_date(date))],
            )
            .await
    }

    pub async fn for_all(&self, date: NaiveDate) -> ClientResult<Vec<Schedule>> {
        self.gw
            .get_json("schedule/showAllSchedules", &[("date", iso_date(date))])
            .await
    }

    /// Assign a schedule to the given employees. Success is strictly
    /// HTTP 201; the feedback message names any employees that failed.
    pub async fn add(
        &self,
        employee_ids: &[i32],
        schedule: &NewSchedule,
    ) -> ClientResult<Feedback> {
        let body = ScheduleAssignment {
            employees_ids: employee_ids,
            schedule,
        };
        self.gw.post_json_created("schedule/addSchedule", &body).await
    }
}
