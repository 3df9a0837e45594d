//! Manager-side employee roster operations.

use crate::gateway::Gateway;
use pointage_core::{ClientResult, Employee, EmployeeDetailed, Feedback, NewEmployee};
use std::sync::Arc;

pub struct EmployeesApi {
    gw: Arc<Gateway>,
}

impl EmployeesApi {
    pub fn new(gw: Arc<Gateway>) -> Self {
        Self { gw }
    }

    pub async fn list(&self) -> ClientResult<Vec<Employee>> {
        self.gw.get_json("manager/employees", &[]).await
    }

    /// Roster with each employee's schedules and attendance history.
    pub async fn list_detailed(&self) -> ClientResult<Vec<EmployeeDetailed>> {
        self.gw.get_json("manager/detailedEmployees", &[]).await
    }

    /// Create an employee account. Success is strictly HTTP 201.
    pub async fn add(&self, employee: &NewEmployee) -> ClientResult<Feedback> {
        self.gw.post_json_created("manager/addEmployee", employee).await
    }

    pub async fn update(&self, employee_id: i32, employee: &NewEmployee) -> ClientResult<Feedback> {
        self.gw
            .put_json(&format!("manager/updateEmployee/{employee_id}"), &[], employee)
            .await
    }

    pub async fn delete(&self, employee_id: i32) -> ClientResult<Feedback> {
        self.gw
            .delete_json(&format!("manager/deleteEmployee/{employee_id}"))
            .await
    }
}
