//! Company profile, manager settings, and the manager dashboard.

use crate::gateway::Gateway;
use pointage_core::{
    ClientResult, CompanyInfo, CompanyProfile, DashboardStats, Feedback, ManagerSettings,
};
use std::sync::Arc;

pub struct CompanyApi {
    gw: Arc<Gateway>,
}

impl CompanyApi {
    pub fn new(gw: Arc<Gateway>) -> Self {
        Self { gw }
    }

    /// Company + manager bundle, including the kiosk camera code.
    pub async fn profile(&self) -> ClientResult<CompanyProfile> {
        self.gw
            .get_json("manager/managerAndEntrepriseDetails", &[])
            .await
    }

    pub async fn update_company(&self, info: &CompanyInfo) -> ClientResult<Feedback> {
        self.gw.put_json("manager/updateEntreprise", &[], info).await
    }

    /// Lateness/absence thresholds used by the server-side status
    /// computation.
    pub async fn update_settings(&self, settings: &ManagerSettings) -> ClientResult<Feedback> {
        self.gw.put_json("manager/updateSettings", &[], settings).await
    }

    pub async fn dashboard_stats(&self) -> ClientResult<DashboardStats> {
        self.gw
            .get_json("manager/dashboard/getDashboardTopStats", &[])
            .await
    }
}
