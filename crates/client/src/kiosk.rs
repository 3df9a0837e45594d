//! Kiosk device flow: pair with a setup code, fetch the check-in roster,
//! verify faces to mark attendance.
//!
//! Every call here goes through the kiosk-namespace gateway, so the user
//! token is never sent and a 403 redirects to camera setup, not login.

use crate::gateway::Gateway;
use pointage_core::types::{KioskAuthRequest, KioskAuthResponse};
use pointage_core::{ClientResult, Feedback, KioskSetup};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;

pub struct KioskApi {
    gw: Arc<Gateway>,
}

impl KioskApi {
    /// Takes the kiosk-namespace gateway.
    pub fn new(gw: Arc<Gateway>) -> Self {
        Self { gw }
    }

    /// Exchange the company-wide setup code for a device token and
    /// persist it.
    pub async fn authenticate(&self, camera_code: &str) -> ClientResult<String> {
        let request = KioskAuthRequest {
            camera_code: camera_code.to_owned(),
        };
        let resp: KioskAuthResponse = self.gw.post_json_public("kiosk/auth", &request).await?;
        self.gw.store().set_kiosk_session(&resp.token);
        tracing::info!("kiosk paired");
        Ok(resp.token)
    }

    /// Company name plus the employees scheduled soon enough to appear on
    /// the check-in screen.
    pub async fn setup(&self) -> ClientResult<KioskSetup> {
        self.gw.get_json("kiosk/setup", &[]).await
    }

    /// Submit a face image for an employee; the backend marks attendance
    /// when the face matches. Non-matches come back as a 400 with a
    /// message, not as a distinct success shape.
    pub async fn verify_face(
        &self,
        employee_id: i32,
        file_name: &str,
        image: Vec<u8>,
    ) -> ClientResult<Feedback> {
        let form = Form::new()
            .text("employeeId", employee_id.to_string())
            .part("file", Part::bytes(image).file_name(file_name.to_owned()));
        self.gw.post_multipart("kiosk/verifyFace", form).await
    }

    /// Drop the device pairing locally.
    pub fn unpair(&self) {
        self.gw.store().clear_kiosk_session();
    }
}
