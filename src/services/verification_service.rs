//! Client for the remote identity verification endpoint.
//!
//! This module uploads the student ID image as multipart form data and
//! returns the raw outcome. Interpreting success or failure is left to the
//! caller so the lenient body handling stays in one place.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::config::Config;
use crate::error::AppError;
use crate::models::upload::UploadedFile;
use crate::models::verification::VerificationOutcome;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// HTTP client bound to one verification endpoint.
#[derive(Debug, Clone)]
pub struct VerificationClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl VerificationClient {
    /// Build a client from configuration.
    ///
    /// # Timeout
    ///
    /// None unless `REQUEST_TIMEOUT_SECS` is set to a non-zero value; a silent
    /// endpoint then keeps the flow in its verifying phase.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` if the base URL does not parse
    /// - `Transport` if the HTTP client cannot be built
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let endpoint = Url::parse(&config.verification_url())?;

        let mut builder = reqwest::Client::builder();
        // Zero means "no timeout", not "fail immediately"
        if let Some(secs) = config.request_timeout_secs.filter(|&s| s > 0) {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Upload `file` and return the status with the leniently parsed body.
    ///
    /// # Headers Sent
    ///
    /// - `Accept: application/json`
    /// - `Authorization: Bearer <token>`
    /// - `Content-Type` is derived by reqwest so the multipart boundary matches
    ///
    /// # Errors
    ///
    /// `Transport` when no response is received. Any HTTP status, including
    /// 4xx/5xx, is returned as an `Ok` outcome.
    pub async fn verify(
        &self,
        token: &str,
        file: &UploadedFile,
    ) -> Result<VerificationOutcome, AppError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part(FILE_FIELD, part);

        tracing::info!(
            "Uploading {} ({} bytes) to {}",
            file.name,
            file.bytes.len(),
            self.endpoint
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!("Status: {}", status);

        // An unreadable body is treated like an empty one
        let text = response.text().await.unwrap_or_default();
        let outcome = VerificationOutcome::from_raw(status, &text);
        tracing::debug!("Response JSON: {:?}", outcome.body);

        Ok(outcome)
    }
}
