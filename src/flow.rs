//! Student ID verification flow.
//!
//! The flow reads the auth state once at mount, accepts an image, submits it
//! to the verification service and, on success, issues an API key record
//! into client storage and navigates to the dashboard.
//!
//! # Phases
//!
//! `Idle` → `Verifying` → (`IssuingKey` → `Idle`) on success, or back to
//! `Idle` on failure. `submit` borrows the flow mutably, so one flow never
//! has two submissions in flight.

use crate::error::AppError;
use crate::models::api_key::ApiKeyRecord;
use crate::models::upload::UploadedFile;
use crate::services::verification_service::VerificationClient;
use crate::storage::{API_KEYS_KEY, AUTH_TOKEN_KEY, ClientStorage, IS_VERIFIED_KEY};
use crate::view::View;

/// Text of the success notification.
pub const SUCCESS_MESSAGE: &str = "Identity verified successfully!";

/// Mutually exclusive UI phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Verifying,
    IssuingKey,
}

/// Screens the flow links or navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Dashboard,
    Terms,
    Privacy,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Dashboard => "/dashboard",
            Route::Terms => "/terms",
            Route::Privacy => "/privacy",
        }
    }
}

/// Transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Error(String),
    Success(String),
}

/// Receives the flow's user-visible side effects.
pub trait Presenter {
    fn notify(&mut self, notification: Notification);

    fn navigate(&mut self, route: Route);
}

/// Whether storage holds a non-empty auth token.
///
/// Unreadable storage counts as logged out.
pub fn is_logged_in<S: ClientStorage>(storage: &S) -> bool {
    matches!(storage.get(AUTH_TOKEN_KEY), Ok(Some(token)) if !token.is_empty())
}

/// One verification screen bound to its storage, service client and presenter.
pub struct VerificationFlow<S, P> {
    storage: S,
    client: VerificationClient,
    presenter: P,
    key_name: String,
    logged_in: bool,
    phase: Phase,
    selected: Option<UploadedFile>,
}

impl<S: ClientStorage, P: Presenter> VerificationFlow<S, P> {
    /// Mount the flow, reading the auth state once.
    pub fn mount(
        storage: S,
        client: VerificationClient,
        presenter: P,
        key_name: impl Into<String>,
    ) -> Self {
        let logged_in = is_logged_in(&storage);
        tracing::debug!("Verification flow mounted (logged in: {})", logged_in);

        Self {
            storage,
            client,
            presenter,
            key_name: key_name.into(),
            logged_in,
            phase: Phase::Idle,
            selected: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_file_name(&self) -> Option<&str> {
        self.selected.as_ref().map(|f| f.name.as_str())
    }

    /// What the screen currently shows.
    pub fn view(&self) -> View {
        View::render(self.logged_in, self.phase, self.selected_file_name())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Select the image to submit.
    ///
    /// A file that is not JPEG or PNG is rejected with an error notification
    /// and the previous selection is kept.
    pub fn select_file(&mut self, file: UploadedFile) -> Result<(), AppError> {
        if !file.has_allowed_type() {
            let err = AppError::InvalidFileType(file.content_type);
            tracing::warn!("Rejected file selection: {:?}", err);
            self.presenter.notify(Notification::Error(err.user_message()));
            return Err(err);
        }

        tracing::debug!("Selected {}", file.name);
        self.selected = Some(file);
        Ok(())
    }

    /// Submit the selected image and issue an API key on success.
    ///
    /// # Process
    ///
    /// 1. Require a selected file (consumed here) and an auth token
    /// 2. Upload to the verification service (`Verifying`)
    /// 3. Require a 2xx status with a truthy `success` field
    /// 4. Set `is_verified`, append a new key record (`IssuingKey`)
    /// 5. Notify success and navigate to the dashboard
    ///
    /// Every outcome ends in `Idle` with exactly one notification. Storage is
    /// only written after the service reports success.
    pub async fn submit(&mut self) -> Result<ApiKeyRecord, AppError> {
        let outcome = self.run_submission().await;
        self.phase = Phase::Idle;

        match outcome {
            Ok(record) => {
                tracing::info!(
                    "Identity verified, issued key {} ({})",
                    record.id,
                    record.fingerprint()
                );
                self.presenter
                    .notify(Notification::Success(SUCCESS_MESSAGE.to_string()));
                self.presenter.navigate(Route::Dashboard);
                Ok(record)
            }
            Err(err) => {
                tracing::error!("Verification error: {}", err);
                self.presenter.notify(Notification::Error(err.user_message()));
                Err(err)
            }
        }
    }

    async fn run_submission(&mut self) -> Result<ApiKeyRecord, AppError> {
        if !self.logged_in {
            return Err(AppError::NotLoggedIn);
        }

        let file = self.selected.take().ok_or(AppError::NoFileSelected)?;

        let token = self
            .storage
            .get(AUTH_TOKEN_KEY)?
            .filter(|t| !t.is_empty())
            .ok_or(AppError::NotLoggedIn)?;

        self.phase = Phase::Verifying;
        let outcome = self.client.verify(&token, &file).await?;

        if !outcome.is_success() {
            return Err(AppError::Rejected(outcome.failure_message()));
        }

        self.phase = Phase::IssuingKey;
        self.storage.set(IS_VERIFIED_KEY, "true")?;

        let record = ApiKeyRecord::issue(self.key_name.clone());
        self.storage.append_json(API_KEYS_KEY, &record)?;

        Ok(record)
    }
}
