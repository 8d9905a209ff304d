//! Student ID verification client.
//!
//! Uploads a student ID image to a remote verification service and, when the
//! service confirms it, issues a locally stored API key record.
//!
//! # Architecture
//!
//! - **HTTP Client**: reqwest (multipart upload, bearer auth)
//! - **Storage**: string-keyed client storage (JSON file or in-memory)
//! - **Flow**: `VerificationFlow` drives selection, submission and key issuance
//! - **Presentation**: notifications and navigation go through `Presenter`

pub mod config;
pub mod error;
pub mod flow;
pub mod models;
pub mod services;
pub mod storage;
pub mod view;

pub use config::Config;
pub use error::AppError;
pub use flow::{Notification, Phase, Presenter, Route, VerificationFlow, is_logged_in};
pub use models::api_key::ApiKeyRecord;
pub use models::upload::UploadedFile;
pub use services::verification_service::VerificationClient;
pub use storage::{ClientStorage, FileStorage, MemoryStorage};
pub use view::View;
