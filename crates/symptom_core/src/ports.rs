//! crates/symptom_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like stores or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Analysis, HealthAssessment, Submission, SubmissionKind, User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., store, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The repository facade composing the user, submission, and analysis stores.
///
/// Point lookups return `Ok(None)` on a miss, never an error; handlers layered
/// above translate absence into protocol-level responses. Creation calls
/// assign the next sequential id and stamp `created_at` at insertion time.
#[async_trait]
pub trait StorageService: Send + Sync {
    // --- User Management ---
    async fn get_user(&self, id: i64) -> PortResult<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> PortResult<Option<User>>;

    /// Creates a user. Fails with [`PortError::Conflict`] when the username
    /// is already taken; the check and the insert happen atomically.
    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<User>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<i64>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Symptom Submissions ---
    /// Creates a submission. An absent `original_filename` is stored as
    /// `None`; `created_at` is stamped at call time.
    async fn create_submission(
        &self,
        session_id: &str,
        kind: SubmissionKind,
        content: &str,
        original_filename: Option<&str>,
    ) -> PortResult<Submission>;

    async fn get_submission(&self, id: i64) -> PortResult<Option<Submission>>;

    /// All submissions sharing a session key, in creation order.
    async fn get_submissions_by_session(&self, session_id: &str) -> PortResult<Vec<Submission>>;

    // --- Symptom Analyses ---
    /// Persists the result of one analysis call. The referenced submission
    /// must exist, and at most one analysis per submission is admitted; a
    /// second insert fails with [`PortError::Conflict`].
    async fn create_analysis(
        &self,
        submission_id: i64,
        assessment: &HealthAssessment,
    ) -> PortResult<Analysis>;

    async fn get_analysis_by_submission(&self, submission_id: i64)
        -> PortResult<Option<Analysis>>;
}

#[async_trait]
pub trait SymptomAnalysisService: Send + Sync {
    /// Produces a structured health assessment for one submission's content.
    /// For photo submissions the content is a base64 data URL.
    async fn analyze(&self, content: &str, kind: SubmissionKind)
        -> PortResult<HealthAssessment>;
}

#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Transcribes an uploaded audio file into text.
    async fn transcribe(&self, audio_data: &[u8], filename: &str) -> PortResult<String>;
}
