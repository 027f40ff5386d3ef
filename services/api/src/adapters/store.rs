//! services/api/src/adapters/store.rs
//!
//! This module contains the in-memory store adapter, the concrete
//! implementation of the `StorageService` port from the `core` crate.
//! Nothing survives a restart: the store is process-wide state, initialized
//! empty at startup and discarded at shutdown. A durable backend would
//! implement the same port against a real database.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use symptom_core::domain::{
    Analysis, AuthSession, HealthAssessment, Submission, SubmissionKind, User,
};
use symptom_core::ports::{PortError, PortResult, StorageService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An in-memory store that implements the `StorageService` port.
///
/// One mutex guards all tables and id counters, so every check-then-insert
/// (username uniqueness, one-analysis-per-submission) is atomic with respect
/// to concurrent request handlers. The lock is never held across an `.await`.
/// Tables are `BTreeMap`s keyed by the monotonically assigned id, which makes
/// iteration order identical to creation order.
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    submissions: BTreeMap<i64, Submission>,
    analyses: BTreeMap<i64, Analysis>,
    auth_sessions: HashMap<String, AuthSession>,
    next_user_id: i64,
    next_submission_id: i64,
    next_analysis_id: i64,
}

impl MemStore {
    /// Creates an empty store. Construct once at startup and share via
    /// `Arc<dyn StorageService>`; tests build their own isolated instances.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_user_id: 1,
                next_submission_id: 1,
                next_analysis_id: 1,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> PortResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| PortError::Unexpected("store mutex poisoned".to_string()))
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================================
// `StorageService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StorageService for MemStore {
    async fn get_user(&self, id: i64) -> PortResult<Option<User>> {
        let inner = self.lock()?;
        Ok(inner.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<Option<User>> {
        let inner = self.lock()?;
        Ok(inner
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<User> {
        let mut inner = self.lock()?;
        if inner.users.values().any(|user| user.username == username) {
            return Err(PortError::Conflict(format!(
                "Username '{}' is already taken",
                username
            )));
        }
        let id = inner.next_user_id;
        inner.next_user_id += 1;
        let user = User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut inner = self.lock()?;
        inner.auth_sessions.insert(
            session_id.to_string(),
            AuthSession {
                id: session_id.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<i64> {
        let mut inner = self.lock()?;
        let session = inner
            .auth_sessions
            .get(session_id)
            .map(|s| (s.user_id, s.expires_at));
        match session {
            Some((user_id, expires_at)) if expires_at > Utc::now() => Ok(user_id),
            Some(_) => {
                // Expired sessions are removed on sight.
                inner.auth_sessions.remove(session_id);
                Err(PortError::Unauthorized)
            }
            None => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        let mut inner = self.lock()?;
        inner.auth_sessions.remove(session_id);
        Ok(())
    }

    async fn create_submission(
        &self,
        session_id: &str,
        kind: SubmissionKind,
        content: &str,
        original_filename: Option<&str>,
    ) -> PortResult<Submission> {
        let mut inner = self.lock()?;
        let id = inner.next_submission_id;
        inner.next_submission_id += 1;
        let submission = Submission {
            id,
            session_id: session_id.to_string(),
            kind,
            content: content.to_string(),
            original_filename: original_filename.map(str::to_string),
            created_at: Utc::now(),
        };
        inner.submissions.insert(id, submission.clone());
        Ok(submission)
    }

    async fn get_submission(&self, id: i64) -> PortResult<Option<Submission>> {
        let inner = self.lock()?;
        Ok(inner.submissions.get(&id).cloned())
    }

    async fn get_submissions_by_session(&self, session_id: &str) -> PortResult<Vec<Submission>> {
        let inner = self.lock()?;
        // BTreeMap iterates in id order, which is creation order.
        Ok(inner
            .submissions
            .values()
            .filter(|submission| submission.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn create_analysis(
        &self,
        submission_id: i64,
        assessment: &HealthAssessment,
    ) -> PortResult<Analysis> {
        let mut inner = self.lock()?;
        if !inner.submissions.contains_key(&submission_id) {
            return Err(PortError::NotFound(format!(
                "Submission {} not found",
                submission_id
            )));
        }
        if inner
            .analyses
            .values()
            .any(|analysis| analysis.submission_id == submission_id)
        {
            return Err(PortError::Conflict(format!(
                "Submission {} already has an analysis",
                submission_id
            )));
        }
        let id = inner.next_analysis_id;
        inner.next_analysis_id += 1;
        let analysis = Analysis {
            id,
            submission_id,
            analysis: assessment.analysis.clone(),
            urgency_level: assessment.urgency_level,
            possible_causes: assessment.possible_causes.clone(),
            health_tips: assessment.health_tips.clone(),
            created_at: Utc::now(),
        };
        inner.analyses.insert(id, analysis.clone());
        Ok(analysis)
    }

    async fn get_analysis_by_submission(
        &self,
        submission_id: i64,
    ) -> PortResult<Option<Analysis>> {
        let inner = self.lock()?;
        Ok(inner
            .analyses
            .values()
            .find(|analysis| analysis.submission_id == submission_id)
            .cloned())
    }
}
