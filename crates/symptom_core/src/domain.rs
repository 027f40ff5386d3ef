//! crates/symptom_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};

/// The kind of payload a user submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Text,
    Photo,
    Voice,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Text => "text",
            SubmissionKind::Photo => "photo",
            SubmissionKind::Voice => "voice",
        }
    }

    /// Parses the wire form (`text`, `photo`, `voice`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(SubmissionKind::Text),
            "photo" => Some(SubmissionKind::Photo),
            "voice" => Some(SubmissionKind::Voice),
            _ => None,
        }
    }
}

/// How quickly the user should act on the assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(UrgencyLevel::Low),
            "medium" => Some(UrgencyLevel::Medium),
            "high" => Some(UrgencyLevel::High),
            _ => None,
        }
    }
}

// Represents a registered user - used throughout the app.
// The password hash is an opaque value to everything but the auth handlers.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// One user-provided symptom payload: raw text, a transcribed voice
/// recording, or a base64 data URL for an uploaded photo.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: i64,
    /// Client-chosen opaque grouping key; not an authenticated identity.
    pub session_id: String,
    pub kind: SubmissionKind,
    pub content: String,
    /// Present only for file-based submissions.
    pub original_filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The structured result of analyzing exactly one submission.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub id: i64,
    pub submission_id: i64,
    pub analysis: String,
    pub urgency_level: UrgencyLevel,
    pub possible_causes: Vec<String>,
    pub health_tips: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The outcome of one external analysis call, before it is persisted.
#[derive(Debug, Clone)]
pub struct HealthAssessment {
    pub analysis: String,
    pub urgency_level: UrgencyLevel,
    pub possible_causes: Vec<String>,
    pub health_tips: Vec<String>,
    pub seek_immediate_care: bool,
}

// Represents a browser login session (auth cookie).
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_kind_round_trips_wire_values() {
        for kind in [SubmissionKind::Text, SubmissionKind::Photo, SubmissionKind::Voice] {
            assert_eq!(SubmissionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(SubmissionKind::parse("video"), None);
    }

    #[test]
    fn urgency_level_round_trips_wire_values() {
        for level in [UrgencyLevel::Low, UrgencyLevel::Medium, UrgencyLevel::High] {
            assert_eq!(UrgencyLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(UrgencyLevel::parse("critical"), None);
    }
}
