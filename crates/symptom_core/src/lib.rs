pub mod domain;
pub mod ports;

pub use domain::{
    Analysis, AuthSession, HealthAssessment, Submission, SubmissionKind, UrgencyLevel, User,
};
pub use ports::{
    PortError, PortResult, StorageService, SymptomAnalysisService, TranscriptionService,
};
