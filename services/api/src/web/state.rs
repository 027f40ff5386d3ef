//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use symptom_core::ports::{StorageService, SymptomAnalysisService, TranscriptionService};

/// The shared application state, created once at startup and passed to all
/// handlers. Tests construct their own instances with whatever port
/// implementations they need instead of sharing process-wide state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StorageService>,
    pub config: Arc<Config>,
    pub analysis_adapter: Arc<dyn SymptomAnalysisService>,
    pub transcribe_adapter: Arc<dyn TranscriptionService>,
}
