pub mod analysis_llm;
pub mod store;
pub mod transcribe;

pub use analysis_llm::OpenAiAnalysisAdapter;
pub use store::MemStore;
pub use transcribe::OpenAiTranscriptionAdapter;
