pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

// Re-export the handlers the server binary wires into the router.
pub use middleware::require_auth;
pub use rest::{
    get_analysis_handler, get_session_history_handler, submit_audio_handler,
    submit_image_handler, submit_text_handler,
};
