//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the symptom intake REST endpoints and the
//! master definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use symptom_core::domain::{Analysis, Submission, SubmissionKind};
use symptom_core::ports::PortError;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        submit_text_handler,
        submit_image_handler,
        submit_audio_handler,
        get_analysis_handler,
        get_session_history_handler,
        crate::web::auth::register_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        crate::web::auth::me_handler,
    ),
    components(
        schemas(
            TextSymptomRequest,
            SubmissionPayload,
            AnalysisPayload,
            SymptomResponse,
            SessionEntryPayload,
            crate::web::auth::RegisterRequest,
            crate::web::auth::LoginRequest,
            crate::web::auth::AuthResponse,
        )
    ),
    tags(
        (name = "Symptom Intake API", description = "Endpoints for submitting symptoms and retrieving AI analyses.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextSymptomRequest {
    pub session_id: String,
    pub content: String,
}

/// One stored submission, as it appears on the wire.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub id: i64,
    pub session_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub original_filename: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Submission> for SubmissionPayload {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id,
            session_id: submission.session_id,
            kind: submission.kind.as_str().to_string(),
            content: submission.content,
            original_filename: submission.original_filename,
            created_at: submission.created_at,
        }
    }
}

/// One stored analysis, as it appears on the wire. `seekImmediateCare` and
/// `transcribedText` are only present on submission responses; they are not
/// persisted with the analysis.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub id: i64,
    pub submission_id: i64,
    pub analysis: String,
    pub urgency_level: String,
    pub possible_causes: Vec<String>,
    pub health_tips: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seek_immediate_care: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcribed_text: Option<String>,
}

impl From<Analysis> for AnalysisPayload {
    fn from(analysis: Analysis) -> Self {
        Self {
            id: analysis.id,
            submission_id: analysis.submission_id,
            analysis: analysis.analysis,
            urgency_level: analysis.urgency_level.as_str().to_string(),
            possible_causes: analysis.possible_causes,
            health_tips: analysis.health_tips,
            created_at: analysis.created_at,
            seek_immediate_care: None,
            transcribed_text: None,
        }
    }
}

/// The response payload sent after a successful symptom submission.
#[derive(Serialize, ToSchema)]
pub struct SymptomResponse {
    pub submission: SubmissionPayload,
    pub analysis: AnalysisPayload,
}

/// One entry of a session's history. A submission whose analysis never
/// landed is a valid terminal state, so `analysis` may be null.
#[derive(Serialize, ToSchema)]
pub struct SessionEntryPayload {
    pub submission: SubmissionPayload,
    pub analysis: Option<AnalysisPayload>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Submit symptoms as plain text.
#[utoipa::path(
    post,
    path = "/api/symptoms/text",
    request_body = TextSymptomRequest,
    responses(
        (status = 200, description = "Submission stored and analyzed", body = SymptomResponse),
        (status = 400, description = "Missing session ID or content"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_text_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<TextSymptomRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.session_id.trim().is_empty() || req.content.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Session ID and content are required".to_string(),
        ));
    }

    let submission = app_state
        .store
        .create_submission(&req.session_id, SubmissionKind::Text, &req.content, None)
        .await
        .map_err(internal)?;

    analyze_and_respond(&app_state, submission, None).await
}

/// Submit symptoms as a photo.
///
/// Accepts a multipart/form-data request with a `sessionId` field and an
/// `image` file part. The image is stored and analyzed as a base64 data URL.
#[utoipa::path(
    post,
    path = "/api/symptoms/image",
    request_body(content_type = "multipart/form-data", description = "sessionId field and image file"),
    responses(
        (status = 200, description = "Submission stored and analyzed", body = SymptomResponse),
        (status = 400, description = "Missing session ID or image, or not an image file"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_image_handler(
    State(app_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let upload = read_symptom_upload(multipart, "image", "image/").await?;

    let data_url = format!(
        "data:{};base64,{}",
        upload.content_type,
        base64::engine::general_purpose::STANDARD.encode(&upload.data)
    );

    let submission = app_state
        .store
        .create_submission(
            &upload.session_id,
            SubmissionKind::Photo,
            &data_url,
            Some(&upload.filename),
        )
        .await
        .map_err(internal)?;

    analyze_and_respond(&app_state, submission, None).await
}

/// Submit symptoms as a voice recording.
///
/// Accepts a multipart/form-data request with a `sessionId` field and an
/// `audio` file part. The recording is transcribed first; the transcript is
/// what gets stored and analyzed.
#[utoipa::path(
    post,
    path = "/api/symptoms/audio",
    request_body(content_type = "multipart/form-data", description = "sessionId field and audio file"),
    responses(
        (status = 200, description = "Submission stored and analyzed", body = SymptomResponse),
        (status = 400, description = "Missing session ID or audio, or not an audio file"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_audio_handler(
    State(app_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let upload = read_symptom_upload(multipart, "audio", "audio/").await?;

    let transcribed_text = app_state
        .transcribe_adapter
        .transcribe(&upload.data, &upload.filename)
        .await
        .map_err(|e| {
            error!("Audio transcription error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to transcribe audio. Please try again.".to_string(),
            )
        })?;

    let submission = app_state
        .store
        .create_submission(
            &upload.session_id,
            SubmissionKind::Voice,
            &transcribed_text,
            Some(&upload.filename),
        )
        .await
        .map_err(internal)?;

    analyze_and_respond(&app_state, submission, Some(transcribed_text)).await
}

/// Fetch the analysis for one submission.
#[utoipa::path(
    get,
    path = "/api/analysis/{submissionId}",
    responses(
        (status = 200, description = "The stored analysis", body = AnalysisPayload),
        (status = 404, description = "No analysis for this submission"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("submissionId" = i64, Path, description = "The submission to look up.")
    )
)]
pub async fn get_analysis_handler(
    State(app_state): State<Arc<AppState>>,
    Path(submission_id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let analysis = app_state
        .store
        .get_analysis_by_submission(submission_id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Analysis not found".to_string()))?;

    Ok(Json(AnalysisPayload::from(analysis)))
}

/// List a session's submissions with their analyses, in creation order.
#[utoipa::path(
    get,
    path = "/api/session/{sessionId}",
    responses(
        (status = 200, description = "The session's history", body = [SessionEntryPayload]),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("sessionId" = String, Path, description = "The client-chosen session key.")
    )
)]
pub async fn get_session_history_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let submissions = app_state
        .store
        .get_submissions_by_session(&session_id)
        .await
        .map_err(internal)?;

    let mut entries = Vec::with_capacity(submissions.len());
    for submission in submissions {
        let analysis = app_state
            .store
            .get_analysis_by_submission(submission.id)
            .await
            .map_err(internal)?;
        entries.push(SessionEntryPayload {
            submission: submission.into(),
            analysis: analysis.map(AnalysisPayload::from),
        });
    }

    Ok(Json(entries))
}

//=========================================================================================
// Helpers
//=========================================================================================

struct SymptomUpload {
    session_id: String,
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

/// Pulls the `sessionId` field and the named file part out of a multipart
/// request, rejecting files whose content type is outside `mime_prefix`.
async fn read_symptom_upload(
    mut multipart: Multipart,
    file_field: &str,
    mime_prefix: &str,
) -> Result<SymptomUpload, (StatusCode, String)> {
    let mut session_id: Option<String> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        match field.name() {
            Some("sessionId") => {
                let value = field.text().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read sessionId: {}", e),
                    )
                })?;
                session_id = Some(value);
            }
            Some(name) if name == file_field => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                if !content_type.starts_with(mime_prefix) {
                    return Err((
                        StatusCode::BAD_REQUEST,
                        format!("Only {}* files are allowed", mime_prefix),
                    ));
                }
                let data = field.bytes().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read file bytes: {}", e),
                    )
                })?;
                file = Some((filename, content_type, data.to_vec()));
            }
            _ => {}
        }
    }

    let session_id = session_id.filter(|s| !s.trim().is_empty()).ok_or((
        StatusCode::BAD_REQUEST,
        format!("Session ID and {} file are required", file_field),
    ))?;
    let (filename, content_type, data) = file.ok_or((
        StatusCode::BAD_REQUEST,
        format!("Session ID and {} file are required", file_field),
    ))?;

    Ok(SymptomUpload {
        session_id,
        filename,
        content_type,
        data,
    })
}

/// Runs the external analysis for a freshly stored submission, persists the
/// result, and assembles the submission response.
async fn analyze_and_respond(
    app_state: &Arc<AppState>,
    submission: Submission,
    transcribed_text: Option<String>,
) -> Result<(StatusCode, Json<SymptomResponse>), (StatusCode, String)> {
    let assessment = app_state
        .analysis_adapter
        .analyze(&submission.content, submission.kind)
        .await
        .map_err(|e| {
            error!("Symptom analysis error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to analyze symptoms. Please try again.".to_string(),
            )
        })?;

    let analysis = app_state
        .store
        .create_analysis(submission.id, &assessment)
        .await
        .map_err(internal)?;

    let mut analysis_payload = AnalysisPayload::from(analysis);
    analysis_payload.seek_immediate_care = Some(assessment.seek_immediate_care);
    analysis_payload.transcribed_text = transcribed_text;

    Ok((
        StatusCode::OK,
        Json(SymptomResponse {
            submission: submission.into(),
            analysis: analysis_payload,
        }),
    ))
}

/// Maps store-level errors onto HTTP responses. Conflicts surface as 409
/// (e.g. a retried request whose analysis already landed); everything else
/// is a 500.
fn internal(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        other => {
            error!("Store error: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}
