mod config;
mod reply;
mod settings_store;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use companion_core::{FeedbackReply, StudentProfile};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::settings_store::SettingsStore;

#[derive(Clone)]
struct AppState {
    settings: Arc<SettingsStore>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRequest {
    teacher_text: String,
    slide_index: usize,
    slide_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlideChangeEvent {
    slide_index: usize,
    slide_url: String,
}

#[derive(Debug, Serialize)]
struct SettingsResponse {
    message: String,
    settings: StudentProfile,
}

/// Generates a student-like reply for the teacher's question, shaped by the
/// stored profile. A missing or unreadable settings file falls back to the
/// default profile rather than failing the turn.
async fn post_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Json<FeedbackReply> {
    let profile = match state.settings.load().await {
        Ok(Some(profile)) => profile,
        Ok(None) => StudentProfile::default(),
        Err(e) => {
            tracing::warn!("failed to load settings: {e:?}; using the default profile");
            StudentProfile::default()
        }
    };

    info!(
        "feedback turn for slide {} ({})",
        request.slide_index, request.slide_url
    );
    let feedback = reply::student_reply(&profile, &request.teacher_text, request.slide_index);
    Json(FeedbackReply {
        student_feedback: Some(feedback),
    })
}

/// Receives the viewer's best-effort slide-change events. Nothing to do
/// with them yet beyond recording the transition.
async fn post_slide_change(Json(event): Json<SlideChangeEvent>) -> StatusCode {
    info!(
        "viewer moved to slide {} ({})",
        event.slide_index, event.slide_url
    );
    StatusCode::NO_CONTENT
}

async fn post_settings(
    State(state): State<AppState>,
    Json(profile): Json<StudentProfile>,
) -> Result<Json<SettingsResponse>, StatusCode> {
    if let Err(e) = state.settings.save(&profile).await {
        tracing::error!("failed to save settings: {e:?}");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    info!("student profile updated: {profile}");
    Ok(Json(SettingsResponse {
        message: "Settings saved successfully".to_string(),
        settings: profile,
    }))
}

async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<Option<StudentProfile>>, StatusCode> {
    match state.settings.load().await {
        Ok(profile) => Ok(Json(profile)),
        Err(e) => {
            tracing::error!("failed to read settings: {e:?}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn app(state: AppState) -> Router {
    // Permissive CORS so a separately served frontend can reach the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/feedback", post(post_feedback))
        .route("/api/slide-change", post(post_slide_change))
        .route("/api/settings", post(post_settings).get(get_settings))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Initialize the tracing subscriber for logging.
    tracing_subscriber::fmt::init();

    let state = AppState {
        settings: Arc::new(SettingsStore::new(config.settings_file.clone())),
    };
    let app = app(state);

    info!("Starting companion API, listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use companion_core::profile::{ExplanationStyle, StudentPersona};

    fn state_in(dir: &tempfile::TempDir) -> AppState {
        AppState {
            settings: Arc::new(SettingsStore::new(dir.path().join("settings.json"))),
        }
    }

    #[tokio::test]
    async fn feedback_uses_the_stored_profile() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        state
            .settings
            .save(&StudentProfile {
                student_persona: StudentPersona::Confident,
                explanation_style: ExplanationStyle::Examples,
                ..StudentProfile::default()
            })
            .await
            .unwrap();

        let Json(reply) = post_feedback(
            State(state),
            Json(FeedbackRequest {
                teacher_text: "mitochondria make energy".to_string(),
                slide_index: 1,
                slide_url: "https://bucket/slide_001.png".to_string(),
            }),
        )
        .await;

        let text = reply.student_feedback.unwrap();
        assert!(text.starts_with("I think I get it. On slide 2"));
        assert!(text.contains("Could you give an example"));
    }

    #[tokio::test]
    async fn feedback_falls_back_to_the_default_profile() {
        let dir = tempfile::tempdir().unwrap();

        let Json(reply) = post_feedback(
            State(state_in(&dir)),
            Json(FeedbackRequest {
                teacher_text: "hello".to_string(),
                slide_index: 0,
                slide_url: "https://bucket/slide_000.png".to_string(),
            }),
        )
        .await;

        assert!(
            reply
                .student_feedback
                .unwrap()
                .starts_with("I'm curious about this part.")
        );
    }

    #[tokio::test]
    async fn settings_round_trip_through_the_handlers() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);

        let profile = StudentProfile {
            student_persona: StudentPersona::Distracted,
            ..StudentProfile::default()
        };
        let saved = post_settings(State(state.clone()), Json(profile)).await.unwrap();
        assert_eq!(saved.0.settings, profile);

        let loaded = get_settings(State(state)).await.unwrap();
        assert_eq!(loaded.0, Some(profile));
    }

    #[tokio::test]
    async fn slide_change_is_acknowledged_without_content() {
        let status = post_slide_change(Json(SlideChangeEvent {
            slide_index: 2,
            slide_url: "https://bucket/slide_002.png".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
