//! Select-Next and Submit-Attempt handlers, one pair per item type. The
//! four pairs share one implementation; only the [`ItemKind`] differs.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::bandit::{AttemptInput, AttemptOutcome, ItemKind};
use crate::response::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectResponse {
    success: bool,
    item_id: String,
    display_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_letters: Option<Vec<char>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRequest {
    item_id: Option<String>,
    expected: Option<String>,
    /// Pre-made transcript; when absent the audio payload is transcribed.
    transcript: Option<String>,
    audio_base64: Option<String>,
    audio_mime_type: Option<String>,
    response_time_ms: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResponse {
    success: bool,
    item_id: String,
    correct: bool,
    score: i32,
    reward: f64,
    avg_reward: f64,
    pulls: i64,
    problem_letters: Vec<char>,
    transcript: String,
    message: String,
}

pub async fn letters_next(
    state: State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SelectResponse>, AppError> {
    select_next(state.0, &headers, ItemKind::Letter).await
}

pub async fn letters_attempt(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<AttemptRequest>,
) -> Result<Json<AttemptResponse>, AppError> {
    submit_attempt(state.0, &headers, ItemKind::Letter, body.0).await
}

pub async fn two_letter_words_next(
    state: State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SelectResponse>, AppError> {
    select_next(state.0, &headers, ItemKind::TwoLetterWord).await
}

pub async fn two_letter_words_attempt(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<AttemptRequest>,
) -> Result<Json<AttemptResponse>, AppError> {
    submit_attempt(state.0, &headers, ItemKind::TwoLetterWord, body.0).await
}

pub async fn words_next(
    state: State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SelectResponse>, AppError> {
    select_next(state.0, &headers, ItemKind::Word).await
}

pub async fn words_attempt(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<AttemptRequest>,
) -> Result<Json<AttemptResponse>, AppError> {
    submit_attempt(state.0, &headers, ItemKind::Word, body.0).await
}

pub async fn sentences_next(
    state: State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SelectResponse>, AppError> {
    select_next(state.0, &headers, ItemKind::Sentence).await
}

pub async fn sentences_attempt(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<AttemptRequest>,
) -> Result<Json<AttemptResponse>, AppError> {
    submit_attempt(state.0, &headers, ItemKind::Sentence, body.0).await
}

async fn select_next(
    state: AppState,
    headers: &HeaderMap,
    kind: ItemKind,
) -> Result<Json<SelectResponse>, AppError> {
    let learner = auth::learner_from_headers(headers)?;
    let selection = state.scheduler().select_next(&learner.id, kind).await?;

    Ok(Json(SelectResponse {
        success: true,
        item_id: selection.item_id,
        display_text: selection.display_text,
        target_letters: selection.target_letters,
    }))
}

async fn submit_attempt(
    state: AppState,
    headers: &HeaderMap,
    kind: ItemKind,
    body: AttemptRequest,
) -> Result<Json<AttemptResponse>, AppError> {
    let learner = auth::learner_from_headers(headers)?;

    let item_id = body
        .item_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("itemId is required"))?
        .to_string();

    // Letter attempts carry no separate expected text; the item is the
    // expectation.
    let expected = match body.expected.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(expected) => expected.to_string(),
        None if kind == ItemKind::Letter => item_id.clone(),
        None => return Err(AppError::validation("expected text is required")),
    };

    let transcript = match body.transcript.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(transcript) => transcript.to_string(),
        None => {
            let audio_base64 = body
                .audio_base64
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| AppError::validation("transcript or audioBase64 is required"))?;
            let audio = base64::engine::general_purpose::STANDARD
                .decode(audio_base64.trim())
                .map_err(|_| AppError::validation("audioBase64 is not valid base64"))?;
            let mime_type = body
                .audio_mime_type
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(default_mime_type(kind));

            state.transcriber().transcribe(&audio, mime_type, kind).await?
        }
    };

    let outcome = state
        .scheduler()
        .submit_attempt(
            &learner.id,
            kind,
            AttemptInput {
                item_id: item_id.clone(),
                expected: expected.clone(),
                transcript,
                response_time_ms: body.response_time_ms,
            },
        )
        .await?;

    let message = attempt_message(kind, &expected, &outcome);

    Ok(Json(AttemptResponse {
        success: true,
        item_id,
        correct: outcome.correct,
        score: outcome.score,
        reward: outcome.reward,
        avg_reward: outcome.avg_reward,
        pulls: outcome.pulls,
        problem_letters: outcome.problem_letters,
        transcript: outcome.transcript,
        message,
    }))
}

fn default_mime_type(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Letter | ItemKind::TwoLetterWord => "audio/wav",
        ItemKind::Word | ItemKind::Sentence => "audio/webm",
    }
}

fn attempt_message(kind: ItemKind, expected: &str, outcome: &AttemptOutcome) -> String {
    match kind {
        ItemKind::Letter => {
            if outcome.correct {
                "Correct!".to_string()
            } else {
                "Try again".to_string()
            }
        }
        ItemKind::TwoLetterWord => {
            if outcome.correct {
                format!("Great! \"{expected}\" is correct!")
            } else {
                format!(
                    "Not quite. Expected \"{expected}\", heard \"{}\"",
                    outcome.transcript
                )
            }
        }
        ItemKind::Word | ItemKind::Sentence => {
            if outcome.correct {
                "Good job! Keep going.".to_string()
            } else {
                "Nice try! Focus on the highlighted sounds.".to_string()
            }
        }
    }
}
