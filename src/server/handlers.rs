//! Request handlers
//!
//! Thin glue between HTTP and the repository/notifier pair. The only rule
//! that matters for correctness lives in `vote`: broadcast after the
//! repository has committed and released its lock, exactly once per
//! successful vote.

use std::collections::HashSet;
use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use chrono::{Duration, Utc};
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};

use super::state::AppState;
use super::view::PollView;
use crate::error::{Error, Result};
use crate::poll::{generate_id, Poll, PollDraft, PollOption};

/// Body of a create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePollRequest {
    /// The question to ask
    pub question: String,
    /// Option texts in display order
    pub options: Vec<String>,
    /// Close voting after this many hours
    #[serde(default)]
    pub expires_in_hours: Option<u32>,
}

/// Body of a vote request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    /// Option being voted for
    pub option_id: String,
}

/// `GET /api/polls`
pub async fn list_polls(State(state): State<AppState>) -> Json<Vec<PollView>> {
    let polls = state.repository.list().await;
    Json(polls.iter().map(PollView::from).collect())
}

/// `GET /api/polls/{id}`
pub async fn get_poll(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PollView>> {
    match state.repository.get(&id).await {
        Some(poll) => Ok(Json(PollView::from(poll))),
        None => Err(Error::NotFound(id)),
    }
}

/// `POST /api/polls`
pub async fn create_poll(
    State(state): State<AppState>,
    Json(request): Json<CreatePollRequest>,
) -> Result<(StatusCode, Json<PollView>)> {
    let draft = build_draft(&state, request)?;
    let poll = state.repository.create(draft).await;

    Ok((StatusCode::CREATED, Json(PollView::from(poll))))
}

/// `DELETE /api/polls/{id}`
///
/// Open event streams for the poll end once the record is gone.
pub async fn delete_poll(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    if state.repository.delete(&id).await {
        state.notifier.close(&id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound(id))
    }
}

/// `POST /api/polls/{id}/vote`
pub async fn vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<Poll>> {
    let option_id = request.option_id;
    if option_id.trim().is_empty() {
        return Err(Error::InvalidRequest("option is required".into()));
    }

    let poll = state.repository.vote(&id, &option_id).await?;

    let payload = serde_json::to_vec(&poll)?;
    let outcome = state.notifier.broadcast(&id, payload);

    tracing::debug!(
        poll = %id,
        option = %option_id,
        listeners = outcome.delivered,
        "Vote broadcast"
    );

    Ok(Json(poll))
}

/// `GET /events/{id}`
///
/// Streams the current snapshot, then one event per broadcast. The
/// subscription lives inside the stream, so it is unregistered as soon as
/// axum drops the response body (client gone) or the server shuts down.
pub async fn events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    // Subscribe before reading so no vote can slip in between
    let subscription = state.notifier.subscribe(&id);

    let poll = state
        .repository
        .get(&id)
        .await
        .ok_or_else(|| Error::NotFound(id.clone()))?;
    let initial = serde_json::to_string(&poll)?;

    let first = stream::once(async move { Ok::<_, Infallible>(Event::default().data(initial)) });

    let updates = stream::unfold(subscription, |mut subscription| async move {
        let payload = subscription.recv().await?;
        let event = Event::default().data(String::from_utf8_lossy(&payload));
        Some((Ok::<_, Infallible>(event), subscription))
    });

    let stream = first.chain(updates).take_until(state.shutdown_signal());

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(state.config.keep_alive_interval)
            .text("keep-alive"),
    ))
}

/// Validate a create request and turn it into a draft
fn build_draft(state: &AppState, request: CreatePollRequest) -> Result<PollDraft> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(Error::InvalidRequest("question is required".into()));
    }
    if question.chars().count() > state.config.max_question_len {
        return Err(Error::InvalidRequest(format!(
            "question is longer than {} characters",
            state.config.max_question_len
        )));
    }

    let texts: Vec<&str> = request
        .options
        .iter()
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect();

    if texts.len() < 2 {
        return Err(Error::InvalidRequest("at least 2 options are required".into()));
    }
    if texts.len() > state.config.max_options {
        return Err(Error::InvalidRequest(format!(
            "at most {} options are allowed",
            state.config.max_options
        )));
    }

    let mut seen = HashSet::with_capacity(texts.len());
    let options: Vec<PollOption> = texts
        .into_iter()
        .map(|text| {
            let id = loop {
                let id = generate_id();
                if seen.insert(id.clone()) {
                    break id;
                }
            };
            PollOption::new(id, text)
        })
        .collect();

    let mut draft = PollDraft::new(question, options);

    match request.expires_in_hours {
        Some(0) => {
            return Err(Error::InvalidRequest("expiry must be at least 1 hour".into()));
        }
        Some(hours) => {
            draft = draft.expires_at(Utc::now() + Duration::hours(i64::from(hours)));
        }
        None => {}
    }

    Ok(draft)
}
