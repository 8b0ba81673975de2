//! UI routes
//!
//! The page is rendered on the server from the controller's screen. Every
//! action is a plain form POST answered with `303 See Other` back to `/`.
//! Relay calls are only begun before redirecting; the page polls while the
//! reply is pending.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, Json, Redirect},
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};

use crate::catalog::FilterState;
use crate::core::Session;
use crate::views::page::{self, PageContext};
use crate::views::Direction;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
    pub categories: Arc<Vec<String>>,
    pub direction: Direction,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let (screen, filter) = state.session.snapshot().await;

    Html(page::render(&PageContext {
        screen: &screen,
        filter: &filter,
        categories: &state.categories,
        direction: state.direction,
    }))
}

async fn filter(State(state): State<AppState>, Form(form): Form<FilterForm>) -> Redirect {
    state
        .session
        .set_filter(FilterState::new(form.category, form.search))
        .await;
    Redirect::to("/")
}

async fn select(State(state): State<AppState>, Path(segment): Path<String>) -> Redirect {
    let id = state.session.resolve_id(&segment).await;
    let selected = state.session.toggle(id).await;
    tracing::debug!("Product {} selected={}", segment, selected);
    Redirect::to("/")
}

async fn details(State(state): State<AppState>, Path(segment): Path<String>) -> Redirect {
    let id = state.session.resolve_id(&segment).await;
    state.session.toggle_details(id).await;
    Redirect::to("/")
}

async fn remove(State(state): State<AppState>, Path(segment): Path<String>) -> Redirect {
    let id = state.session.resolve_id(&segment).await;
    state.session.remove(&id).await;
    Redirect::to("/")
}

async fn clear(State(state): State<AppState>) -> Redirect {
    state.session.clear().await;
    Redirect::to("/")
}

async fn routine(State(state): State<AppState>) -> Redirect {
    if let Err(refusal) = state.session.spawn_routine().await {
        tracing::debug!("Routine not requested: {}", refusal);
    }
    Redirect::to("/")
}

async fn chat(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Redirect {
    if let Err(refusal) = state.session.spawn_question(&form.message).await {
        tracing::debug!("Question not sent: {}", refusal);
    }
    Redirect::to("/")
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/filter", post(filter))
        .route("/products/:id/select", post(select))
        .route("/products/:id/details", post(details))
        .route("/selection/clear", post(clear))
        .route("/selection/:id/remove", post(remove))
        .route("/routine", post(routine))
        .route("/chat", post(chat))
}
