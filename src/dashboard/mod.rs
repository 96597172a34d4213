//! HTTP surface of the dashboard: the HTML page, its static assets and a
//! small JSON API over the same data.

mod view;

pub use view::{escape_html, render_index, IndexView};

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::agenda::{parse_filter_id, NewAgendaItem};
use crate::database::pool_statistics;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const STYLE_CSS: &str = include_str!("../../res/css/style.css");
const SCRIPT_JS: &str = include_str!("../../res/js/script.js");

/// File name of the avatar inside `server.static_dir`
pub const AVATAR_FILE: &str = "boss-baby.png";

/// Number of upcoming agenda items on the index page
const UPCOMING_LIMIT: i64 = 10;

#[derive(Deserialize)]
pub struct AgendaParams {
    pub id: Option<String>,
}

// ---------- Router Builder ----------
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/style.css", get(style))
        .route("/script.js", get(script))
        .route("/boss-baby.png", get(avatar))
        .route("/health", get(health))
        .route("/api/pregnancy", get(pregnancy))
        .route("/api/agenda", get(list_agenda).post(create_agenda_item))
        .route("/api/agenda/{id}", get(get_agenda_item).delete(delete_agenda_item))
        .route("/api/pool", get(pool))
        .with_state(state)
}

// ---------- Page Handlers ----------
async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let today = state.today();
    let progress = state.pregnancy.progress(today);
    let from = today.and_time(NaiveTime::default());
    let agenda = state.agenda.upcoming(from, UPCOMING_LIMIT).await?;

    Ok(Html(render_index(&IndexView {
        baby: &progress,
        dates: &state.settings.dates,
        agenda: &agenda,
    })))
}

async fn style() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}

async fn avatar(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let path = state.settings.server.static_dir.join(AVATAR_FILE);
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            debug!(path = %path.display(), "avatar not present");
            AppError::NotFound(AVATAR_FILE.to_string())
        } else {
            AppError::IoError(e)
        }
    })?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

async fn health() -> &'static str {
    "ok"
}

// ---------- API Handlers ----------
async fn pregnancy(State(state): State<AppState>) -> Json<Value> {
    let progress = state.pregnancy.progress(state.today());
    Json(json!({"status":"ok","pregnancy":progress}))
}

async fn list_agenda(
    State(state): State<AppState>,
    Query(params): Query<AgendaParams>,
) -> AppResult<Json<Value>> {
    let filter_id = params.id.as_deref().map(parse_filter_id).transpose()?;
    let items = state.agenda.list_items(filter_id).await?;
    Ok(Json(json!({"status":"ok","items":items})))
}

async fn create_agenda_item(
    State(state): State<AppState>,
    Json(req): Json<NewAgendaItem>,
) -> AppResult<Json<Value>> {
    let item = state.agenda.add_item(&req).await?;
    Ok(Json(json!({"status":"ok","item":item})))
}

async fn get_agenda_item(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let id = parse_filter_id(&id)?;
    match state.agenda.get_item(id).await? {
        Some(item) => Ok(Json(json!({"status":"ok","item":item}))),
        None => Err(AppError::NotFound(format!("agenda item {id}"))),
    }
}

async fn delete_agenda_item(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let id = parse_filter_id(&id)?;
    if state.agenda.delete_item(id).await? {
        Ok(Json(json!({"status":"ok","deleted":id})))
    } else {
        Err(AppError::NotFound(format!("agenda item {id}")))
    }
}

async fn pool(State(state): State<AppState>) -> Json<Value> {
    let stats = pool_statistics(state.agenda.pool());
    Json(json!({"status":"ok","pool":stats}))
}
