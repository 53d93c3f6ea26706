use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{ctx::BaseParams, state::AppState};

use super::handlers;
use super::model::ListNotesQuery;

#[derive(Debug, Deserialize)]
struct NoteIdPath {
    note_id: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/categories", get(categories))
        .route(
            "/notes/{note_id}",
            get(get_note).patch(update_note).delete(delete_note),
        )
        .with_state(state)
}

async fn list_notes(Query(query): Query<ListNotesQuery>, base: BaseParams) -> impl IntoResponse {
    handlers::list_notes(query.normalize(), base).await
}

async fn create_note(base: BaseParams, Json(body): Json<Value>) -> impl IntoResponse {
    handlers::create_note(body, base).await
}

async fn get_note(Path(NoteIdPath { note_id }): Path<NoteIdPath>, base: BaseParams) -> impl IntoResponse {
    handlers::get_note(note_id, base).await
}

async fn update_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    base: BaseParams,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    handlers::update_note(note_id, body, base).await
}

async fn delete_note(Path(NoteIdPath { note_id }): Path<NoteIdPath>, base: BaseParams) -> impl IntoResponse {
    handlers::delete_note(note_id, base).await
}

async fn categories(base: BaseParams) -> impl IntoResponse {
    handlers::categories(base).await
}
