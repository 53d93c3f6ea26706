use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Method;
use serde_json::{json, Value};

use crate::{ctx::BaseParams, session::relay_response, Error, Result};

use super::mock::{mock_note_by_id, mock_notes, MOCK_HEADER};
use super::model::{normalize_note, normalize_page, ListParams, NoteTag};

fn mock_marker() -> (HeaderName, HeaderValue) {
    (HeaderName::from_static(MOCK_HEADER), HeaderValue::from_static("1"))
}

fn mock_response(body: Value) -> Response {
    let mut response = (StatusCode::OK, Json(body)).into_response();
    let (name, value) = mock_marker();
    response.headers_mut().insert(name, value);
    response
}

/// Writes must not carry a tag from outside the closed set.
fn validate_tag(body: &Value) -> Result<()> {
    match body.get("tag") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(raw)) if NoteTag::parse(raw).is_some() => Ok(()),
        Some(other) => Err(Error::Validation(format!("Unknown note tag: {other}"))),
    }
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| Error::Unexpected(err.to_string()))
}

pub async fn list_notes(params: ListParams, base: BaseParams) -> Result<Response> {
    let cookie_header = base.cookie_header();
    let outcome = base
        .upstream
        .send(
            Method::GET,
            "/notes",
            &params.upstream_query(),
            cookie_header.as_deref(),
            None,
        )
        .await
        .and_then(|res| res.ensure_ok());

    match outcome {
        Ok(res) => {
            let page = normalize_page(&res.body, &params);
            Ok(relay_response(StatusCode::OK, &res.set_cookies, to_value(page)?))
        }
        Err(err) => {
            tracing::warn!("notes listing fell back to mock data: {err:?}");
            Ok(mock_response(to_value(mock_notes(&params))?))
        }
    }
}

pub async fn get_note(note_id: String, base: BaseParams) -> Result<Response> {
    let cookie_header = base.cookie_header();
    let outcome = base
        .upstream
        .send(
            Method::GET,
            &format!("/notes/{note_id}"),
            &[],
            cookie_header.as_deref(),
            None,
        )
        .await
        .and_then(|res| res.ensure_ok());

    match outcome {
        Ok(res) => {
            let note = normalize_note(&res.body);
            Ok(relay_response(StatusCode::OK, &res.set_cookies, to_value(note)?))
        }
        Err(err) => {
            tracing::warn!("note {note_id} fell back to mock data: {err:?}");
            match mock_note_by_id(&note_id) {
                Some(note) => Ok(mock_response(to_value(note)?)),
                None => Err(Error::NotFound("Note not found".into())),
            }
        }
    }
}

pub async fn create_note(body: Value, base: BaseParams) -> Result<Response> {
    validate_tag(&body)?;

    let cookie_header = base.cookie_header();
    let res = base
        .upstream
        .send(Method::POST, "/notes", &[], cookie_header.as_deref(), Some(&body))
        .await?
        .ensure_ok()?;

    let note = normalize_note(&res.body);
    Ok(relay_response(res.status, &res.set_cookies, to_value(note)?))
}

pub async fn update_note(note_id: String, body: Value, base: BaseParams) -> Result<Response> {
    validate_tag(&body)?;

    let cookie_header = base.cookie_header();
    let res = base
        .upstream
        .send(
            Method::PATCH,
            &format!("/notes/{note_id}"),
            &[],
            cookie_header.as_deref(),
            Some(&body),
        )
        .await?
        .ensure_ok()?;

    let note = normalize_note(&res.body);
    Ok(relay_response(res.status, &res.set_cookies, to_value(note)?))
}

pub async fn delete_note(note_id: String, base: BaseParams) -> Result<Response> {
    let cookie_header = base.cookie_header();
    let res = base
        .upstream
        .send(
            Method::DELETE,
            &format!("/notes/{note_id}"),
            &[],
            cookie_header.as_deref(),
            None,
        )
        .await?
        .ensure_ok()?;

    let note = normalize_note(&res.body);
    Ok(relay_response(res.status, &res.set_cookies, to_value(note)?))
}

pub async fn categories(base: BaseParams) -> Result<Response> {
    let cookie_header = base.cookie_header();
    let outcome = base
        .upstream
        .send(
            Method::GET,
            "/notes/categories",
            &[],
            cookie_header.as_deref(),
            None,
        )
        .await
        .and_then(|res| res.ensure_ok());

    match outcome {
        Ok(res) => Ok(relay_response(res.status, &res.set_cookies, res.body)),
        Err(err) => {
            tracing::warn!("categories fell back to the fixed tag set: {err:?}");
            let tags: Vec<&str> = NoteTag::ALL.iter().map(NoteTag::as_str).collect();
            Ok(mock_response(json!(tags)))
        }
    }
}
