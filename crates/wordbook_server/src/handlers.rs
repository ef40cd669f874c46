//! Route handlers for the `/words` collection.
//!
//! Every handler resolves path ids, delegates one call to the word service
//! and returns the affected `Word` (or list) as JSON.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use wordbook_core::{DefinitionPatch, NewDefinition, NewWord, Word, WordOrder, WordPatch};

const VOTE_ACTION_PREFIX: &str = "vote-";

/// Query string of `GET /words`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// `createdAt` or `updatedAt`; falls back to the configured default.
    pub sort: Option<String>,
}

type JsonResult<T> = Result<Json<T>, ApiError>;
type CreatedResult<T> = Result<(StatusCode, Json<T>), ApiError>;

pub async fn list_words(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> JsonResult<Vec<Word>> {
    let Query(params) = params?;
    let order = match params.sort.as_deref() {
        None => state.default_order(),
        Some(key) => parse_sort_key(key)?,
    };
    let words = state
        .with_word_service(move |service| service.list_words(order))
        .await?;
    Ok(Json(words))
}

pub async fn create_word(
    State(state): State<AppState>,
    body: Result<Json<NewWord>, JsonRejection>,
) -> CreatedResult<Word> {
    let Json(input) = body?;
    let word = state
        .with_word_service(move |service| service.create_word(input))
        .await?;
    Ok((StatusCode::CREATED, Json(word)))
}

pub async fn get_word(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> JsonResult<Word> {
    let Path(word_id) = path?;
    let word_id = parse_id(&word_id)?;
    let word = state
        .with_word_service(move |service| service.get_word(word_id))
        .await?;
    Ok(Json(word))
}

pub async fn update_word(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<WordPatch>, JsonRejection>,
) -> JsonResult<Word> {
    let Path(word_id) = path?;
    let word_id = parse_id(&word_id)?;
    let Json(patch) = body?;
    let word = state
        .with_word_service(move |service| service.update_word(word_id, patch))
        .await?;
    Ok(Json(word))
}

pub async fn delete_word(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> JsonResult<Word> {
    let Path(word_id) = path?;
    let word_id = parse_id(&word_id)?;
    let word = state
        .with_word_service(move |service| service.delete_word(word_id))
        .await?;
    Ok(Json(word))
}

pub async fn add_definition(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<NewDefinition>, JsonRejection>,
) -> CreatedResult<Word> {
    let Path(word_id) = path?;
    let word_id = parse_id(&word_id)?;
    let Json(input) = body?;
    let word = state
        .with_word_service(move |service| service.add_definition(word_id, input))
        .await?;
    Ok((StatusCode::CREATED, Json(word)))
}

pub async fn edit_definition(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Result<Json<DefinitionPatch>, JsonRejection>,
) -> JsonResult<Word> {
    let Path((word_id, definition_id)) = path?;
    let word_id = parse_id(&word_id)?;
    let definition_id = parse_id(&definition_id)?;
    let Json(patch) = body?;
    let word = state
        .with_word_service(move |service| service.edit_definition(word_id, definition_id, patch))
        .await?;
    Ok(Json(word))
}

pub async fn delete_definition(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> JsonResult<Word> {
    let Path((word_id, definition_id)) = path?;
    let word_id = parse_id(&word_id)?;
    let definition_id = parse_id(&definition_id)?;
    let word = state
        .with_word_service(move |service| service.delete_definition(word_id, definition_id))
        .await?;
    Ok(Json(word))
}

/// `POST .../definitions/{definition_id}/vote-{direction}`.
///
/// Actions without the `vote-` prefix are unknown routes.
pub async fn vote_definition(
    State(state): State<AppState>,
    path: Result<Path<(String, String, String)>, PathRejection>,
) -> JsonResult<Word> {
    let Path((word_id, definition_id, action)) = path?;
    let word_id = parse_id(&word_id)?;
    let definition_id = parse_id(&definition_id)?;
    let token = action
        .strip_prefix(VOTE_ACTION_PREFIX)
        .ok_or(ApiError::NotFound)?
        .to_string();
    let word = state
        .with_word_service(move |service| service.vote_token(word_id, definition_id, &token))
        .await?;
    Ok(Json(word))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// An id that cannot be parsed can never resolve, so it is reported as not found.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn parse_sort_key(key: &str) -> Result<WordOrder, ApiError> {
    match key {
        "createdAt" => Ok(WordOrder::CreatedAtDesc),
        "updatedAt" => Ok(WordOrder::UpdatedAtDesc),
        other => Err(ApiError::InvalidRequest(format!(
            "unknown sort key `{other}`; expected `createdAt` or `updatedAt`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_id, parse_sort_key};
    use crate::error::ApiError;
    use wordbook_core::WordOrder;

    #[test]
    fn sort_keys_use_wire_field_names() {
        assert_eq!(parse_sort_key("createdAt").unwrap(), WordOrder::CreatedAtDesc);
        assert_eq!(parse_sort_key("updatedAt").unwrap(), WordOrder::UpdatedAtDesc);
        assert!(matches!(
            parse_sort_key("created_at"),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn malformed_ids_are_not_found() {
        assert!(matches!(parse_id("not-a-uuid"), Err(ApiError::NotFound)));
        assert!(parse_id("11111111-2222-4333-8444-555555555555").is_ok());
    }
}
