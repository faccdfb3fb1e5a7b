use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bookshelf_db::Entity;
use bookshelf_http::{guarded, AppError};

use super::{CrudState, Identified, Resource};
use crate::utils::Validate;

type PathId = Result<Path<i64>, PathRejection>;
type Body<T> = Result<Json<Option<T>>, JsonRejection>;

pub(super) async fn list<R: Resource>(State(state): State<CrudState<R>>) -> Response {
    guarded(R::NAME, "list", list_all(state)).await
}

pub(super) async fn get<R: Resource>(State(state): State<CrudState<R>>, id: PathId) -> Response {
    guarded(R::NAME, "get", get_one(state, id)).await
}

pub(super) async fn create<R: Resource>(
    State(state): State<CrudState<R>>,
    body: Body<R::Create>,
) -> Response {
    guarded(R::NAME, "create", create_one(state, body)).await
}

pub(super) async fn update<R: Resource>(
    State(state): State<CrudState<R>>,
    id: PathId,
    body: Body<R::Update>,
) -> Response {
    guarded(R::NAME, "update", update_one(state, id, body)).await
}

pub(super) async fn delete<R: Resource>(
    State(state): State<CrudState<R>>,
    id: PathId,
) -> Response {
    guarded(R::NAME, "delete", delete_one(state, id)).await
}

async fn list_all<R: Resource>(state: CrudState<R>) -> Result<Json<Vec<R::Read>>, AppError> {
    let rows = state.repo.find_all().await?;
    tracing::debug!(count = rows.len(), "listing {}", R::NAME);
    Ok(Json(rows.into_iter().map(R::Read::from).collect()))
}

async fn get_one<R: Resource>(state: CrudState<R>, id: PathId) -> Result<Json<R::Read>, AppError> {
    let id = path_id::<R>(id)?;
    match state.repo.find_by_id(id).await? {
        Some(row) => Ok(Json(R::Read::from(row))),
        None => Err(AppError::not_found(format!("{} {} not found", R::LABEL, id))),
    }
}

async fn create_one<R: Resource>(
    state: CrudState<R>,
    body: Body<R::Create>,
) -> Result<impl IntoResponse, AppError> {
    let dto = payload::<R, _>(body)?;
    check::<R, _>(&dto)?;

    let mut row: R::Entity = dto.into();
    if !state.repo.create(&mut row).await? {
        return Err(AppError::no_effect(format!("failed to create {}", R::LABEL)));
    }

    let id = row.id();
    tracing::info!(id, "{} created", R::LABEL);

    let location = format!("/api/{}/{}", R::NAME, id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(R::Read::from(row)),
    ))
}

async fn update_one<R: Resource>(
    state: CrudState<R>,
    id: PathId,
    body: Body<R::Update>,
) -> Result<StatusCode, AppError> {
    let id = positive_id::<R>(id)?;
    let dto = payload::<R, _>(body)?;
    if dto.id() != id {
        return Err(AppError::bad_request(format!(
            "path id {} does not match {} id {}",
            id,
            R::LABEL,
            dto.id()
        )));
    }
    check::<R, _>(&dto)?;

    let row: R::Entity = dto.into();
    if !state.repo.update(&row).await? {
        return Err(AppError::no_effect(format!(
            "failed to update {} {}",
            R::LABEL,
            id
        )));
    }

    tracing::info!(id, "{} updated", R::LABEL);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_one<R: Resource>(state: CrudState<R>, id: PathId) -> Result<StatusCode, AppError> {
    let id = positive_id::<R>(id)?;
    let Some(row) = state.repo.find_by_id(id).await? else {
        return Err(AppError::not_found(format!("{} {} not found", R::LABEL, id)));
    };

    if !state.repo.delete(&row).await? {
        return Err(AppError::no_effect(format!(
            "failed to delete {} {}",
            R::LABEL,
            id
        )));
    }

    tracing::info!(id, "{} deleted", R::LABEL);
    Ok(StatusCode::NO_CONTENT)
}

fn path_id<R: Resource>(id: PathId) -> Result<i64, AppError> {
    id.map(|Path(id)| id).map_err(|rejection| {
        AppError::bad_request(format!("invalid {} id: {}", R::LABEL, rejection.body_text()))
    })
}

fn positive_id<R: Resource>(id: PathId) -> Result<i64, AppError> {
    let id = path_id::<R>(id)?;
    if id < 1 {
        return Err(AppError::bad_request(format!(
            "{} id must be at least 1, got {}",
            R::LABEL,
            id
        )));
    }
    Ok(id)
}

/// Unwrap a JSON body, rejecting malformed and `null` payloads.
fn payload<R: Resource, T>(body: Body<T>) -> Result<T, AppError> {
    match body {
        Ok(Json(Some(dto))) => Ok(dto),
        Ok(Json(None)) => Err(AppError::bad_request(format!(
            "{} payload is required",
            R::LABEL
        ))),
        Err(rejection) => Err(AppError::bad_request(format!(
            "invalid {} payload: {}",
            R::LABEL,
            rejection.body_text()
        ))),
    }
}

fn check<R: Resource, T: Validate>(dto: &T) -> Result<(), AppError> {
    let failures = dto.validate();
    if failures.is_empty() {
        return Ok(());
    }
    Err(AppError::validation(
        failures,
        format!("invalid {} payload", R::LABEL),
    ))
}
