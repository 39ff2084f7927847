use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;

use crate::api::DynAPI;
use crate::entities::{LogSheet, LogSheetChanges, NewLogSheet};
use crate::error::Error;
use crate::server::extractors::ValidatedJson;

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<LogSheet>>, Error> {
    let logs = api.list_log_sheets().await?;

    Ok(logs.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    ValidatedJson(log_sheet): ValidatedJson<NewLogSheet>,
) -> Result<(StatusCode, Json<LogSheet>), Error> {
    let log_sheet = api.create_log_sheet(log_sheet).await?;

    Ok((StatusCode::CREATED, log_sheet.into()))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<LogSheet>, Error> {
    let log_sheet = api.find_log_sheet(id).await?;

    Ok(log_sheet.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
    ValidatedJson(log_sheet): ValidatedJson<NewLogSheet>,
) -> Result<Json<LogSheet>, Error> {
    let log_sheet = api.update_log_sheet(id, log_sheet).await?;

    Ok(log_sheet.into())
}

pub async fn patch(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
    ValidatedJson(changes): ValidatedJson<LogSheetChanges>,
) -> Result<Json<LogSheet>, Error> {
    let log_sheet = api.patch_log_sheet(id, changes).await?;

    Ok(log_sheet.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Error> {
    api.delete_log_sheet(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
