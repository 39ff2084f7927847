use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;

use crate::api::DynAPI;
use crate::entities::{NewStop, Stop, StopChanges};
use crate::error::Error;
use crate::server::extractors::ValidatedJson;

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Stop>>, Error> {
    let stops = api.list_stops().await?;

    Ok(stops.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    ValidatedJson(stop): ValidatedJson<NewStop>,
) -> Result<(StatusCode, Json<Stop>), Error> {
    let stop = api.create_stop(stop).await?;

    Ok((StatusCode::CREATED, stop.into()))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Stop>, Error> {
    let stop = api.find_stop(id).await?;

    Ok(stop.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
    ValidatedJson(stop): ValidatedJson<NewStop>,
) -> Result<Json<Stop>, Error> {
    let stop = api.update_stop(id, stop).await?;

    Ok(stop.into())
}

pub async fn patch(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
    ValidatedJson(changes): ValidatedJson<StopChanges>,
) -> Result<Json<Stop>, Error> {
    let stop = api.patch_stop(id, changes).await?;

    Ok(stop.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Error> {
    api.delete_stop(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
