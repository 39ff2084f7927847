use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;

use crate::api::DynAPI;
use crate::entities::{NewTrip, Trip, TripChanges, TripUpdate};
use crate::error::Error;
use crate::server::extractors::ValidatedJson;

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Trip>>, Error> {
    let trips = api.list_trips().await?;

    Ok(trips.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    ValidatedJson(trip): ValidatedJson<NewTrip>,
) -> Result<(StatusCode, Json<Trip>), Error> {
    let trip = api.create_trip(trip).await?;

    Ok((StatusCode::CREATED, trip.into()))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Trip>, Error> {
    let trip = api.find_trip(id).await?;

    Ok(trip.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
    ValidatedJson(update): ValidatedJson<TripUpdate>,
) -> Result<Json<Trip>, Error> {
    update.ensure_flat()?;

    let trip = api.update_trip(id, update.fields).await?;

    Ok(trip.into())
}

pub async fn patch(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
    ValidatedJson(changes): ValidatedJson<TripChanges>,
) -> Result<Json<Trip>, Error> {
    changes.ensure_flat()?;

    let trip = api.patch_trip(id, changes).await?;

    Ok(trip.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Error> {
    api.delete_trip(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
