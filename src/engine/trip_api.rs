use super::enrichment::{enrich_stop, enrich_trip, enrich_trip_replacing};
use super::helpers::{
    delete_row, fetch_trip, fetch_trip_row, fetch_trips, insert_log_sheet, insert_stop,
    insert_trip, update_trip,
};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::TripAPI,
    entities::{NewTrip, Trip, TripChanges, TripFields},
    error::Error,
};

impl Engine {
    /// Writes the fields over the stored trip.
    async fn store_trip(&self, id: i64, fields: TripFields) -> Result<Trip, Error> {
        let mut conn = self.pool.acquire().await?;
        update_trip(&mut conn, id, &fields).await?;

        fetch_trip(&mut conn, id).await
    }

    async fn stored_trip(&self, id: i64) -> Result<Trip, Error> {
        let mut conn = self.pool.acquire().await?;

        fetch_trip_row(&mut conn, id).await
    }
}

#[async_trait]
impl TripAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_trips(&self) -> Result<Vec<Trip>, Error> {
        let mut conn = self.pool.acquire().await?;

        fetch_trips(&mut conn).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_trip(&self, id: i64) -> Result<Trip, Error> {
        let mut conn = self.pool.acquire().await?;

        fetch_trip(&mut conn, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_trip(&self, trip: NewTrip) -> Result<Trip, Error> {
        let NewTrip {
            mut fields,
            mut stops,
            logs,
        } = trip;

        enrich_trip(self.geocoder.as_ref(), &mut fields).await;
        for stop in stops.iter_mut() {
            enrich_stop(self.geocoder.as_ref(), stop).await;
        }

        let mut tx = self.pool.begin().await?;

        let id = insert_trip(&mut tx, &fields).await?;
        for stop in stops.iter() {
            insert_stop(&mut tx, id, stop).await?;
        }
        for log in logs.iter() {
            insert_log_sheet(&mut tx, id, log).await?;
        }

        let trip = fetch_trip(&mut tx, id).await?;

        tx.commit().await?;

        tracing::info!(
            id,
            stops = trip.stops.len(),
            logs = trip.logs.len(),
            "created trip"
        );

        Ok(trip)
    }

    #[tracing::instrument(skip(self))]
    async fn update_trip(&self, id: i64, mut fields: TripFields) -> Result<Trip, Error> {
        let stored = self.stored_trip(id).await?;
        enrich_trip_replacing(self.geocoder.as_ref(), &stored.fields, &mut fields).await;

        self.store_trip(id, fields).await
    }

    #[tracing::instrument(skip(self))]
    async fn patch_trip(&self, id: i64, changes: TripChanges) -> Result<Trip, Error> {
        let Trip { mut fields, .. } = self.stored_trip(id).await?;
        changes.apply(&mut fields);
        enrich_trip(self.geocoder.as_ref(), &mut fields).await;

        self.store_trip(id, fields).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_trip(&self, id: i64) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        // stops and log sheets go with it through ON DELETE CASCADE
        delete_row(&mut conn, "trips", id).await?;

        tracing::info!(id, "deleted trip");

        Ok(())
    }
}
