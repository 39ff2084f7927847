use super::enrichment::{enrich_stop, enrich_stop_replacing};
use super::helpers::{delete_row, fetch_stop, fetch_stops, insert_stop, update_stop};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::StopAPI,
    entities::{NewStop, Stop, StopChanges, StopFields},
    error::Error,
};

impl Engine {
    async fn store_stop(&self, id: i64, trip_id: i64, fields: StopFields) -> Result<Stop, Error> {
        let mut conn = self.pool.acquire().await?;
        update_stop(&mut conn, id, trip_id, &fields).await?;

        fetch_stop(&mut conn, id).await
    }

    async fn stored_stop(&self, id: i64) -> Result<Stop, Error> {
        let mut conn = self.pool.acquire().await?;

        fetch_stop(&mut conn, id).await
    }
}

#[async_trait]
impl StopAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_stops(&self) -> Result<Vec<Stop>, Error> {
        let mut conn = self.pool.acquire().await?;

        fetch_stops(&mut conn).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_stop(&self, id: i64) -> Result<Stop, Error> {
        self.stored_stop(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_stop(&self, stop: NewStop) -> Result<Stop, Error> {
        let NewStop { trip, mut fields } = stop;

        enrich_stop(self.geocoder.as_ref(), &mut fields).await;

        let mut conn = self.pool.acquire().await?;
        let id = insert_stop(&mut conn, trip, &fields).await?;

        tracing::info!(id, trip, "created stop");

        fetch_stop(&mut conn, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_stop(&self, id: i64, stop: NewStop) -> Result<Stop, Error> {
        let NewStop { trip, mut fields } = stop;

        let stored = self.stored_stop(id).await?;
        enrich_stop_replacing(self.geocoder.as_ref(), &stored.fields, &mut fields).await;

        self.store_stop(id, trip, fields).await
    }

    #[tracing::instrument(skip(self))]
    async fn patch_stop(&self, id: i64, changes: StopChanges) -> Result<Stop, Error> {
        let Stop {
            mut trip,
            mut fields,
            ..
        } = self.stored_stop(id).await?;
        changes.apply(&mut trip, &mut fields);
        enrich_stop(self.geocoder.as_ref(), &mut fields).await;

        self.store_stop(id, trip, fields).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_stop(&self, id: i64) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        delete_row(&mut conn, "stops", id).await
    }
}
