use super::helpers::{
    delete_row, fetch_log_sheet, fetch_log_sheets, insert_log_sheet, update_log_sheet,
};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::LogSheetAPI,
    entities::{LogSheet, LogSheetChanges, NewLogSheet},
    error::Error,
};

#[async_trait]
impl LogSheetAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_log_sheets(&self) -> Result<Vec<LogSheet>, Error> {
        let mut conn = self.pool.acquire().await?;

        fetch_log_sheets(&mut conn).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_log_sheet(&self, id: i64) -> Result<LogSheet, Error> {
        let mut conn = self.pool.acquire().await?;

        fetch_log_sheet(&mut conn, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_log_sheet(&self, log_sheet: NewLogSheet) -> Result<LogSheet, Error> {
        let mut conn = self.pool.acquire().await?;

        let id = insert_log_sheet(&mut conn, log_sheet.trip, &log_sheet.fields).await?;

        tracing::info!(id, trip = log_sheet.trip, "created log sheet");

        fetch_log_sheet(&mut conn, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_log_sheet(&self, id: i64, log_sheet: NewLogSheet) -> Result<LogSheet, Error> {
        let mut conn = self.pool.acquire().await?;

        update_log_sheet(&mut conn, id, log_sheet.trip, &log_sheet.fields).await?;

        fetch_log_sheet(&mut conn, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn patch_log_sheet(
        &self,
        id: i64,
        changes: LogSheetChanges,
    ) -> Result<LogSheet, Error> {
        let mut tx = self.pool.begin().await?;

        let LogSheet {
            mut trip,
            mut fields,
            ..
        } = fetch_log_sheet(&mut tx, id).await?;
        changes.apply(&mut trip, &mut fields);

        update_log_sheet(&mut tx, id, trip, &fields).await?;
        let log_sheet = fetch_log_sheet(&mut tx, id).await?;

        tx.commit().await?;

        Ok(log_sheet)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_log_sheet(&self, id: i64) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        delete_row(&mut conn, "log_sheets", id).await
    }
}
