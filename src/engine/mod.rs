pub mod enrichment;
mod helpers;
mod log_sheet_api;
mod stop_api;
mod trip_api;

use sqlx::{Pool, Postgres};

use crate::{api::API, db, error::Error, external::DynGeocoder};

type Database = Postgres;

pub struct Engine {
    pool: Pool<Database>,
    geocoder: DynGeocoder,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>, geocoder: DynGeocoder) -> Result<Self, Error> {
        db::migrate(&pool).await?;

        Ok(Self { pool, geocoder })
    }
}

impl API for Engine {}
