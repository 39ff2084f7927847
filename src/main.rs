use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use triplog::api::DynAPI;
use triplog::config::Config;
use triplog::db::PgPool;
use triplog::engine::Engine;
use triplog::error::{config_error, Error};
use triplog::external::new_geocoder;
use triplog::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|err| config_error(format!("invalid LOG_LEVEL: {}", err)))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let PgPool(pool) = PgPool::new(&config.database_url, config.database_max_connections).await?;
    let geocoder = new_geocoder(&config.geocoder)?;

    let engine = Engine::new(pool, geocoder).await?;

    serve(Arc::new(engine) as DynAPI, config.http_addr).await
}
