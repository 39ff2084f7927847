pub mod extractors;
mod handlers;

use std::net::SocketAddr;

use axum::{extract::Extension, routing::get, Router};

use crate::api::DynAPI;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{index, logs, stops, trips};

/// Builds the trip log routes. Every path is served with and without a
/// trailing slash.
///
/// The router carries no authentication; deployers wrap it with their own
/// layers.
pub fn router(api: DynAPI) -> Router {
    let trip_collection = get(trips::list).post(trips::create);
    let trip_item = get(trips::find)
        .put(trips::update)
        .patch(trips::patch)
        .delete(trips::delete);

    let stop_collection = get(stops::list).post(stops::create);
    let stop_item = get(stops::find)
        .put(stops::update)
        .patch(stops::patch)
        .delete(stops::delete);

    let log_collection = get(logs::list).post(logs::create);
    let log_item = get(logs::find)
        .put(logs::update)
        .patch(logs::patch)
        .delete(logs::delete);

    Router::new()
        .route("/", get(index))
        .route("/trips", trip_collection.clone())
        .route("/trips/", trip_collection)
        .route("/trips/:id", trip_item.clone())
        .route("/trips/:id/", trip_item)
        .route("/stops", stop_collection.clone())
        .route("/stops/", stop_collection)
        .route("/stops/:id", stop_item.clone())
        .route("/stops/:id/", stop_item)
        .route("/logs", log_collection.clone())
        .route("/logs/", log_collection)
        .route("/logs/:id", log_item.clone())
        .route("/logs/:id/", log_item)
        .layer(Extension(api))
}

pub async fn serve(api: DynAPI, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    let server = axum::Server::try_bind(&addr).map_err(|err| {
        tracing::error!(%err, %addr, "failed to bind");
        unexpected_error()
    })?;

    tracing::info!("listening on {}", addr);

    server
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| {
            tracing::error!(%err, "server error");
            unexpected_error()
        })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }

    tracing::info!("shutting down");
}
