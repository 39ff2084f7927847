pub mod logs;
pub mod stops;
pub mod trips;

use axum::Json;
use serde_json::{json, Value};

/// Lists the resource collections served by the API.
pub async fn index() -> Json<Value> {
    Json(json!({
        "trips": "/trips/",
        "stops": "/stops/",
        "logs": "/logs/",
    }))
}
