use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::{
    LogSheet, LogSheetChanges, NewLogSheet, NewStop, NewTrip, Stop, StopChanges, Trip,
    TripChanges, TripFields,
};
use crate::error::Error;

#[async_trait]
pub trait TripAPI {
    async fn list_trips(&self) -> Result<Vec<Trip>, Error>;

    async fn find_trip(&self, id: i64) -> Result<Trip, Error>;

    /// Creates the trip together with any embedded stops and log sheets.
    async fn create_trip(&self, trip: NewTrip) -> Result<Trip, Error>;

    async fn update_trip(&self, id: i64, fields: TripFields) -> Result<Trip, Error>;

    async fn patch_trip(&self, id: i64, changes: TripChanges) -> Result<Trip, Error>;

    /// Deletes the trip along with its stops and log sheets.
    async fn delete_trip(&self, id: i64) -> Result<(), Error>;
}

#[async_trait]
pub trait StopAPI {
    async fn list_stops(&self) -> Result<Vec<Stop>, Error>;

    async fn find_stop(&self, id: i64) -> Result<Stop, Error>;

    async fn create_stop(&self, stop: NewStop) -> Result<Stop, Error>;

    async fn update_stop(&self, id: i64, stop: NewStop) -> Result<Stop, Error>;

    async fn patch_stop(&self, id: i64, changes: StopChanges) -> Result<Stop, Error>;

    async fn delete_stop(&self, id: i64) -> Result<(), Error>;
}

#[async_trait]
pub trait LogSheetAPI {
    async fn list_log_sheets(&self) -> Result<Vec<LogSheet>, Error>;

    async fn find_log_sheet(&self, id: i64) -> Result<LogSheet, Error>;

    async fn create_log_sheet(&self, log_sheet: NewLogSheet) -> Result<LogSheet, Error>;

    async fn update_log_sheet(&self, id: i64, log_sheet: NewLogSheet) -> Result<LogSheet, Error>;

    async fn patch_log_sheet(&self, id: i64, changes: LogSheetChanges)
        -> Result<LogSheet, Error>;

    async fn delete_log_sheet(&self, id: i64) -> Result<(), Error>;
}

pub trait API: TripAPI + StopAPI + LogSheetAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
