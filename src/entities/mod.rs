mod location;
mod log_sheet;
mod stop;
mod trip;

pub use location::{Coordinates, LocationRef};
pub use log_sheet::{LogSheet, LogSheetChanges, LogSheetFields, NewLogSheet};
pub use stop::{NewStop, Stop, StopChanges, StopFields, StopType};
pub use trip::{NewTrip, Trip, TripChanges, TripFields, TripUpdate};
