use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::location::{keep_pair, patch_pair};
use crate::entities::LocationRef;
use crate::error::{unexpected_error, Error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: i64,
    pub trip: i64,
    #[serde(flatten)]
    pub fields: StopFields,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopType {
    Fuel,
    Rest,
    Pickup,
    Dropoff,
}

impl StopType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fuel => "fuel",
            Self::Rest => "rest",
            Self::Pickup => "pickup",
            Self::Dropoff => "dropoff",
        }
    }
}

impl FromStr for StopType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fuel" => Ok(Self::Fuel),
            "rest" => Ok(Self::Rest),
            "pickup" => Ok(Self::Pickup),
            "dropoff" => Ok(Self::Dropoff),
            _ => Err(unexpected_error()),
        }
    }
}

/// The writable columns of a stop, minus the owning trip.
///
/// This is also the shape of the stops embedded in a trip creation payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct StopFields {
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub stop_type: StopType,
    pub stop_time: DateTime<Utc>,
    #[serde(default)]
    pub duration: f64,
}

impl StopFields {
    pub fn location(&mut self) -> LocationRef<'_> {
        LocationRef::new(Some(self.location.as_str()), &mut self.lat, &mut self.lon)
    }

    pub fn keep_coordinates_from(&mut self, stored: &StopFields) {
        keep_pair(&mut self.lat, &mut self.lon, stored.lat, stored.lon);
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stopped at {} for {} that lasted {}",
            self.fields.location,
            self.fields.stop_type.name(),
            self.fields.duration
        )
    }
}

/// Payload for creating or replacing a stop on its own.
#[derive(Debug, Deserialize)]
pub struct NewStop {
    pub trip: i64,
    #[serde(flatten)]
    pub fields: StopFields,
}

impl Validate for NewStop {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.fields.validate()
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct StopChanges {
    pub trip: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub lat: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub lon: Option<Option<f64>>,
    pub stop_type: Option<StopType>,
    pub stop_time: Option<DateTime<Utc>>,
    pub duration: Option<f64>,
}

impl StopChanges {
    pub fn apply(self, trip: &mut i64, fields: &mut StopFields) {
        if let Some(trip_id) = self.trip {
            *trip = trip_id;
        }
        if let Some(location) = self.location {
            fields.location = location;
        }
        patch_pair(&mut fields.lat, &mut fields.lon, self.lat, self.lon);
        if let Some(stop_type) = self.stop_type {
            fields.stop_type = stop_type;
        }
        if let Some(stop_time) = self.stop_time {
            fields.stop_time = stop_time;
        }
        if let Some(duration) = self.duration {
            fields.duration = duration;
        }
    }
}
