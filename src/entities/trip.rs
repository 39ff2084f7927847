use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::{Validate, ValidationErrors};

use super::location::{keep_pair, patch_pair};
use crate::entities::{LocationRef, LogSheet, LogSheetFields, Stop, StopFields};
use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    #[serde(flatten)]
    pub fields: TripFields,
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub logs: Vec<LogSheet>,
}

/// The writable columns of a trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct TripFields {
    #[validate(length(min = 1, max = 255))]
    pub driver_name: String,
    #[validate(length(max = 255))]
    pub company: Option<String>,
    #[validate(length(max = 50))]
    pub truck_number: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub start_location: String,
    pub start_lat: Option<f64>,
    pub start_lon: Option<f64>,
    #[validate(length(min = 1, max = 255))]
    pub end_location: String,
    pub end_lat: Option<f64>,
    pub end_lon: Option<f64>,
    #[validate(length(max = 255))]
    pub current_location: Option<String>,
    pub current_lat: Option<f64>,
    pub current_lon: Option<f64>,
    pub total_miles: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_cycle_hours: f64,
}

impl TripFields {
    pub fn locations(&mut self) -> [LocationRef<'_>; 3] {
        [
            LocationRef::new(
                Some(self.start_location.as_str()),
                &mut self.start_lat,
                &mut self.start_lon,
            ),
            LocationRef::new(
                Some(self.end_location.as_str()),
                &mut self.end_lat,
                &mut self.end_lon,
            ),
            LocationRef::new(
                self.current_location.as_deref(),
                &mut self.current_lat,
                &mut self.current_lon,
            ),
        ]
    }

    /// Carries over stored coordinates the incoming fields leave unset.
    pub fn keep_coordinates_from(&mut self, stored: &TripFields) {
        keep_pair(
            &mut self.start_lat,
            &mut self.start_lon,
            stored.start_lat,
            stored.start_lon,
        );
        keep_pair(&mut self.end_lat, &mut self.end_lon, stored.end_lat, stored.end_lon);
        keep_pair(
            &mut self.current_lat,
            &mut self.current_lon,
            stored.current_lat,
            stored.current_lon,
        );
    }
}

impl Trip {
    /// One line describing a stop of this trip, led by the driver's name.
    pub fn stop_summary(&self, stop: &Stop) -> String {
        format!("{} {}", self.fields.driver_name, stop)
    }

    pub fn log_summary(&self, log: &LogSheet) -> String {
        format!(
            "{} for {} that started at {}",
            log, self.fields.driver_name, self.fields.start_location
        )
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} drove {} miles from {} to {}",
            self.fields.driver_name,
            self.fields.total_miles,
            self.fields.start_location,
            self.fields.end_location
        )
    }
}

/// Payload for creating a trip, optionally with its stops and log sheets.
#[derive(Debug, Deserialize)]
pub struct NewTrip {
    #[serde(flatten)]
    pub fields: TripFields,
    #[serde(default)]
    pub stops: Vec<StopFields>,
    #[serde(default)]
    pub logs: Vec<LogSheetFields>,
}

impl Validate for NewTrip {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let result = self.fields.validate();
        let result = ValidationErrors::merge_all(
            result,
            "stops",
            self.stops.iter().map(Validate::validate).collect(),
        );

        ValidationErrors::merge_all(
            result,
            "logs",
            self.logs.iter().map(Validate::validate).collect(),
        )
    }
}

/// Payload for replacing a trip's fields.
#[derive(Debug, Deserialize)]
pub struct TripUpdate {
    #[serde(flatten)]
    pub fields: TripFields,
    pub stops: Option<IgnoredAny>,
    pub logs: Option<IgnoredAny>,
}

impl TripUpdate {
    pub fn ensure_flat(&self) -> Result<(), Error> {
        reject_nested_writes(&self.stops, &self.logs)
    }
}

impl Validate for TripUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.fields.validate()
    }
}

/// Payload for a partial trip update; absent keys leave the column as is.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TripChanges {
    #[validate(length(min = 1, max = 255))]
    pub driver_name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(max = 255))]
    pub company: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(max = 50))]
    pub truck_number: Option<Option<String>>,
    #[validate(length(min = 1, max = 255))]
    pub start_location: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub start_lat: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub start_lon: Option<Option<f64>>,
    #[validate(length(min = 1, max = 255))]
    pub end_location: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_lat: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_lon: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(max = 255))]
    pub current_location: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub current_lat: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub current_lon: Option<Option<f64>>,
    pub total_miles: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_time: Option<Option<DateTime<Utc>>>,
    pub current_cycle_hours: Option<f64>,
    pub stops: Option<IgnoredAny>,
    pub logs: Option<IgnoredAny>,
}

impl TripChanges {
    pub fn ensure_flat(&self) -> Result<(), Error> {
        reject_nested_writes(&self.stops, &self.logs)
    }

    pub fn apply(self, fields: &mut TripFields) {
        if let Some(driver_name) = self.driver_name {
            fields.driver_name = driver_name;
        }
        if let Some(company) = self.company {
            fields.company = company;
        }
        if let Some(truck_number) = self.truck_number {
            fields.truck_number = truck_number;
        }
        if let Some(start_location) = self.start_location {
            fields.start_location = start_location;
        }
        patch_pair(
            &mut fields.start_lat,
            &mut fields.start_lon,
            self.start_lat,
            self.start_lon,
        );
        if let Some(end_location) = self.end_location {
            fields.end_location = end_location;
        }
        patch_pair(
            &mut fields.end_lat,
            &mut fields.end_lon,
            self.end_lat,
            self.end_lon,
        );
        if let Some(current_location) = self.current_location {
            fields.current_location = current_location;
        }
        patch_pair(
            &mut fields.current_lat,
            &mut fields.current_lon,
            self.current_lat,
            self.current_lon,
        );
        if let Some(total_miles) = self.total_miles {
            fields.total_miles = total_miles;
        }
        if let Some(start_time) = self.start_time {
            fields.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            fields.end_time = end_time;
        }
        if let Some(current_cycle_hours) = self.current_cycle_hours {
            fields.current_cycle_hours = current_cycle_hours;
        }
    }
}

fn reject_nested_writes(
    stops: &Option<IgnoredAny>,
    logs: &Option<IgnoredAny>,
) -> Result<(), Error> {
    let message = "nested records can only be written when the trip is created";

    let details = match (stops, logs) {
        (None, None) => return Ok(()),
        (Some(_), None) => json!({ "stops": [message] }),
        (None, Some(_)) => json!({ "logs": [message] }),
        (Some(_), Some(_)) => json!({ "stops": [message], "logs": [message] }),
    };

    Err(invalid_input_error().with_details(details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "driver_name": "Ada",
            "start_location": "Chicago, IL",
            "end_location": "Dallas, TX",
            "total_miles": 925,
            "start_time": "2025-03-07T08:00:00Z"
        })
    }

    #[test]
    fn new_trip_defaults() {
        let trip: NewTrip = serde_json::from_value(payload()).unwrap();

        assert_eq!(trip.fields.current_cycle_hours, 0.0);
        assert_eq!(trip.fields.total_miles, 925.0);
        assert_eq!(trip.fields.company, None);
        assert_eq!(trip.fields.start_lat, None);
        assert!(trip.stops.is_empty());
        assert!(trip.logs.is_empty());
        assert!(trip.validate().is_ok());
    }

    #[test]
    fn new_trip_with_nested_children() {
        let mut value = payload();
        value["stops"] = json!([{
            "location": "Joplin, MO",
            "stop_type": "fuel",
            "stop_time": "2025-03-07T14:00:00Z",
            "duration": 0.5
        }]);
        value["logs"] = json!([{ "date": "2025-03-07", "driving_hours": 10 }]);

        let trip: NewTrip = serde_json::from_value(value).unwrap();

        assert_eq!(trip.stops.len(), 1);
        assert_eq!(trip.logs.len(), 1);
        assert_eq!(trip.logs[0].driving_hours, 10.0);
        assert_eq!(trip.logs[0].on_duty_hours, 0.0);
    }

    #[test]
    fn new_trip_missing_required_field_is_rejected() {
        let mut value = payload();
        value.as_object_mut().unwrap().remove("driver_name");

        assert!(serde_json::from_value::<NewTrip>(value).is_err());
    }

    #[test]
    fn blank_names_fail_validation_with_field_detail() {
        let mut value = payload();
        value["driver_name"] = json!("");
        value["stops"] = json!([{
            "location": "",
            "stop_type": "rest",
            "stop_time": "2025-03-07T14:00:00Z"
        }]);

        let trip: NewTrip = serde_json::from_value(value).unwrap();
        let errors = trip.validate().unwrap_err();

        assert!(errors.errors().contains_key("driver_name"));
        assert!(errors.errors().contains_key("stops"));
    }

    #[test]
    fn update_with_nested_collections_is_rejected() {
        let mut value = payload();
        value["stops"] = json!([]);

        let update: TripUpdate = serde_json::from_value(value).unwrap();
        let err = update.ensure_flat().unwrap_err();

        assert!(err.is_invalid_input_error());
        assert!(err.details.unwrap().get("stops").is_some());
    }

    #[test]
    fn changes_distinguish_null_from_absent() {
        let mut fields: TripFields = serde_json::from_value(payload()).unwrap();
        fields.company = Some("ACME".into());
        fields.start_lat = Some(41.88);
        fields.start_lon = Some(-87.63);

        let changes: TripChanges =
            serde_json::from_value(json!({ "company": null, "total_miles": 930.5 })).unwrap();
        assert!(changes.ensure_flat().is_ok());
        changes.apply(&mut fields);

        assert_eq!(fields.company, None);
        assert_eq!(fields.total_miles, 930.5);
        assert_eq!(fields.start_lat, Some(41.88));
        assert_eq!(fields.driver_name, "Ada");
    }

    #[test]
    fn keep_coordinates_only_fills_unset_pairs() {
        let mut stored: TripFields = serde_json::from_value(payload()).unwrap();
        stored.start_lat = Some(41.88);
        stored.start_lon = Some(-87.63);
        stored.end_lat = Some(32.78);
        stored.end_lon = Some(-96.8);

        let mut incoming = stored.clone();
        incoming.start_lat = None;
        incoming.start_lon = None;
        incoming.end_lat = Some(1.0);
        incoming.end_lon = Some(2.0);

        incoming.keep_coordinates_from(&stored);

        assert_eq!(incoming.start_lat, Some(41.88));
        assert_eq!(incoming.end_lat, Some(1.0));
        assert_eq!(incoming.current_lat, None);
    }

    #[test]
    fn summary_names_driver_and_route() {
        let trip = Trip {
            id: 1,
            fields: serde_json::from_value(payload()).unwrap(),
            stops: vec![],
            logs: vec![],
        };

        assert_eq!(
            trip.to_string(),
            "Ada drove 925 miles from Chicago, IL to Dallas, TX"
        );
    }

    #[test]
    fn child_summaries_carry_driver_and_start() {
        let stop: Stop = serde_json::from_value(json!({
            "id": 3,
            "trip": 1,
            "location": "Joplin, MO",
            "stop_type": "fuel",
            "stop_time": "2025-03-07T14:00:00Z",
            "duration": 0.5
        }))
        .unwrap();
        let log: LogSheet = serde_json::from_value(json!({
            "id": 4,
            "trip": 1,
            "date": "2025-03-07",
            "driving_hours": 10
        }))
        .unwrap();
        let trip = Trip {
            id: 1,
            fields: serde_json::from_value(payload()).unwrap(),
            stops: vec![stop.clone()],
            logs: vec![log.clone()],
        };

        assert_eq!(
            trip.stop_summary(&stop),
            "Ada stopped at Joplin, MO for fuel that lasted 0.5"
        );
        assert_eq!(
            trip.log_summary(&log),
            "log sheet for 2025-03-07 covering 10 hours for Ada that started at Chicago, IL"
        );
    }

    #[test]
    fn patching_half_a_pair_never_stores_half_a_pair() {
        let mut fields: TripFields = serde_json::from_value(payload()).unwrap();
        fields.start_lat = Some(41.88);
        fields.start_lon = Some(-87.63);

        let changes: TripChanges =
            serde_json::from_value(json!({ "start_lat": null })).unwrap();
        changes.apply(&mut fields);
        assert_eq!((fields.start_lat, fields.start_lon), (None, None));

        let changes: TripChanges = serde_json::from_value(json!({ "end_lat": 32.78 })).unwrap();
        changes.apply(&mut fields);
        assert_eq!((fields.end_lat, fields.end_lon), (None, None));

        let changes: TripChanges =
            serde_json::from_value(json!({ "end_lat": 32.78, "end_lon": -96.8 })).unwrap();
        changes.apply(&mut fields);
        assert_eq!((fields.end_lat, fields.end_lon), (Some(32.78), Some(-96.8)));
    }

    #[test]
    fn replacing_with_half_a_pair_keeps_the_stored_pair() {
        let mut stored: TripFields = serde_json::from_value(payload()).unwrap();
        stored.start_lat = Some(41.88);
        stored.start_lon = Some(-87.63);

        let mut incoming: TripFields = serde_json::from_value(payload()).unwrap();
        incoming.start_lat = Some(1.0);

        incoming.keep_coordinates_from(&stored);

        assert_eq!(incoming.start_lat, Some(41.88));
        assert_eq!(incoming.start_lon, Some(-87.63));
    }
}
