//! Fills in missing coordinates before a record is written.
//!
//! Only locations without a complete coordinate pair and with non-empty text
//! are looked up. A miss leaves the coordinates null and the write goes ahead.

use crate::entities::{LocationRef, StopFields, TripFields};
use crate::external::Geocoder;

pub async fn enrich_trip(geocoder: &dyn Geocoder, fields: &mut TripFields) {
    for location in fields.locations() {
        resolve(geocoder, location).await;
    }
}

pub async fn enrich_stop(geocoder: &dyn Geocoder, fields: &mut StopFields) {
    resolve(geocoder, fields.location()).await;
}

/// Full replacement of a trip: pairs the request left out are carried over
/// from the stored trip and only the rest is looked up.
pub async fn enrich_trip_replacing(
    geocoder: &dyn Geocoder,
    stored: &TripFields,
    fields: &mut TripFields,
) {
    fields.keep_coordinates_from(stored);
    enrich_trip(geocoder, fields).await;
}

pub async fn enrich_stop_replacing(
    geocoder: &dyn Geocoder,
    stored: &StopFields,
    fields: &mut StopFields,
) {
    fields.keep_coordinates_from(stored);
    enrich_stop(geocoder, fields).await;
}

/// Looks up a single location, returning whether coordinates were filled in.
pub async fn resolve(geocoder: &dyn Geocoder, mut location: LocationRef<'_>) -> bool {
    location.discard_partial();

    let query = match location.pending_query() {
        Some(query) => query,
        None => return false,
    };

    match geocoder.geocode(query).await {
        Some(coordinates) => {
            tracing::debug!(query, lat = coordinates.lat, lon = coordinates.lon, "geocoded");
            location.set(coordinates);
            true
        }
        None => {
            tracing::debug!(query, "no coordinates found");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::entities::Coordinates;

    struct StubGeocoder {
        answer: Option<Coordinates>,
        calls: AtomicUsize,
    }

    impl StubGeocoder {
        fn new(answer: Option<Coordinates>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(&self, _query: &str) -> Option<Coordinates> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    fn trip_fields() -> TripFields {
        serde_json::from_value(json!({
            "driver_name": "Ada",
            "start_location": "Chicago, IL",
            "end_location": "Dallas, TX",
            "total_miles": 925,
            "start_time": "2025-03-07T08:00:00Z"
        }))
        .unwrap()
    }

    fn stop_fields(location: &str) -> StopFields {
        serde_json::from_value(json!({
            "location": location,
            "stop_type": "fuel",
            "stop_time": "2025-03-07T14:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn fills_absent_coordinates() {
        let geocoder = StubGeocoder::new(Some(Coordinates::new(37.08, -94.51)));
        let mut fields = trip_fields();

        tokio_test::block_on(enrich_trip(&geocoder, &mut fields));

        // start and end are looked up, current_location is unset
        assert_eq!(geocoder.calls(), 2);
        assert_eq!(fields.start_lat, Some(37.08));
        assert_eq!(fields.start_lon, Some(-94.51));
        assert_eq!(fields.end_lat, Some(37.08));
        assert_eq!(fields.current_lat, None);
    }

    #[test]
    fn existing_coordinates_are_never_recomputed() {
        let geocoder = StubGeocoder::new(Some(Coordinates::new(0.0, 0.0)));
        let mut fields = trip_fields();
        fields.start_lat = Some(41.88);
        fields.start_lon = Some(-87.63);
        fields.end_lat = Some(32.78);
        fields.end_lon = Some(-96.8);

        tokio_test::block_on(enrich_trip(&geocoder, &mut fields));

        assert_eq!(geocoder.calls(), 0);
        assert_eq!(fields.start_lat, Some(41.88));
        assert_eq!(fields.end_lon, Some(-96.8));
    }

    #[test]
    fn empty_location_is_not_looked_up() {
        let geocoder = StubGeocoder::new(Some(Coordinates::new(0.0, 0.0)));
        let mut fields = trip_fields();
        fields.start_lat = Some(41.88);
        fields.start_lon = Some(-87.63);
        fields.end_lat = Some(32.78);
        fields.end_lon = Some(-96.8);
        fields.current_location = Some("".into());

        tokio_test::block_on(enrich_trip(&geocoder, &mut fields));

        assert_eq!(geocoder.calls(), 0);
        assert_eq!(fields.current_lat, None);
        assert_eq!(fields.current_lon, None);
    }

    #[test]
    fn miss_leaves_coordinates_null() {
        let geocoder = StubGeocoder::new(None);
        let mut fields = stop_fields("Nowhere");

        tokio_test::block_on(enrich_stop(&geocoder, &mut fields));

        assert_eq!(geocoder.calls(), 1);
        assert_eq!(fields.lat, None);
        assert_eq!(fields.lon, None);
    }

    #[test]
    fn resolve_reports_whether_it_filled_the_pair() {
        let geocoder = StubGeocoder::new(Some(Coordinates::new(37.08, -94.51)));
        let mut fields = stop_fields("Joplin, MO");

        assert!(tokio_test::block_on(resolve(&geocoder, fields.location())));
        assert!(!tokio_test::block_on(resolve(&geocoder, fields.location())));

        assert_eq!(geocoder.calls(), 1);
        assert_eq!(fields.lat, Some(37.08));
    }

    #[test]
    fn replacement_keeps_stored_pairs_and_looks_up_the_rest() {
        let geocoder = StubGeocoder::new(Some(Coordinates::new(37.08, -94.51)));

        let mut stored = trip_fields();
        stored.start_lat = Some(41.88);
        stored.start_lon = Some(-87.63);

        // the incoming body renames the start but sends no pairs,
        // plus half of an end pair
        let mut fields = trip_fields();
        fields.start_location = "Chicago Loop, IL".into();
        fields.end_lat = Some(10.0);

        tokio_test::block_on(enrich_trip_replacing(&geocoder, &stored, &mut fields));

        assert_eq!(geocoder.calls(), 1);
        assert_eq!(fields.start_lat, Some(41.88));
        assert_eq!(fields.start_lon, Some(-87.63));
        assert_eq!(fields.end_lat, Some(37.08));
        assert_eq!(fields.end_lon, Some(-94.51));
        assert_eq!(fields.current_lat, None);
        assert_eq!(fields.current_lon, None);
    }

    #[test]
    fn stop_replacement_sends_complete_pairs_through() {
        let geocoder = StubGeocoder::new(Some(Coordinates::new(0.0, 0.0)));

        let mut stored = stop_fields("Joplin, MO");
        stored.lat = Some(37.08);
        stored.lon = Some(-94.51);

        let mut fields = stop_fields("Joplin, MO");
        fields.lat = Some(37.1);
        fields.lon = Some(-94.5);

        tokio_test::block_on(enrich_stop_replacing(&geocoder, &stored, &mut fields));

        assert_eq!(geocoder.calls(), 0);
        assert_eq!(fields.lat, Some(37.1));
        assert_eq!(fields.lon, Some(-94.5));
    }
}
