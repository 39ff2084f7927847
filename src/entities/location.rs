use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A free-text place name together with the coordinate pair it resolves to.
///
/// Borrowed view over the location columns of a record so that the same
/// enrichment logic works for every entity.
#[derive(Debug)]
pub struct LocationRef<'a> {
    pub text: Option<&'a str>,
    pub lat: &'a mut Option<f64>,
    pub lon: &'a mut Option<f64>,
}

impl<'a> LocationRef<'a> {
    pub fn new(text: Option<&'a str>, lat: &'a mut Option<f64>, lon: &'a mut Option<f64>) -> Self {
        Self { text, lat, lon }
    }

    /// The place name to look up, if the coordinates are still unknown.
    ///
    /// A pair that was set once is never looked up again, even if the text
    /// changed since.
    pub fn pending_query(&self) -> Option<&'a str> {
        if self.lat.is_some() && self.lon.is_some() {
            return None;
        }

        self.text.map(str::trim).filter(|text| !text.is_empty())
    }

    /// Drops a half-set pair so that only complete pairs are ever stored.
    pub fn discard_partial(&mut self) {
        if self.lat.is_none() != self.lon.is_none() {
            *self.lat = None;
            *self.lon = None;
        }
    }

    pub fn set(&mut self, coordinates: Coordinates) {
        *self.lat = Some(coordinates.lat);
        *self.lon = Some(coordinates.lon);
    }
}

/// Applies a partial update to a coordinate pair.
///
/// Absent keys leave the pair alone. Clearing either half clears both.
pub fn patch_pair(
    lat: &mut Option<f64>,
    lon: &mut Option<f64>,
    new_lat: Option<Option<f64>>,
    new_lon: Option<Option<f64>>,
) {
    if new_lat.is_none() && new_lon.is_none() {
        return;
    }

    match (new_lat.unwrap_or(*lat), new_lon.unwrap_or(*lon)) {
        (Some(new_lat), Some(new_lon)) => {
            *lat = Some(new_lat);
            *lon = Some(new_lon);
        }
        _ => {
            *lat = None;
            *lon = None;
        }
    }
}

/// Falls back to the stored pair when the incoming one is incomplete.
pub fn keep_pair(
    lat: &mut Option<f64>,
    lon: &mut Option<f64>,
    stored_lat: Option<f64>,
    stored_lon: Option<f64>,
) {
    if lat.is_none() || lon.is_none() {
        *lat = stored_lat;
        *lon = stored_lon;
    }
}
