use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    entities::Coordinates,
    error::{invalid_input_error, upstream_error, Error},
    external::Geocoder,
};

#[derive(Clone, Debug, Deserialize)]
pub struct Place {
    pub place_id: String,
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinates {
    fn from(location: LatLng) -> Self {
        Coordinates::new(location.lat, location.lng)
    }
}

#[derive(Clone, Debug, Deserialize)]
struct Response<T> {
    status: String,
    results: Option<T>,
}

#[derive(Debug)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    key: String,
}

impl GoogleMaps {
    pub fn new(api_base: &str, key: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_places(&self, address: &str) -> Result<Vec<Place>, Error> {
        let url = format!("{}/maps/api/geocode/json", self.api_base);

        let res = self
            .client
            .get(url)
            .query(&[("key", self.key.as_str())])
            .query(&[("address", address)])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response<Vec<Place>> = res.json().await?;

        match data.status.as_str() {
            "OK" => Ok(data.results.ok_or_else(upstream_error)?),
            "ZERO_RESULTS" => Ok(vec![]),
            status => {
                tracing::warn!(status, "google maps rejected geocoding request");
                Err(upstream_error())
            }
        }
    }
}

#[async_trait]
impl Geocoder for GoogleMaps {
    async fn geocode(&self, query: &str) -> Option<Coordinates> {
        match self.find_places(query).await {
            Ok(places) => places
                .into_iter()
                .next()
                .map(|place| place.geometry.location.into()),
            Err(err) => {
                tracing::warn!(%err, query, "google maps lookup failed");
                None
            }
        }
    }
}
