mod google_maps;
mod nominatim;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::GeocoderConfig;
use crate::entities::Coordinates;
use crate::error::Error;

pub use google_maps::GoogleMaps;
pub use nominatim::Nominatim;

/// Resolves a free-text place name to coordinates.
///
/// Lookups never fail: timeouts, provider errors and unknown places all
/// come back as `None`.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Option<Coordinates>;
}

pub type DynGeocoder = Arc<dyn Geocoder>;

#[derive(Debug, Default)]
pub struct Disabled;

#[async_trait]
impl Geocoder for Disabled {
    async fn geocode(&self, _query: &str) -> Option<Coordinates> {
        None
    }
}

pub fn new_geocoder(config: &GeocoderConfig) -> Result<DynGeocoder, Error> {
    let geocoder: DynGeocoder = match config {
        GeocoderConfig::Disabled => Arc::new(Disabled),
        GeocoderConfig::Nominatim {
            base_url,
            user_agent,
            timeout,
        } => Arc::new(Nominatim::new(base_url, user_agent, *timeout)?),
        GeocoderConfig::GoogleMaps {
            api_base,
            api_key,
            timeout,
        } => Arc::new(GoogleMaps::new(api_base, api_key, *timeout)?),
    };

    Ok(geocoder)
}
