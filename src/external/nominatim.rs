//! OpenStreetMap Nominatim search client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    entities::Coordinates,
    error::{invalid_input_error, upstream_error, Error},
    external::Geocoder,
};

#[derive(Clone, Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[derive(Debug)]
pub struct Nominatim {
    client: reqwest::Client,
    base_url: String,
}

impl Nominatim {
    /// Nominatim's usage policy requires an identifying user agent on every request.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Option<Coordinates>, Error> {
        let url = format!("{}/search", self.base_url);

        let res = self
            .client
            .get(url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let results: Vec<SearchResult> = res.json().await?;

        let result = match results.into_iter().next() {
            Some(result) => result,
            None => return Ok(None),
        };

        let lat: f64 = result.lat.parse().map_err(|_| upstream_error())?;
        let lon: f64 = result.lon.parse().map_err(|_| upstream_error())?;

        tracing::debug!(place = ?result.display_name, lat, lon, "resolved place");

        Ok(Some(Coordinates::new(lat, lon)))
    }
}

#[async_trait]
impl Geocoder for Nominatim {
    async fn geocode(&self, query: &str) -> Option<Coordinates> {
        match self.search(query).await {
            Ok(coordinates) => coordinates,
            Err(err) => {
                tracing::warn!(%err, query, "nominatim lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> Nominatim {
        Nominatim::new(&server.uri(), "trip_tracker", Duration::from_millis(500)).unwrap()
    }

    #[tokio::test]
    async fn resolves_first_match() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Chicago, IL"))
            .and(query_param("format", "json"))
            .and(header("user-agent", "trip_tracker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "lat": "41.8755616", "lon": "-87.6244212", "display_name": "Chicago, Cook County, Illinois" },
                { "lat": "0", "lon": "0", "display_name": "somewhere else" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let coordinates = client(&server).geocode("Chicago, IL").await;

        assert_eq!(coordinates, Some(Coordinates::new(41.8755616, -87.6244212)));
    }

    #[tokio::test]
    async fn no_match_is_absent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let nominatim = client(&server);

        assert_eq!(nominatim.search("Atlantis").await.unwrap(), None);
        assert_eq!(nominatim.geocode("Atlantis").await, None);
    }

    #[tokio::test]
    async fn provider_failures_degrade_to_absent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "broken"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "lat": "north", "lon": "west" }
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(json!([])),
            )
            .mount(&server)
            .await;

        let nominatim = client(&server);

        let err = nominatim.search("broken").await.unwrap_err();
        assert_eq!(err.code, 4);

        assert_eq!(nominatim.geocode("broken").await, None);
        assert_eq!(nominatim.geocode("garbled").await, None);
        assert_eq!(nominatim.geocode("slow").await, None);
    }
}
