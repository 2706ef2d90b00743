use crate::config::toml_config::GeocoderConfig;
use crate::domain::model::Coordinate;
use crate::domain::ports::Geocoder;
use crate::utils::error::{AllocatorError, Result};
use crate::utils::validation::validate_api_key;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://geocode-maps.yandex.ru/1.x/";

#[derive(Debug, Deserialize)]
struct GeocodeEnvelope {
    response: GeocodeResponse,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    members: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: Point,
}

#[derive(Debug, Deserialize)]
struct Point {
    pos: String,
}

/// Geocoder backed by the Yandex HTTP geocoding API.
pub struct YandexGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl YandexGeocoder {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &GeocoderConfig) -> Result<Self> {
        let api_key = validate_api_key("geocoder.api_key", &config.api_key)?;
        Self::new(
            config.endpoint.clone(),
            api_key,
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

#[async_trait]
impl Geocoder for YandexGeocoder {
    async fn locate(&self, place: &str, language: &str) -> Result<Option<Coordinate>> {
        tracing::debug!("Requesting geocode for '{}' ({})", place, language);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("geocode", place),
                ("lang", language),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AllocatorError::GeocodingError {
                place: place.to_string(),
                message: format!("{} {}", status, body.trim()),
            });
        }

        let envelope: GeocodeEnvelope =
            response
                .json()
                .await
                .map_err(|e| AllocatorError::GeocodingError {
                    place: place.to_string(),
                    message: format!("unreadable response: {}", e),
                })?;

        match envelope.response.collection.members.first() {
            Some(member) => parse_position(place, &member.geo_object.point.pos).map(Some),
            None => Ok(None),
        }
    }
}

/// Parses a `"<longitude> <latitude>"` position string.
fn parse_position(place: &str, pos: &str) -> Result<Coordinate> {
    let malformed = || AllocatorError::GeocodingError {
        place: place.to_string(),
        message: format!("malformed position '{}'", pos),
    };

    let mut parts = pos.split_whitespace();
    let longitude: f64 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(malformed)?;
    let latitude: f64 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(malformed)?;

    Ok(Coordinate::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn geocoder(server: &MockServer) -> YandexGeocoder {
        YandexGeocoder::new(server.url("/1.x/"), "secret", Duration::from_secs(5)).unwrap()
    }

    fn found(pos: &str) -> serde_json::Value {
        serde_json::json!({
            "response": {
                "GeoObjectCollection": {
                    "featureMember": [
                        { "GeoObject": { "name": "Алматы", "Point": { "pos": pos } } },
                        { "GeoObject": { "name": "Алматы 2", "Point": { "pos": "0 0" } } }
                    ]
                }
            }
        })
    }

    #[tokio::test]
    async fn test_locate_reads_first_match() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/1.x/")
                    .query_param("apikey", "secret")
                    .query_param("geocode", "Алматы")
                    .query_param("lang", "ru_RU")
                    .query_param("format", "json");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(found("76.945465 43.238293"));
            })
            .await;

        let coordinate = geocoder(&server).locate("Алматы", "ru_RU").await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(coordinate, Some(Coordinate::new(43.238293, 76.945465)));
    }

    #[tokio::test]
    async fn test_locate_without_matches_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/1.x/");
                then.status(200).json_body(serde_json::json!({
                    "response": { "GeoObjectCollection": { "featureMember": [] } }
                }));
            })
            .await;

        let coordinate = geocoder(&server).locate("Нигде", "ru_RU").await.unwrap();
        assert_eq!(coordinate, None);
    }

    #[tokio::test]
    async fn test_locate_rejected_request_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/1.x/");
                then.status(403).body("Invalid api key");
            })
            .await;

        let err = geocoder(&server).locate("Алматы", "ru_RU").await.unwrap_err();
        match err {
            AllocatorError::GeocodingError { place, message } => {
                assert_eq!(place, "Алматы");
                assert!(message.contains("403"));
                assert!(message.contains("Invalid api key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_locate_malformed_payload_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/1.x/");
                then.status(200).json_body(found("76.945"));
            })
            .await;

        let result = geocoder(&server).locate("Алматы", "ru_RU").await;
        assert!(matches!(result, Err(AllocatorError::GeocodingError { .. })));
    }

    #[test]
    fn test_parse_position_order_is_longitude_first() {
        let coordinate = parse_position("Астана", "71.430411 51.128207").unwrap();
        assert_eq!(coordinate.latitude, 51.128207);
        assert_eq!(coordinate.longitude, 71.430411);
        assert!(parse_position("Астана", "").is_err());
        assert!(parse_position("Астана", "east north").is_err());
    }
}
