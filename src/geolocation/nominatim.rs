use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::error::GeolocationError;
use super::types::NamedLocation;

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, latitude: f64, longitude: f64)
        -> Result<NamedLocation, GeolocationError>;
}

/// Reverse lookups against a Nominatim instance (`/reverse?format=jsonv2`).
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    zoom: u8,
    language: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Option<BTreeMap<String, String>>,
}

impl NominatimGeocoder {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
        zoom: u8,
        language: impl Into<String>,
    ) -> Result<Self, GeolocationError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(GeolocationError::Request)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            zoom,
            language: language.into(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<NamedLocation, GeolocationError> {
        let response = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "jsonv2".to_string()),
                ("zoom", self.zoom.to_string()),
                ("accept-language", self.language.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeolocationError::Status(status));
        }
        let body = response.text().await?;
        parse_reverse_response(&body)
    }
}

fn parse_reverse_response(body: &str) -> Result<NamedLocation, GeolocationError> {
    let response: ReverseResponse = serde_json::from_str(body)?;
    if response.error.is_some() {
        // "Unable to geocode": nothing on land at this point
        return Ok(NamedLocation::Ocean);
    }
    match response.address {
        Some(address) if !address.is_empty() => Ok(NamedLocation::Place {
            display_name: response.display_name,
            address,
        }),
        _ => Ok(NamedLocation::Ocean),
    }
}
