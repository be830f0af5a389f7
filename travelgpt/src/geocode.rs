use miette::{miette, IntoDiagnostic, Result};
use reqwest::Url;
use serde::Deserialize;

const GEOCODE_BASE: &str = "https://api.tomtom.com/search/2/geocode";

#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// TomTom search API geocoder.
pub(crate) struct Geocoder {
    http: reqwest::Client,
    key: String,
}

#[derive(Deserialize, Debug)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize, Debug)]
struct GeocodeResult {
    position: Position,
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Deserialize, Debug)]
struct Position {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize, Debug)]
struct Address {
    #[serde(rename = "freeformAddress", default)]
    freeform_address: Option<String>,
}

impl GeocodeResponse {
    fn first_place(self, query: &str) -> Option<Place> {
        let result = self.results.into_iter().next()?;
        let name = result
            .address
            .and_then(|a| a.freeform_address)
            .unwrap_or_else(|| query.to_owned());

        Some(Place {
            name,
            lat: result.position.lat,
            lon: result.position.lon,
        })
    }
}

fn geocode_url(query: &str) -> Result<Url> {
    let mut url = Url::parse(GEOCODE_BASE).into_diagnostic()?;
    url.path_segments_mut()
        .map_err(|_| miette!("{GEOCODE_BASE} cannot be a base url"))?
        .push(&format!("{query}.json"));
    Ok(url)
}

impl Geocoder {
    pub(crate) fn new(http: reqwest::Client, key: &str) -> Self {
        Self {
            http,
            key: key.to_owned(),
        }
    }

    pub(crate) async fn geocode(&self, query: &str) -> Result<Option<Place>> {
        let response = self
            .http
            .get(geocode_url(query)?)
            .query(&[("key", self.key.as_str()), ("limit", "1")])
            .send()
            .await
            .into_diagnostic()?
            .error_for_status()
            .into_diagnostic()?;

        let body: GeocodeResponse = response.json().await.into_diagnostic()?;

        Ok(body.first_place(query))
    }
}
