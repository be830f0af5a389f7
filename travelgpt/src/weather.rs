use miette::{miette, IntoDiagnostic, Result};
use serde::Deserialize;

const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeatherMap current conditions.
pub(crate) struct Weather {
    http: reqwest::Client,
    key: String,
}

#[derive(Deserialize, Debug)]
struct CurrentWeather {
    #[serde(default)]
    weather: Vec<Condition>,
    main: Readings,
}

#[derive(Deserialize, Debug)]
struct Condition {
    description: String,
}

#[derive(Deserialize, Debug)]
struct Readings {
    temp: f64,
}

impl CurrentWeather {
    fn note(&self) -> Option<String> {
        let condition = self.weather.first()?;
        Some(format!("{}, {}°C", condition.description, self.main.temp))
    }
}

impl Weather {
    pub(crate) fn new(http: reqwest::Client, key: &str) -> Self {
        Self {
            http,
            key: key.to_owned(),
        }
    }

    pub(crate) async fn current_note(&self, lat: f64, lon: f64) -> Result<String> {
        let response = self
            .http
            .get(CURRENT_WEATHER_URL)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.key.clone()),
                ("units", "metric".to_owned()),
            ])
            .send()
            .await
            .into_diagnostic()?
            .error_for_status()
            .into_diagnostic()?;

        let body: CurrentWeather = response.json().await.into_diagnostic()?;

        body.note()
            .ok_or_else(|| miette!("OpenWeatherMap response had no conditions"))
    }
}
