use std::time::Duration;

use clap::Args;
use indoc::formatdoc;
use miette::{Context, IntoDiagnostic, Result};
use shared::{FreeText, Generated, Provider, TripRequest};
use tracing::{debug, info, warn};

use crate::geocode::Geocoder;
use crate::openai::completion::{CompletionRequest, CompletionResponse};
use crate::weather::Weather;

pub use crate::client::{HttpTransport, TransportError};

mod client;
mod gemini;
mod geocode;
mod openai;
pub mod rule_based;
mod weather;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Applies to geocoding and weather lookups, which only enrich the prompt.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(8);

/// Credentials for the optional upstream services. Any provider without a key
/// is skipped.
#[derive(Args, Debug, Clone)]
pub struct ProviderConfig {
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = gemini::DEFAULT_MODEL)]
    pub gemini_model: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "TOMTOM_KEY", hide_env_values = true)]
    pub tomtom_key: Option<String>,

    #[arg(long, env = "OPENWEATHER_KEY", hide_env_values = true)]
    pub openweather_key: Option<String>,
}

fn present(key: &Option<String>) -> Option<&str> {
    key.as_deref().map(str::trim).filter(|k| !k.is_empty())
}

/// Turns a [`TripRequest`] into an itinerary.
///
/// Providers are tried in order: Gemini, then OpenAI, then the rule-based
/// generator, which cannot fail. Upstream errors are logged and skipped.
pub struct Planner {
    geocoder: Option<Geocoder>,
    weather: Option<Weather>,
    gemini: Option<gemini::Client>,
    openai: Option<openai::Client>,
}

impl Planner {
    /// A planner that never leaves the process.
    pub fn offline() -> Self {
        Self {
            geocoder: None,
            weather: None,
            gemini: None,
            openai: None,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let lookups = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .into_diagnostic()
            .wrap_err("Could not build reqwest client")?;

        let geocoder = present(&config.tomtom_key).map(|key| Geocoder::new(lookups.clone(), key));
        let weather = present(&config.openweather_key).map(|key| Weather::new(lookups, key));
        let gemini = present(&config.gemini_api_key)
            .map(|key| gemini::Client::new(key, &config.gemini_model))
            .transpose()?;
        let openai = present(&config.openai_api_key)
            .map(|key| openai::Config::new(key).client())
            .transpose()?;

        info!(
            geocoding = geocoder.is_some(),
            weather = weather.is_some(),
            gemini = gemini.is_some(),
            openai = openai.is_some(),
            "itinerary providers configured"
        );

        Ok(Self {
            geocoder,
            weather,
            gemini,
            openai,
        })
    }

    pub async fn weather_note(&self, destination: &str) -> Option<String> {
        let geocoder = self.geocoder.as_ref()?;

        let place = match geocoder.geocode(destination).await {
            Ok(Some(place)) => place,
            Ok(None) => {
                debug!(destination, "no geocoding match");
                return None;
            }
            Err(err) => {
                warn!(destination, error = %err, "TomTom geocode failed");
                return None;
            }
        };
        debug!(destination, place = %place.name, "geocoded destination");

        let weather = self.weather.as_ref()?;
        match weather.current_note(place.lat, place.lon).await {
            Ok(note) => Some(note),
            Err(err) => {
                warn!(destination, error = %err, "weather fetch failed");
                None
            }
        }
    }

    pub async fn plan(&self, request: &TripRequest) -> Generated {
        let weather_note = self.weather_note(&request.destination).await;
        let prompt = prompt(request, weather_note.as_deref());

        if let Some(gemini) = &self.gemini {
            match gemini.generate(&prompt).await {
                Ok(text) => {
                    return Generated::FreeText(FreeText {
                        source: Provider::Gemini,
                        text,
                    })
                }
                Err(err) => warn!(error = %err, "Gemini generation failed"),
            }
        }

        if let Some(openai) = &self.openai {
            let answer = openai
                .completion(CompletionRequest::gpt_3_5_turbo(&prompt))
                .await
                .and_then(CompletionResponse::first_message);

            match answer {
                Ok(text) => {
                    return Generated::FreeText(FreeText {
                        source: Provider::OpenAi,
                        text,
                    })
                }
                Err(err) => warn!(error = %err, "OpenAI generation failed"),
            }
        }

        info!(
            destination = %request.destination,
            days = request.days,
            "using rule-based itinerary"
        );
        Generated::Structured(rule_based::generate(request, weather_note))
    }
}

pub fn prompt(request: &TripRequest, weather_note: Option<&str>) -> String {
    formatdoc!(
        "
        Create a {days}-day travel itinerary for {destination}. Interests: {interests}. Current weather: {weather}.
        Organize it day by day with morning, afternoon and evening suggestions.
        ",
        days = request.days,
        destination = request.destination,
        interests = request.interests,
        weather = weather_note.unwrap_or("unknown"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lisbon() -> TripRequest {
        TripRequest {
            destination: "Lisbon".to_owned(),
            days: 2,
            interests: "food".to_owned(),
        }
    }

    #[test]
    fn prompt_mentions_every_input() {
        let prompt = prompt(&lisbon(), Some("sunny, 24°C"));

        assert!(prompt.starts_with(
            "Create a 2-day travel itinerary for Lisbon. Interests: food. Current weather: sunny, 24°C."
        ));
    }

    #[test]
    fn prompt_without_weather() {
        assert!(prompt(&lisbon(), None).contains("Current weather: unknown."));
    }

    #[test]
    fn blank_keys_are_absent() {
        assert_eq!(present(&Some("  ".to_owned())), None);
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some(" abc ".to_owned())), Some("abc"));
    }

    #[tokio::test]
    async fn offline_planner_uses_rules() {
        let generated = Planner::offline().plan(&lisbon()).await;

        let Generated::Structured(plan) = generated else {
            panic!("expected a rule-based itinerary");
        };
        assert_eq!(plan.source.as_deref(), Some(rule_based::SOURCE));
        assert_eq!(plan.itinerary.map(|days| days.len()), Some(2));
    }

    #[tokio::test]
    async fn from_config_without_keys_is_offline() {
        let config = ProviderConfig {
            gemini_api_key: None,
            gemini_model: gemini::DEFAULT_MODEL.to_owned(),
            openai_api_key: Some(String::new()),
            tomtom_key: None,
            openweather_key: None,
        };
        let planner = Planner::from_config(&config).unwrap();

        assert!(planner.gemini.is_none());
        assert!(planner.openai.is_none());
        assert_eq!(planner.weather_note("Lisbon").await, None);
    }
}
