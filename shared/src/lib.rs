use serde::{de, Deserialize, Deserializer, Serialize};

pub mod api;
pub mod controller;
pub mod view;

pub const DEFAULT_DAYS: i64 = 3;
pub const DEFAULT_INTERESTS: &str = "culture, food";
pub const DEFAULT_DESTINATION: &str = "Unknown";

/// Body of `POST /api/itinerary`.
///
/// The client always sends every field. The serde defaults only apply when the
/// service receives a partial body.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    #[serde(default = "default_destination")]
    pub destination: String,
    #[serde(default = "default_days")]
    pub days: i64,
    #[serde(default = "default_interests")]
    pub interests: String,
}

fn default_destination() -> String {
    DEFAULT_DESTINATION.to_owned()
}

fn default_days() -> i64 {
    DEFAULT_DAYS
}

fn default_interests() -> String {
    DEFAULT_INTERESTS.to_owned()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ItineraryEnvelope {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, deserialize_with = "falsy_as_none")]
    pub generated: Option<Generated>,
}

/// `null`, `false`, `0` and `""` all mean "nothing was generated".
fn falsy_as_none<'de, D>(deserializer: D) -> Result<Option<Generated>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    let falsy = match &value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => true,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    };
    if falsy {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(de::Error::custom)
}

/// Reads a sequence, dropping `null` elements.
fn skip_nulls<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let elements = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(elements.map(|elements| elements.into_iter().flatten().collect()))
}

impl ItineraryEnvelope {
    pub fn success(generated: Generated) -> Self {
        Self {
            ok: true,
            generated: Some(generated),
        }
    }
}

/// Providers whose output is a single block of prose.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Gemini,
}

impl Provider {
    pub fn from_source(source: &str) -> Option<Self> {
        match source {
            "openai" => Some(Self::OpenAi),
            "gemini" => Some(Self::Gemini),
            _ => None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FreeText {
    pub source: Provider,
    pub text: String,
}

/// A day-by-day itinerary. Every field is optional on the wire and rendering
/// falls back to placeholders for anything missing.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredItinerary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<TripMeta>,
    #[serde(
        default,
        deserialize_with = "skip_nulls",
        skip_serializing_if = "Option::is_none"
    )]
    pub itinerary: Option<Vec<DayPlan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TripMeta {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub days: Option<i64>,
    #[serde(default)]
    pub weather_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    #[serde(default)]
    pub day: Option<i64>,
    #[serde(default, deserialize_with = "skip_nulls")]
    pub items: Option<Vec<ItineraryItem>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ItineraryItem {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
}

impl ItineraryItem {
    pub fn new(time: impl Into<String>, activity: impl Into<String>) -> Self {
        Self {
            time: Some(time.into()),
            activity: Some(activity.into()),
        }
    }
}

/// The `generated` payload. A recognized free-text `source` selects
/// [`Generated::FreeText`]; anything else is read as a structured itinerary.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Generated {
    FreeText(FreeText),
    Structured(StructuredItinerary),
}

#[derive(Deserialize)]
struct RawGenerated {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    meta: Option<TripMeta>,
    #[serde(default, deserialize_with = "skip_nulls")]
    itinerary: Option<Vec<DayPlan>>,
}

impl<'de> Deserialize<'de> for Generated {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawGenerated::deserialize(deserializer)?;

        match raw.source.as_deref().and_then(Provider::from_source) {
            Some(source) => {
                let text = raw
                    .text
                    .ok_or_else(|| <D::Error as de::Error>::missing_field("text"))?;
                Ok(Self::FreeText(FreeText { source, text }))
            }
            None => Ok(Self::Structured(StructuredItinerary {
                meta: raw.meta,
                itinerary: raw.itinerary,
                source: raw.source,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn recognized_source_is_free_text() {
        let generated: Generated =
            serde_json::from_value(json!({ "source": "gemini", "text": "Day 1: beach" })).unwrap();

        assert_eq!(
            generated,
            Generated::FreeText(FreeText {
                source: Provider::Gemini,
                text: "Day 1: beach".to_owned()
            })
        );
    }

    #[test]
    fn free_text_without_text_is_rejected() {
        let result = serde_json::from_value::<Generated>(json!({ "source": "openai" }));

        assert!(result.is_err());
    }

    #[test]
    fn unknown_source_is_structured() {
        let generated: Generated = serde_json::from_value(json!({
            "source": "rule-based (offline)",
            "meta": { "destination": "Lisbon", "days": 1, "weather_note": null },
            "itinerary": [{ "day": 1, "items": [{ "time": "Morning", "activity": "Tram 28" }] }]
        }))
        .unwrap();

        let Generated::Structured(structured) = generated else {
            panic!("expected a structured itinerary");
        };
        assert_eq!(structured.source.as_deref(), Some("rule-based (offline)"));
        assert_eq!(
            structured.meta.and_then(|m| m.destination).as_deref(),
            Some("Lisbon")
        );
        assert_eq!(structured.itinerary.map(|days| days.len()), Some(1));
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let envelope: ItineraryEnvelope = serde_json::from_value(json!({})).unwrap();

        assert!(!envelope.ok);
        assert!(envelope.generated.is_none());

        let envelope: ItineraryEnvelope =
            serde_json::from_value(json!({ "ok": true, "generated": null })).unwrap();
        assert!(envelope.ok);
        assert!(envelope.generated.is_none());
    }

    #[test]
    fn falsy_payloads_are_absent() {
        for generated in [json!(false), json!(0), json!(""), json!(null)] {
            let envelope: ItineraryEnvelope =
                serde_json::from_value(json!({ "ok": true, "generated": generated })).unwrap();

            assert!(envelope.ok);
            assert_eq!(envelope.generated, None, "generated: {generated}");
        }
    }

    #[test]
    fn truthy_non_object_payload_is_rejected() {
        let result =
            serde_json::from_value::<ItineraryEnvelope>(json!({ "ok": true, "generated": "yes" }));

        assert!(result.is_err());
    }

    #[test]
    fn null_days_and_items_are_skipped() {
        let generated: Generated = serde_json::from_value(json!({
            "itinerary": [null, { "day": 1, "items": [null, { "time": null, "activity": "Colosseum" }] }]
        }))
        .unwrap();

        let Generated::Structured(structured) = generated else {
            panic!("expected a structured itinerary");
        };
        assert_eq!(
            structured.itinerary,
            Some(vec![DayPlan {
                day: Some(1),
                items: Some(vec![ItineraryItem {
                    time: None,
                    activity: Some("Colosseum".to_owned()),
                }]),
            }])
        );
    }

    #[test]
    fn partial_trip_request_gets_defaults() {
        let request: TripRequest = serde_json::from_value(json!({ "destination": "Oslo" })).unwrap();

        assert_eq!(request.destination, "Oslo");
        assert_eq!(request.days, DEFAULT_DAYS);
        assert_eq!(request.interests, DEFAULT_INTERESTS);
    }

    #[test]
    fn free_text_serializes_flat() {
        let envelope = ItineraryEnvelope::success(Generated::FreeText(FreeText {
            source: Provider::OpenAi,
            text: "hello".to_owned(),
        }));

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "ok": true, "generated": { "source": "openai", "text": "hello" } })
        );
    }
}
