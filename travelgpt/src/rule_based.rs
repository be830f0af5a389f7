//! Offline itinerary generator built from canned activities.

use itertools::Itertools;
use shared::{DayPlan, ItineraryItem, StructuredItinerary, TripMeta, TripRequest};

pub const SOURCE: &str = "rule-based (offline)";

const FALLBACK_INTERESTS: [&str; 2] = ["culture", "food"];

const DEFAULT_ACTIVITIES: [&str; 4] = [
    "City highlights tour",
    "Local market visit",
    "Popular viewpoint",
    "Leisure time / cafe",
];

const EVENING_ACTIVITY: &str = "Local dining / explore nightlife";

fn activities_for(interest: &str) -> &'static [&'static str] {
    match interest {
        "nature" => &[
            "City park / nature reserve",
            "Hiking trail",
            "Scenic viewpoint",
            "Botanical garden",
        ],
        "culture" => &[
            "City museum",
            "Historic walking tour",
            "Art gallery",
            "Local market",
        ],
        "food" => &[
            "Food walking tour",
            "Local restaurant tasting",
            "Street food stalls",
            "Cooking class",
        ],
        "adventure" => &[
            "Kayaking / water sports",
            "Zipline / outdoor activity",
            "Cycling tour",
            "Rock climbing (guided)",
        ],
        "relax" => &[
            "Spa / wellness center",
            "Beach / lake day",
            "Cafe hop",
            "Sunset viewpoint",
        ],
        _ => &DEFAULT_ACTIVITIES,
    }
}

/// Lowercased, trimmed, non-empty interests. Never empty.
pub fn normalize_interests(interests: &str) -> Vec<String> {
    let interests = interests
        .split(',')
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .map(str::to_lowercase)
        .collect_vec();

    if interests.is_empty() {
        FALLBACK_INTERESTS.iter().map(|i| i.to_string()).collect()
    } else {
        interests
    }
}

/// Interests rotate round-robin across days. Each day gets a morning and an
/// afternoon pick from its interest's list, plus a fixed evening suggestion.
pub fn generate(request: &TripRequest, weather_note: Option<String>) -> StructuredItinerary {
    let interests = normalize_interests(&request.interests);

    let itinerary = (1..=request.days.max(0))
        .map(|day| {
            let n = day as usize;
            let interest = &interests[(n - 1) % interests.len()];
            let candidates = activities_for(interest);

            let first = candidates[(n * 2 - 2) % candidates.len()];
            let second = candidates[(n * 2 - 1) % candidates.len()];

            DayPlan {
                day: Some(day),
                items: Some(vec![
                    ItineraryItem::new("Morning", first),
                    ItineraryItem::new("Afternoon", second),
                    ItineraryItem::new("Evening", EVENING_ACTIVITY),
                ]),
            }
        })
        .collect();

    StructuredItinerary {
        meta: Some(TripMeta {
            destination: Some(request.destination.clone()),
            days: Some(request.days),
            weather_note,
            interests: Some(interests),
        }),
        itinerary: Some(itinerary),
        source: Some(SOURCE.to_owned()),
    }
}
