//! The itinerary request form controller.
//!
//! [`ItineraryController`] owns no DOM. It talks to the page through a
//! [`FormView`] and to the service through an [`ItineraryApi`], so the browser
//! app, the CLI, and tests can all drive the same submit/render cycle.

use std::cell::Cell;

use tracing::{debug, error, info};

use crate::api::ItineraryApi;
use crate::view::{self, Node};
use crate::{Generated, ItineraryEnvelope, TripRequest, DEFAULT_DAYS, DEFAULT_INTERESTS};

/// Raw, unvalidated form field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub destination: String,
    pub days: String,
    pub interests: String,
}

impl FormInput {
    pub fn sample() -> Self {
        Self {
            destination: "Bali, Indonesia".to_owned(),
            days: "4".to_owned(),
            interests: "nature, relax, food".to_owned(),
        }
    }

    /// Apply the input defaults. Nothing here rejects input.
    pub fn to_request(&self) -> TripRequest {
        let interests = if self.interests.is_empty() {
            DEFAULT_INTERESTS.to_owned()
        } else {
            self.interests.clone()
        };

        TripRequest {
            destination: self.destination.clone(),
            days: parse_days(&self.days),
            interests,
        }
    }
}

/// Reads the leading integer of `raw`, so `"4"`, `" 4 days"` and `"4.5"` all
/// give 4. Anything without leading digits gives [`DEFAULT_DAYS`].
pub fn parse_days(raw: &str) -> i64 {
    parse_leading_int(raw).unwrap_or(DEFAULT_DAYS)
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..end].parse().ok()?;

    Some(if negative { -value } else { value })
}

/// The page as the controller sees it: three input fields and a result area.
pub trait FormView {
    fn read_form(&self) -> FormInput;

    fn write_form(&self, input: &FormInput);

    /// Replace the whole result area.
    fn show(&self, node: Node);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rendered,
    Failed,
    /// A newer submission started while this one was in flight. Its response
    /// was dropped without touching the result area.
    Superseded,
}

pub struct ItineraryController<C, V> {
    client: C,
    view: V,
    latest: Cell<u64>,
}

impl<C, V> ItineraryController<C, V>
where
    C: ItineraryApi,
    V: FormView,
{
    pub fn new(client: C, view: V) -> Self {
        Self {
            client,
            view,
            latest: Cell::new(0),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn populate_sample(&self) {
        self.view.write_form(&FormInput::sample());
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let request = self.view.read_form().to_request();
        self.submit_request(request).await
    }

    pub async fn submit_request(&self, request: TripRequest) -> SubmitOutcome {
        let seq = self.latest.get() + 1;
        self.latest.set(seq);

        self.view.show(view::progress());
        info!(seq, ?request, "submitting itinerary request");

        let result = self.client.generate_itinerary(&request).await;

        let latest = self.latest.get();
        if seq != latest {
            debug!(seq, latest, "dropping response for superseded request");
            return SubmitOutcome::Superseded;
        }

        match result {
            Ok(ItineraryEnvelope {
                ok: true,
                generated,
            }) => {
                self.render(generated.as_ref());
                SubmitOutcome::Rendered
            }
            Ok(envelope) => {
                error!(seq, ?envelope, "itinerary service did not report success");
                self.view.show(view::failure());
                SubmitOutcome::Failed
            }
            Err(err) => {
                error!(seq, error = %err, "itinerary request failed");
                self.view.show(view::failure());
                SubmitOutcome::Failed
            }
        }
    }

    pub fn render(&self, generated: Option<&Generated>) {
        self.view.show(view::render(generated));
    }
}
