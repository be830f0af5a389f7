use std::fmt::Debug;

use miette::Diagnostic;
use thiserror::Error;

use crate::{ItineraryEnvelope, TripRequest};

pub const ITINERARY_ROUTE: &str = "/api/itinerary";

/// Moves JSON between the client and the itinerary service.
///
/// `Ok(Ok(_))` is a successful HTTP response, `Ok(Err(_))` a non-success
/// response that still carried a JSON body. The service's `ok` flag decides
/// success, so an error status whose body says `ok: true` is still accepted.
#[allow(async_fn_in_trait)]
pub trait ClientTransport {
    type Error: std::error::Error + 'static;

    async fn send_request(
        &self,
        method: &str,
        route: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Result<serde_json::Value, serde_json::Value>, Self::Error>;
}

#[allow(async_fn_in_trait)]
pub trait ItineraryApi {
    type Error: std::error::Error;

    async fn generate_itinerary(
        &self,
        body: &TripRequest,
    ) -> Result<ItineraryEnvelope, Self::Error>;
}

impl<Transport> ItineraryApi for Transport
where
    Transport: ClientTransport,
{
    type Error = ClientError<Transport::Error>;

    async fn generate_itinerary(
        &self,
        body: &TripRequest,
    ) -> Result<ItineraryEnvelope, Self::Error> {
        let body = serde_json::to_value(body).map_err(ClientError::Serialization)?;

        let resp = self
            .send_request("post", ITINERARY_ROUTE, Some(body))
            .await
            .map_err(ClientError::Transport)?;

        match resp {
            Ok(resp) => serde_json::from_value(resp).map_err(ClientError::Deserialization),
            Err(resp) => match serde_json::from_value::<ItineraryEnvelope>(resp.clone()) {
                Ok(envelope) if envelope.ok => Ok(envelope),
                _ => Err(ClientError::Api(resp)),
            },
        }
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum ClientError<TransportError>
where
    TransportError: Debug + std::error::Error + 'static,
{
    #[error(transparent)]
    Transport(TransportError),
    #[error("could not decode itinerary response: {0}")]
    Deserialization(#[source] serde_json::Error),
    #[error("could not encode trip request: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("itinerary service returned an error: {0}")]
    Api(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use std::io;

    use serde_json::json;

    use super::*;

    #[test]
    fn client_errors_are_diagnostics() {
        let err: ClientError<io::Error> = ClientError::Api(json!({ "ok": false }));
        let diagnostic: &dyn Diagnostic = &err;

        assert_eq!(
            diagnostic.to_string(),
            r#"itinerary service returned an error: {"ok":false}"#
        );
    }
}
