//! Best-effort enrichment lookups against an external flight information
//! provider. Core operations never depend on these answers: when the
//! provider is unconfigured, unreachable, or slow, the client serves a
//! deterministic generated payload for the same key instead.

use std::time::Duration;

use serde_json::{json, Value};

use crate::config::Config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoKind {
    Weather,
    FlightStatus,
    AirportInfo,
    BaggageTracking,
}

impl InfoKind {
    fn path_segment(&self) -> &'static str {
        match self {
            InfoKind::Weather => "weather",
            InfoKind::FlightStatus => "flights",
            InfoKind::AirportInfo => "airports",
            InfoKind::BaggageTracking => "tracking",
        }
    }
}

#[derive(Clone)]
pub struct FlightInfoClient {
    client: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl FlightInfoClient {
    pub fn new(config: &Config) -> Self {
        Self::from_parts(
            config.flight_info_base_url.clone(),
            config.flight_info_api_key.clone(),
            config.flight_info_timeout_secs,
        )
    }

    fn from_parts(base_url: Option<String>, api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Look up enrichment data for a key (airport code, flight number,
    /// baggage tag). Always yields a payload; the `source` field says
    /// whether it came from the provider or was generated locally.
    pub async fn fetch(&self, kind: InfoKind, key: &str) -> Value {
        let Some(base) = &self.base_url else {
            return generated_payload(kind, key);
        };

        match self.fetch_upstream(base, kind, key).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(
                    kind = kind.path_segment(),
                    key,
                    error = %err,
                    "Flight info provider lookup failed; serving generated payload"
                );
                generated_payload(kind, key)
            }
        }
    }

    async fn fetch_upstream(
        &self,
        base: &str,
        kind: InfoKind,
        key: &str,
    ) -> Result<Value, reqwest::Error> {
        let url = format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            kind.path_segment(),
            key
        );

        let mut request = self.client.get(&url);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-Api-Key", api_key);
        }

        let response = request.send().await?.error_for_status()?;
        response.json().await
    }
}

/// Stable payloads derived from the key alone, so repeated lookups agree
/// and tests can pin exact values.
fn generated_payload(kind: InfoKind, key: &str) -> Value {
    let seed = stable_seed(key);

    match kind {
        InfoKind::Weather => {
            let conditions = ["Clear", "Partly cloudy", "Overcast", "Rain", "Fog"];
            json!({
                "source": "generated",
                "airport": key,
                "condition": conditions[(seed % conditions.len() as u32) as usize],
                "temperature_c": (seed % 45) as i64 - 10,
                "wind_kts": (seed % 40) as i64,
            })
        }
        InfoKind::FlightStatus => {
            let phases = ["on_time", "delayed", "boarding", "en_route", "landed"];
            json!({
                "source": "generated",
                "flight_no": key,
                "phase": phases[(seed % phases.len() as u32) as usize],
                "delay_minutes": (seed % 90) as i64,
            })
        }
        InfoKind::AirportInfo => json!({
            "source": "generated",
            "code": key,
            "name": format!("{} International Airport", key),
            "terminals": (seed % 5) as i64 + 1,
            "timezone": "UTC",
        }),
        InfoKind::BaggageTracking => {
            let checkpoints = [
                "check-in desk",
                "sorting facility",
                "loading dock",
                "aircraft hold",
                "arrival carousel",
            ];
            json!({
                "source": "generated",
                "tag": key,
                "last_seen": checkpoints[(seed % checkpoints.len() as u32) as usize],
                "scans": (seed % 7) as i64 + 1,
            })
        }
    }
}

fn stable_seed(key: &str) -> u32 {
    key.bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_payloads_are_deterministic() {
        let first = generated_payload(InfoKind::Weather, "LAX");
        let second = generated_payload(InfoKind::Weather, "LAX");
        assert_eq!(first, second);
        assert_eq!(first["source"], "generated");
        assert_eq!(first["airport"], "LAX");
    }

    #[test]
    fn test_generated_payloads_vary_by_key() {
        let lax = generated_payload(InfoKind::AirportInfo, "LAX");
        let jfk = generated_payload(InfoKind::AirportInfo, "JFK");
        assert_ne!(lax["name"], jfk["name"]);
    }

    #[tokio::test]
    async fn test_unconfigured_client_serves_generated_payloads() {
        let client = FlightInfoClient::from_parts(None, None, 1);

        let payload = client.fetch(InfoKind::BaggageTracking, "BG000017").await;
        assert_eq!(payload["source"], "generated");
        assert_eq!(payload["tag"], "BG000017");
        assert_eq!(payload, generated_payload(InfoKind::BaggageTracking, "BG000017"));
    }
}
