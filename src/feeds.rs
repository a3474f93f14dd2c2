//! Remote colour sources consumed by the feed effects
//!
//! Both feeds sit behind a trait so the effects can be exercised without a
//! network. Transport errors, HTTP error statuses and payload-shape
//! mismatches all fold into [FeedError]; the effects treat them identically.

use std::time::Duration;

use async_trait::async_trait;
use serde_derive::Deserialize;
use thiserror::Error;

/// CheerLights broadcast channel, see <https://cheerlights.com>
const CHEERLIGHTS_URL: &str = "http://api.thingspeak.com/channels/1417/field/2/last.json";
/// ANU Quantum Random Numbers Server, see <https://qrng.anu.edu.au>
const QUANTUM_URL: &str = "https://qrng.anu.edu.au/API/jsonI.php";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed payload: {0}")]
    MalformedPayload(&'static str),
}

/// Shared client with the bounded timeout both feeds rely on, so a stalled
/// server cannot hold up the frame cadence indefinitely.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}

/// A feed broadcasting one colour for the whole strip.
#[async_trait]
pub trait BroadcastSource: Send + Sync {
    /// The channel's current colour, as a hex triplet string.
    async fn current_colour(&self) -> Result<String, FeedError>;
}

/// A feed of hex-encoded 3-byte blocks, one per pixel.
#[async_trait]
pub trait BlockSource: Send + Sync {
    async fn blocks(&self, count: usize) -> Result<Vec<String>, FeedError>;
}

#[derive(Debug, Deserialize)]
struct CheerLightsPayload {
    field2: Option<String>,
}

pub struct CheerLightsFeed {
    client: reqwest::Client,
}

impl CheerLightsFeed {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BroadcastSource for CheerLightsFeed {
    async fn current_colour(&self) -> Result<String, FeedError> {
        let payload: CheerLightsPayload = self
            .client
            .get(CHEERLIGHTS_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        payload
            .field2
            .ok_or(FeedError::MalformedPayload("missing colour field"))
    }
}

#[derive(Debug, Deserialize)]
struct QuantumPayload {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<String>,
}

pub struct QuantumFeed {
    client: reqwest::Client,
}

impl QuantumFeed {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlockSource for QuantumFeed {
    async fn blocks(&self, count: usize) -> Result<Vec<String>, FeedError> {
        let length = count.to_string();
        let payload: QuantumPayload = self
            .client
            .get(QUANTUM_URL)
            .query(&[
                ("type", "hex16"),
                ("length", length.as_str()),
                ("size", "3"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !payload.success {
            return Err(FeedError::MalformedPayload("server reported failure"));
        }

        Ok(payload.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cheerlights_payload_shape() {
        let payload: CheerLightsPayload =
            serde_json::from_str(r##"{"created_at":"2020-01-01T00:00:00Z","field2":"#FF0000"}"##)
                .unwrap();
        assert_eq!(payload.field2.as_deref(), Some("#FF0000"));

        let empty: CheerLightsPayload = serde_json::from_str("{}").unwrap();
        assert!(empty.field2.is_none());
    }

    #[test]
    fn quantum_payload_shape() {
        let payload: QuantumPayload = serde_json::from_str(
            r#"{"type":"string","length":2,"size":3,"data":["ff0000","00ff00"],"success":true}"#,
        )
        .unwrap();
        assert!(payload.success);
        assert_eq!(payload.data, vec!["ff0000", "00ff00"]);

        // A failure response carries no data
        let failed: QuantumPayload = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!failed.success);
        assert!(failed.data.is_empty());
    }
}
