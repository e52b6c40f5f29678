use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{SecondsFormat, Utc};
use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore as _, SeedableRng as _};
use serde::Serialize;
use uuid::Uuid;

use crate::distribution::SizeDistribution;

/// Wire encoding of an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// JSON envelope `{"timestamp": ..., "payload": base64, "id": ...}`.
    Envelope,
    /// The payload bytes with no wrapper.
    Raw,
}

/// One generated message: created per tick, published once, then discarded.
#[derive(Debug)]
pub struct Message {
    /// RFC3339 UTC timestamp with nanosecond precision.
    pub timestamp: String,
    pub payload: Vec<u8>,
    /// UUIDv4, unique per message.
    pub id: String,
}

#[derive(Serialize)]
struct Envelope<'a> {
    timestamp: &'a str,
    payload: String,
    id: &'a str,
}

impl Message {
    /// Serializes the message for the wire.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON envelope cannot be serialized.
    pub fn encode(&self, format: WireFormat) -> serde_json::Result<Vec<u8>> {
        match format {
            WireFormat::Raw => Ok(self.payload.clone()),
            WireFormat::Envelope => serde_json::to_vec(&Envelope {
                timestamp: &self.timestamp,
                payload: BASE64.encode(&self.payload),
                id: &self.id,
            }),
        }
    }
}

/// Builds messages with payload sizes drawn from the configured distribution.
///
/// Size sampling uses a fast non-secure RNG; payload bytes come from the OS
/// entropy source, which is the only fallible step.
pub struct MessageFactory {
    distribution: SizeDistribution,
    size_rng: SmallRng,
}

impl MessageFactory {
    pub fn new(distribution: SizeDistribution) -> Self {
        Self {
            distribution,
            size_rng: SmallRng::from_entropy(),
        }
    }

    /// Builds one message with a freshly sampled payload size.
    ///
    /// # Errors
    ///
    /// Returns an error when the secure random source cannot fill the
    /// payload buffer.
    pub fn build(&mut self) -> Result<Message, rand::Error> {
        let size = self.distribution.sample(&mut self.size_rng);
        let mut payload = vec![0_u8; size];
        OsRng.try_fill_bytes(&mut payload)?;
        Ok(Message {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
            payload,
            id: Uuid::new_v4().to_string(),
        })
    }
}
