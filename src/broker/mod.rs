//! Broker connection handling: a [`Publisher`] seam for the generation loop
//! and the MQTT implementation behind it.
mod packet;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::TcpStream;
use tracing::info;
use uuid::Uuid;

use crate::config::RunConfig;
use crate::error::BrokerError;

/// At-most-once publish target. The generation loop holds exactly one
/// publisher and drives it serially, so implementations take `&mut self`.
#[async_trait]
pub trait Publisher: Send {
    /// Fire-and-forget publish; no acknowledgment is awaited.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport rejects the write.
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), BrokerError>;

    /// Drains and closes the connection.
    ///
    /// # Errors
    ///
    /// Returns an error when the close handshake fails.
    async fn close(&mut self) -> Result<(), BrokerError>;
}

/// MQTT 3.1.1 publisher over a single long-lived TCP connection, QoS 0 only.
pub struct MqttPublisher {
    stream: TcpStream,
}

impl MqttPublisher {
    /// Connects to the broker and completes the CONNECT/CONNACK handshake.
    ///
    /// # Errors
    ///
    /// Returns an error when the TCP connection cannot be established, the
    /// handshake I/O fails, or the broker rejects the session.
    pub async fn connect(config: &RunConfig) -> Result<Self, BrokerError> {
        let addr = format!("{}:{}", config.host, config.port);
        let mut stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| BrokerError::Connect {
                addr: addr.clone(),
                source,
            })?;

        let client_id = Uuid::new_v4().to_string();
        let connect = packet::connect(
            &client_id,
            config.username.as_deref(),
            config.password.as_deref(),
        );
        stream
            .write_all(&connect)
            .await
            .map_err(|source| BrokerError::Handshake { source })?;

        let mut connack = [0_u8; 4];
        stream
            .read_exact(&mut connack)
            .await
            .map_err(|source| BrokerError::Handshake { source })?;
        match packet::connack_return_code(connack) {
            Some(packet::CONNACK_ACCEPTED) => {}
            Some(code) => return Err(BrokerError::ConnectionRefused { code }),
            None => {
                return Err(BrokerError::Handshake {
                    source: std::io::Error::other("expected a CONNACK packet"),
                });
            }
        }

        info!(%addr, %client_id, "broker session established");
        Ok(Self { stream })
    }
}

#[async_trait]
impl Publisher for MqttPublisher {
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), BrokerError> {
        let packet = packet::publish(topic, payload);
        self.stream
            .write_all(&packet)
            .await
            .map_err(|source| BrokerError::Publish { source })
    }

    async fn close(&mut self) -> Result<(), BrokerError> {
        self.stream
            .write_all(&packet::disconnect())
            .await
            .map_err(|source| BrokerError::Close { source })?;
        self.stream
            .shutdown()
            .await
            .map_err(|source| BrokerError::Close { source })
    }
}
