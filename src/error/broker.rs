use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Broker handshake failed: {source}")]
    Handshake {
        #[source]
        source: std::io::Error,
    },
    #[error("Broker rejected the connection (CONNACK return code {code}).")]
    ConnectionRefused { code: u8 },
    #[error("Publish failed: {source}")]
    Publish {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to close the broker connection: {source}")]
    Close {
        #[source]
        source: std::io::Error,
    },
}
