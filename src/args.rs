use clap::{Parser, ValueEnum};
use serde::Deserialize;

/// Named statistical law governing sampled message sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionFamily {
    Exponential,
    Normal,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Random MQTT traffic generator - publishes messages at a configurable rate with \
sizes drawn from exponential or normal distributions."
)]
pub struct GeneratorArgs {
    /// Path to a TOML or JSON config file
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Broker hostname or IP address
    #[arg(short = 'H', long = "host", default_value = "localhost")]
    pub host: String,

    /// Broker port
    #[arg(short = 'p', long = "port", default_value_t = 1883)]
    pub port: u16,

    /// Username for broker authentication
    #[arg(long = "username", env = "MQTTGEN_USERNAME")]
    pub username: Option<String>,

    /// Password for broker authentication
    #[arg(long = "password", env = "MQTTGEN_PASSWORD")]
    pub password: Option<String>,

    /// Topic to publish to
    #[arg(short = 't', long = "topic", default_value = "mqttgen/traffic")]
    pub topic: String,

    /// Message generation frequency in Hz (1-1000)
    #[arg(short = 'f', long = "frequency", default_value_t = 1)]
    pub frequency: u32,

    /// Message size distribution family
    #[arg(
        short = 'd',
        long = "distribution",
        value_enum,
        default_value_t = DistributionFamily::Exponential
    )]
    pub distribution: DistributionFamily,

    /// First distribution parameter (mean size for exponential, mu for normal)
    #[arg(long = "par-a", default_value_t = 1024.0)]
    pub par_a: f64,

    /// Second distribution parameter (standard deviation, required for normal)
    #[arg(long = "par-b")]
    pub par_b: Option<f64>,

    /// Wrap each payload in a JSON envelope {timestamp, payload, id}
    #[arg(long = "envelope")]
    pub envelope: bool,

    /// Stop after this many published messages (default: run until interrupted)
    #[arg(long = "count")]
    pub count: Option<u64>,

    /// Path of the per-message JSON log
    #[arg(long = "message-log", default_value = "messages.log")]
    pub message_log: String,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
