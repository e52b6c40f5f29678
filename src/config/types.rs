use serde::Deserialize;

use crate::args::DistributionFamily;

/// Optional config-file counterpart of the CLI arguments. Every field is
/// optional; CLI values take precedence during the merge.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub generation: Option<GenerationConfig>,
    pub envelope: Option<bool>,
    pub count: Option<u64>,
    pub message_log: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub topic: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerationConfig {
    /// Message generation frequency in Hz.
    pub frequency: Option<u32>,
    pub size: Option<SizeConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SizeConfig {
    pub distribution: Option<DistributionFamily>,
    /// First parameter of the chosen distribution.
    pub par_a: Option<f64>,
    /// Second parameter of the chosen distribution (normal only).
    pub par_b: Option<f64>,
}
