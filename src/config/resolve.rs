use std::num::NonZeroU32;

use crate::args::GeneratorArgs;
use crate::distribution::SizeDistribution;
use crate::error::{AppError, AppResult, ValidationError};
use crate::message::WireFormat;

/// Highest frequency that still yields a whole-millisecond tick period.
const MAX_FREQUENCY_HZ: u32 = 1000;

/// Immutable snapshot of everything the generation run needs. Built once at
/// startup from the merged CLI/config values; invalid combinations are
/// rejected here, before any connection is opened.
#[derive(Debug)]
pub struct RunConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub topic: String,
    pub frequency: NonZeroU32,
    pub distribution: SizeDistribution,
    pub wire_format: WireFormat,
    pub count: Option<u64>,
    pub message_log: String,
}

/// Validates merged arguments into a [`RunConfig`].
///
/// # Errors
///
/// Returns a validation error for a frequency outside 1-1000 Hz, an empty
/// topic, or distribution parameters that do not describe a valid law.
pub fn resolve_run_config(args: &GeneratorArgs) -> AppResult<RunConfig> {
    let frequency = NonZeroU32::new(args.frequency)
        .filter(|frequency| frequency.get() <= MAX_FREQUENCY_HZ)
        .ok_or_else(|| {
            AppError::validation(ValidationError::FrequencyOutOfRange {
                value: args.frequency,
            })
        })?;

    if args.topic.is_empty() {
        return Err(AppError::validation(ValidationError::TopicEmpty));
    }

    let distribution = SizeDistribution::from_params(args.distribution, args.par_a, args.par_b)
        .map_err(AppError::Validation)?;

    let wire_format = if args.envelope {
        WireFormat::Envelope
    } else {
        WireFormat::Raw
    };

    Ok(RunConfig {
        host: args.host.clone(),
        port: args.port,
        username: args.username.clone(),
        password: args.password.clone(),
        topic: args.topic.clone(),
        frequency,
        distribution,
        wire_format,
        count: args.count,
        message_log: args.message_log.clone(),
    })
}
