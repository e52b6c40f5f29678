use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::GeneratorArgs;

use super::types::ConfigFile;

/// Applies config-file values to CLI arguments. A value set on the command
/// line (or via environment variable) wins over the config file.
pub fn apply_config(args: &mut GeneratorArgs, matches: &ArgMatches, config: &ConfigFile) {
    if let Some(server) = config.server.as_ref() {
        if !is_explicit(matches, "host")
            && let Some(host) = server.host.clone()
        {
            args.host = host;
        }
        if !is_explicit(matches, "port")
            && let Some(port) = server.port
        {
            args.port = port;
        }
        if !is_explicit(matches, "username")
            && let Some(username) = server.username.clone()
        {
            args.username = Some(username);
        }
        if !is_explicit(matches, "password")
            && let Some(password) = server.password.clone()
        {
            args.password = Some(password);
        }
        if !is_explicit(matches, "topic")
            && let Some(topic) = server.topic.clone()
        {
            args.topic = topic;
        }
    }

    if let Some(generation) = config.generation.as_ref() {
        if !is_explicit(matches, "frequency")
            && let Some(frequency) = generation.frequency
        {
            args.frequency = frequency;
        }
        if let Some(size) = generation.size.as_ref() {
            if !is_explicit(matches, "distribution")
                && let Some(distribution) = size.distribution
            {
                args.distribution = distribution;
            }
            if !is_explicit(matches, "par_a")
                && let Some(par_a) = size.par_a
            {
                args.par_a = par_a;
            }
            if !is_explicit(matches, "par_b")
                && let Some(par_b) = size.par_b
            {
                args.par_b = Some(par_b);
            }
        }
    }

    if !is_explicit(matches, "envelope")
        && let Some(envelope) = config.envelope
    {
        args.envelope = envelope;
    }
    if !is_explicit(matches, "count")
        && let Some(count) = config.count
    {
        args.count = Some(count);
    }
    if !is_explicit(matches, "message_log")
        && let Some(path) = config.message_log.clone()
    {
        args.message_log = path;
    }
}

fn is_explicit(matches: &ArgMatches, id: &str) -> bool {
    matches!(
        matches.value_source(id),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}
