use clap::{ArgMatches, CommandFactory as _, FromArgMatches as _};
use tracing::debug;

use crate::args::GeneratorArgs;
use crate::config;
use crate::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose);

    if let Some(config_file) = config::load_config(args.config.as_deref())? {
        config::apply_config(&mut args, &matches, &config_file);
    }
    let run_config = config::resolve_run_config(&args)?;
    debug!(
        host = %run_config.host,
        port = run_config.port,
        topic = %run_config.topic,
        frequency_hz = run_config.frequency.get(),
        distribution = run_config.distribution.family(),
        envelope = ?run_config.wire_format,
        "resolved run configuration"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(crate::lifecycle::run(run_config))
}

fn parse_args() -> AppResult<(GeneratorArgs, ArgMatches)> {
    let matches = GeneratorArgs::command().get_matches();
    let args = GeneratorArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}
