use std::path::Path;

use tracing::{info, warn};

use crate::broker::{MqttPublisher, Publisher as _};
use crate::config::RunConfig;
use crate::error::AppResult;
use crate::generator::run_generator;
use crate::message::MessageFactory;
use crate::msglog::MessageLog;
use crate::shutdown::{setup_signal_shutdown_handler, shutdown_channel};

/// Wires the run together: shutdown signal, message log, broker session,
/// generation loop. Returns only after the broker connection has drained.
///
/// # Errors
///
/// Returns an error when the message log cannot be opened, the broker
/// session cannot be established, or the loop hits a fatal publish failure.
pub async fn run(config: RunConfig) -> AppResult<()> {
    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let mut message_log = MessageLog::open(Path::new(&config.message_log))?;
    let mut factory = MessageFactory::new(config.distribution);

    // No retry here: not reaching a ready session is fatal.
    let mut publisher = MqttPublisher::connect(&config).await?;
    info!(
        host = %config.host,
        port = config.port,
        topic = %config.topic,
        frequency_hz = config.frequency.get(),
        distribution = config.distribution.family(),
        "starting traffic generation"
    );

    let result = run_generator(
        &config,
        &mut factory,
        &mut publisher,
        &mut message_log,
        &mut shutdown_rx,
    )
    .await;

    if let Err(err) = publisher.close().await {
        warn!(reason = %err, "broker connection did not close cleanly");
    }

    // Wake the signal task if the loop ended on its own (count limit or
    // fatal error), then wait for it so no task outlives the run.
    drop(shutdown_tx.send(()));
    if let Err(err) = signal_handle.await {
        warn!(reason = %err, "signal handler task failed to join");
    }

    info!("exiting");
    result
}
