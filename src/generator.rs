use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::{Instant, interval_at};
use tracing::{debug, error, info, warn};

use crate::broker::Publisher;
use crate::config::RunConfig;
use crate::error::{AppError, AppResult};
use crate::message::MessageFactory;
use crate::msglog::MessageLog;
use crate::shutdown::ShutdownReceiver;

/// Drives the fixed-period generation loop until shutdown (or the optional
/// message count limit) and returns once no further ticks will run.
///
/// The loop is single-flight: tick *n*'s publish call returns before tick
/// *n+1* starts, so messages leave in strict tick order. Shutdown is checked
/// before committing to a tick, so a signal that races a ready tick wins.
///
/// # Errors
///
/// Returns an error only for a publish failure while shutdown is not in
/// progress; such a failure indicates a broken transport the loop cannot
/// recover from. A failed message build skips the tick and keeps running.
pub async fn run_generator<P: Publisher>(
    config: &RunConfig,
    factory: &mut MessageFactory,
    publisher: &mut P,
    message_log: &mut MessageLog,
    shutdown_rx: &mut ShutdownReceiver,
) -> AppResult<()> {
    let period = Duration::from_millis(u64::from(1000 / config.frequency.get()));
    let mut ticker = interval_at(Instant::now() + period, period);
    let mut published: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => {
                info!(published, "shutdown requested, draining");
                break;
            }
            _ = ticker.tick() => {
                let message = match factory.build() {
                    Ok(message) => message,
                    Err(err) => {
                        error!(reason = %err, "failed to generate message payload");
                        continue;
                    }
                };
                let wire = match message.encode(config.wire_format) {
                    Ok(wire) => wire,
                    Err(err) => {
                        error!(id = %message.id, reason = %err, "failed to encode message");
                        continue;
                    }
                };
                if let Err(err) = publisher.publish(&config.topic, &wire).await {
                    if shutdown_requested(shutdown_rx) {
                        debug!(id = %message.id, reason = %err, "publish failed during shutdown, draining");
                        break;
                    }
                    error!(id = %message.id, reason = %err, "publish failed while connected");
                    return Err(AppError::Broker(err));
                }
                if let Err(err) = message_log.record(&message) {
                    warn!(id = %message.id, reason = %err, "failed to write message log record");
                }
                debug!(id = %message.id, payload_size = message.payload.len(), "message published");
                published += 1;
                if let Some(limit) = config.count
                    && published >= limit
                {
                    info!(published, "message count limit reached");
                    break;
                }
            }
        }
    }

    Ok(())
}

fn shutdown_requested(shutdown_rx: &mut ShutdownReceiver) -> bool {
    matches!(
        shutdown_rx.try_recv(),
        Ok(()) | Err(TryRecvError::Lagged(_) | TryRecvError::Closed)
    )
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::num::NonZeroU32;

    use async_trait::async_trait;

    use super::*;
    use crate::args::DistributionFamily;
    use crate::distribution::SizeDistribution;
    use crate::error::BrokerError;
    use crate::message::WireFormat;
    use crate::shutdown::{ShutdownSender, shutdown_channel};

    /// Publisher that records every call and can start failing after a set
    /// number of successes, optionally broadcasting shutdown first (to model
    /// a transport torn down by the shutdown path).
    #[derive(Default)]
    struct MockPublisher {
        published: Vec<(Instant, Vec<u8>)>,
        fail_from: Option<usize>,
        shutdown_on_failure: Option<ShutdownSender>,
    }

    #[async_trait]
    impl Publisher for MockPublisher {
        async fn publish(&mut self, _topic: &str, payload: &[u8]) -> Result<(), BrokerError> {
            if let Some(limit) = self.fail_from
                && self.published.len() >= limit
            {
                if let Some(shutdown_tx) = self.shutdown_on_failure.as_ref() {
                    drop(shutdown_tx.send(()));
                }
                return Err(BrokerError::Publish {
                    source: std::io::Error::other("mock transport failure"),
                });
            }
            self.published.push((Instant::now(), payload.to_vec()));
            Ok(())
        }

        async fn close(&mut self) -> Result<(), BrokerError> {
            Ok(())
        }
    }

    fn run_paused_test<F>(future: F) -> AppResult<()>
    where
        F: Future<Output = AppResult<()>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()?;
        runtime.block_on(future)
    }

    fn test_config(frequency: u32, count: Option<u64>) -> AppResult<RunConfig> {
        Ok(RunConfig {
            host: "localhost".to_owned(),
            port: 1883,
            username: None,
            password: None,
            topic: "test/topic".to_owned(),
            frequency: NonZeroU32::new(frequency).ok_or(AppError::Validation(
                crate::error::ValidationError::FrequencyOutOfRange { value: frequency },
            ))?,
            distribution: SizeDistribution::from_params(
                DistributionFamily::Exponential,
                2.0,
                None,
            )
            .map_err(AppError::Validation)?,
            wire_format: WireFormat::Raw,
            count,
            message_log: "messages.log".to_owned(),
        })
    }

    fn test_log(dir: &tempfile::TempDir) -> AppResult<MessageLog> {
        Ok(MessageLog::open(&dir.path().join("messages.log"))?)
    }

    #[test]
    fn ten_hz_for_one_virtual_second_publishes_exactly_ten() -> AppResult<()> {
        run_paused_test(async {
            let config = test_config(10, None)?;
            let dir = tempfile::tempdir()?;
            let mut message_log = test_log(&dir)?;
            let mut factory = MessageFactory::new(config.distribution);
            let mut publisher = MockPublisher::default();
            let (shutdown_tx, mut shutdown_rx) = shutdown_channel();

            let shutdown_after_one_second = async {
                tokio::time::sleep(Duration::from_millis(1050)).await;
                drop(shutdown_tx.send(()));
            };
            let (result, ()) = tokio::join!(
                run_generator(
                    &config,
                    &mut factory,
                    &mut publisher,
                    &mut message_log,
                    &mut shutdown_rx,
                ),
                shutdown_after_one_second,
            );
            result?;

            assert_eq!(publisher.published.len(), 10);
            drop(message_log);
            let content = std::fs::read_to_string(dir.path().join("messages.log"))?;
            assert_eq!(content.lines().count(), 10);
            Ok(())
        })
    }

    #[test]
    fn ticks_are_strictly_periodic_and_serial() -> AppResult<()> {
        run_paused_test(async {
            let config = test_config(10, Some(5))?;
            let dir = tempfile::tempdir()?;
            let mut message_log = test_log(&dir)?;
            let mut factory = MessageFactory::new(config.distribution);
            let mut publisher = MockPublisher::default();
            let (_shutdown_tx, mut shutdown_rx) = shutdown_channel();

            run_generator(
                &config,
                &mut factory,
                &mut publisher,
                &mut message_log,
                &mut shutdown_rx,
            )
            .await?;

            assert_eq!(publisher.published.len(), 5);
            let period = Duration::from_millis(100);
            for pair in publisher.published.windows(2) {
                let [(previous, _), (current, _)] = pair else {
                    continue;
                };
                assert_eq!(current.duration_since(*previous), period);
            }
            Ok(())
        })
    }

    #[test]
    fn shutdown_wins_over_a_ready_tick() -> AppResult<()> {
        run_paused_test(async {
            let config = test_config(10, None)?;
            let dir = tempfile::tempdir()?;
            let mut message_log = test_log(&dir)?;
            let mut factory = MessageFactory::new(config.distribution);
            let mut publisher = MockPublisher::default();
            let (shutdown_tx, mut shutdown_rx) = shutdown_channel();

            // Signal before the loop starts: the first tick is also ready
            // immediately, but shutdown must take priority.
            drop(shutdown_tx.send(()));
            run_generator(
                &config,
                &mut factory,
                &mut publisher,
                &mut message_log,
                &mut shutdown_rx,
            )
            .await?;

            assert!(publisher.published.is_empty());
            Ok(())
        })
    }

    #[test]
    fn publish_failure_before_shutdown_is_fatal() -> AppResult<()> {
        run_paused_test(async {
            let config = test_config(10, None)?;
            let dir = tempfile::tempdir()?;
            let mut message_log = test_log(&dir)?;
            let mut factory = MessageFactory::new(config.distribution);
            let mut publisher = MockPublisher {
                fail_from: Some(2),
                ..MockPublisher::default()
            };
            let (_shutdown_tx, mut shutdown_rx) = shutdown_channel();

            let result = run_generator(
                &config,
                &mut factory,
                &mut publisher,
                &mut message_log,
                &mut shutdown_rx,
            )
            .await;

            assert!(matches!(result, Err(AppError::Broker(_))));
            assert_eq!(publisher.published.len(), 2);
            Ok(())
        })
    }

    #[test]
    fn publish_failure_during_shutdown_is_tolerated() -> AppResult<()> {
        run_paused_test(async {
            let config = test_config(10, None)?;
            let dir = tempfile::tempdir()?;
            let mut message_log = test_log(&dir)?;
            let mut factory = MessageFactory::new(config.distribution);
            let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
            let mut publisher = MockPublisher {
                fail_from: Some(3),
                shutdown_on_failure: Some(shutdown_tx),
                ..MockPublisher::default()
            };

            run_generator(
                &config,
                &mut factory,
                &mut publisher,
                &mut message_log,
                &mut shutdown_rx,
            )
            .await?;

            assert_eq!(publisher.published.len(), 3);
            Ok(())
        })
    }

    #[test]
    fn count_limit_ends_the_run_without_shutdown() -> AppResult<()> {
        run_paused_test(async {
            let config = test_config(100, Some(7))?;
            let dir = tempfile::tempdir()?;
            let mut message_log = test_log(&dir)?;
            let mut factory = MessageFactory::new(config.distribution);
            let mut publisher = MockPublisher::default();
            let (_shutdown_tx, mut shutdown_rx) = shutdown_channel();

            run_generator(
                &config,
                &mut factory,
                &mut publisher,
                &mut message_log,
                &mut shutdown_rx,
            )
            .await?;

            assert_eq!(publisher.published.len(), 7);
            Ok(())
        })
    }
}
