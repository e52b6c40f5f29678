use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write as _};
use std::path::Path;

use serde::Serialize;

use crate::error::AppResult;
use crate::message::Message;

/// One message-log line: everything needed to correlate a sent message with
/// what a consumer observed.
#[derive(Serialize)]
struct SentRecord<'a> {
    timestamp: &'a str,
    id: &'a str,
    payload_size: usize,
}

/// Append-only JSON-lines log of published messages.
///
/// This is an explicitly constructed handle owned by the lifecycle and lent
/// to the generation loop; nothing writes to it through global state.
pub struct MessageLog {
    writer: BufWriter<File>,
}

impl MessageLog {
    /// Opens (or creates) the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Appends one record for a successfully published message.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the file write fails.
    pub fn record(&mut self, message: &Message) -> AppResult<()> {
        serde_json::to_writer(
            &mut self.writer,
            &SentRecord {
                timestamp: &message.timestamp,
                id: &message.id,
                payload_size: message.payload.len(),
            },
        )?;
        self.writer.write_all(b"\n")?;
        // Flushed per record so the log survives an abrupt exit; the tick
        // rate is low enough that this does not matter for throughput.
        self.writer.flush()?;
        Ok(())
    }
}
