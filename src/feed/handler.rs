//! JSON-lines feed transport
//!
//! Input layers write one `ClientMsg` per line; renderers read one
//! `ServerMsg` per line.

use std::io::BufRead;
use std::thread;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use super::protocol::{ClientMsg, ServerMsg};
use super::FeedError;

/// Forward input lines to the match on a dedicated thread
///
/// Blocking reads stay off the runtime so a silent input source never holds
/// up shutdown. The sender is dropped at EOF, which the match sees as a
/// disconnect.
pub fn spawn_reader<R>(
    reader: R,
    input_tx: mpsc::Sender<ClientMsg>,
) -> thread::JoinHandle<Result<(), FeedError>>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || read_inputs(reader, input_tx))
}

fn read_inputs<R: BufRead>(reader: R, input_tx: mpsc::Sender<ClientMsg>) -> Result<(), FeedError> {
    for line in reader.lines() {
        let Some(msg) = parse_line(&line?) else {
            continue;
        };

        if input_tx.blocking_send(msg).is_err() {
            debug!("Input channel closed");
            return Ok(());
        }
    }

    info!("Input feed reached EOF");
    Ok(())
}

/// Parse one input line; blank and malformed lines yield nothing
pub fn parse_line(line: &str) -> Option<ClientMsg> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str(line) {
        Ok(msg) => Some(msg),
        Err(e) => {
            warn!(error = %e, "Failed to parse client message");
            None
        }
    }
}

/// Write match messages as JSON lines until the match ends
pub async fn write_messages<W>(
    mut writer: W,
    mut rx: broadcast::Receiver<ServerMsg>,
    emit_snapshots: bool,
) -> Result<(), FeedError>
where
    W: AsyncWrite + Unpin,
{
    loop {
        match rx.recv().await {
            Ok(msg) => {
                if !emit_snapshots && matches!(msg, ServerMsg::Snapshot { .. }) {
                    continue;
                }

                send_msg(&mut writer, &msg).await?;

                if matches!(msg, ServerMsg::MatchEnd { .. }) {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(lagged_count = n, "Renderer lagged, skipping {} messages", n);
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("Message channel closed");
                break;
            }
        }
    }

    Ok(())
}

/// Send a message as one JSON line
async fn send_msg<W>(writer: &mut W, msg: &ServerMsg) -> Result<(), FeedError>
where
    W: AsyncWrite + Unpin,
{
    let mut json = serde_json::to_string(msg)?;
    json.push('\n');
    writer.write_all(json.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
