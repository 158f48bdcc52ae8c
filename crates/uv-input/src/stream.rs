//! Async streaming wrapper around [`Decoder`] (`spec.md` §4.1 "Streaming
//! behavior"). Shutdown signaling, the `select!` loop shape, and the exit-
//! reason telemetry are grounded on the teacher's async input task.

use crate::decoder::Decoder;
use crate::error::Result;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc::Sender;
use tokio::sync::Notify;
use tokio::time::Duration;
use tracing::info;
use uv_events::Event;

const READ_CHUNK: usize = 4096;

/// The shutdown-signaling half held by whoever owns the stream's lifetime.
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

/// The waiting half passed into [`stream_events`].
#[derive(Clone, Debug)]
pub struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    pub fn new_pair() -> (ShutdownHandle, ShutdownListener) {
        let notify = Arc::new(Notify::new());
        (ShutdownHandle { notify: notify.clone() }, ShutdownListener { notify })
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
        }
    }
}

async fn send_flat(sink: &Sender<Event>, event: Event) -> bool {
    match event {
        Event::MultiEvent(events) => {
            for e in events {
                if sink.send(e).await.is_err() {
                    return false;
                }
            }
            true
        }
        other => sink.send(other).await.is_ok(),
    }
}

/// Reads from `reader`, decodes with `decoder`, and forwards completed
/// events to `sink` until `cancel` fires or the reader is exhausted.
///
/// Implements the four-step loop from `spec.md`: accumulate bytes, drain
/// every decode the buffer supports, and when a prefix is stuck ambiguous
/// (a lone ESC, or a CSI/OSC/DCS/etc. sequence missing its terminator),
/// race new bytes against `esc_timeout` and force disambiguation on expiry.
pub async fn stream_events<R>(
    mut reader: R,
    sink: Sender<Event>,
    cancel: ShutdownListener,
    mut decoder: Decoder,
    esc_timeout: Duration,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    info!(target: "input.thread", "stream_events_started");
    let mut queue: Vec<u8> = Vec::with_capacity(READ_CHUNK);
    let mut buf = [0u8; READ_CHUNK];
    let exit_reason;

    'outer: loop {
        loop {
            let (consumed, event) = decoder.decode(&queue, false);
            if consumed == 0 {
                break;
            }
            queue.drain(..consumed);
            if !send_flat(&sink, event).await {
                exit_reason = ExitReason::ChannelClosed;
                break 'outer;
            }
        }

        if queue.is_empty() {
            let n = tokio::select! {
                biased;
                _ = cancel.wait() => {
                    exit_reason = ExitReason::ShutdownSignal;
                    break 'outer;
                }
                result = reader.read(&mut buf) => result?,
            };
            if n == 0 {
                exit_reason = ExitReason::StreamEnded;
                break 'outer;
            }
            queue.extend_from_slice(&buf[..n]);
            continue;
        }

        tokio::select! {
            biased;
            _ = cancel.wait() => {
                exit_reason = ExitReason::ShutdownSignal;
                break 'outer;
            }
            _ = tokio::time::sleep(esc_timeout) => {
                let (consumed, event) = decoder.decode(&queue, true);
                if consumed > 0 {
                    queue.drain(..consumed);
                    if !send_flat(&sink, event).await {
                        exit_reason = ExitReason::ChannelClosed;
                        break 'outer;
                    }
                }
            }
            result = reader.read(&mut buf) => {
                let n = result?;
                if n == 0 {
                    exit_reason = ExitReason::StreamEnded;
                    break 'outer;
                }
                queue.extend_from_slice(&buf[..n]);
            }
        }
    }

    info!(target: "input.thread", reason = exit_reason.as_str(), "stream_events_stopped");
    Ok(())
}
