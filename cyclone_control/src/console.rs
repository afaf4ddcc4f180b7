//! Operator console: line input and the refreshing panel.

pub mod input;
pub mod panel;

use crate::presentation::{Presenter, Severity, StatusUpdate};
use input::OperatorCommand;
use panel::ConsolePanel;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

/// Read operator lines until EOF and forward parsed commands.
///
/// Parse errors are shown on the panel. EOF (or a closed terminal) sends
/// `Quit`, so piping a script into the binary behaves like typing it.
pub async fn read_operator_input<R>(
    reader: R,
    commands: mpsc::Sender<OperatorCommand>,
    panel: Arc<ConsolePanel>,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Console input error: {e}");
                break;
            }
        };

        match line.parse::<OperatorCommand>() {
            Ok(command) => {
                if commands.send(command).await.is_err() {
                    debug!("Command channel closed, console reader exiting");
                    return;
                }
            }
            Err(e) => panel.show_status(StatusUpdate::new(e.to_string(), Severity::Warning)),
        }
    }
    debug!("Console input closed");
    let _ = commands.send(OperatorCommand::Quit).await;
}

/// Forward one `Quit` on Ctrl+C.
pub async fn forward_interrupt(commands: mpsc::Sender<OperatorCommand>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            debug!("Interrupt received");
            let _ = commands.send(OperatorCommand::Quit).await;
        }
        Err(e) => warn!("Cannot listen for Ctrl+C: {e}"),
    }
}

/// Redraw the panel every `period` while it has changes.
///
/// Returns when the output stops accepting writes.
pub async fn refresh_panel<W>(panel: Arc<ConsolePanel>, period: Duration, mut out: W, colour: bool)
where
    W: Write,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let Some(frame) = panel.take_frame() else {
            continue;
        };
        if let Err(e) = out
            .write_all(frame.render(colour).as_bytes())
            .and_then(|()| out.flush())
        {
            debug!("Panel output closed: {e}");
            return;
        }
    }
}
