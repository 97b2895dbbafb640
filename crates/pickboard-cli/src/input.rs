// Line reader feeding the app event loop.

use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use pickboard_app::command::{parse_command, CommandError};
use pickboard_app::protocol::UserCommand;

/// Read command lines from `reader` and send them to the app.
///
/// Blank lines are skipped. Lines that fail to parse are handed to
/// `on_error` and never reach the app. Stops after forwarding `quit`, at end
/// of input, or when the app stops listening.
pub async fn forward_lines<R, F>(
    reader: R,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut on_error: F,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&str, CommandError),
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let cmd = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                debug!("Rejected input line {:?}: {}", line, e);
                on_error(&line, e);
                continue;
            }
        };
        let quit = cmd == UserCommand::Quit;
        if cmd_tx.send(cmd).await.is_err() {
            info!("App loop gone, input reader stopping");
            return Ok(());
        }
        if quit {
            return Ok(());
        }
    }
    info!("End of input");
    Ok(())
}

/// Run `future` to completion on a fresh multi-threaded runtime, then shut
/// the runtime down, waiting at most `grace` for blocking tasks.
///
/// `tokio::io::stdin` reads on the blocking pool, and a read waiting for a
/// line cannot be cancelled; dropping the runtime would wait for it forever.
pub fn block_on_with_grace<F: Future>(future: F, grace: Duration) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    let output = runtime.block_on(future);
    runtime.shutdown_timeout(grace);
    Ok(output)
}
