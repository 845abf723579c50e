//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::info;

/// Resolve once SIGTERM or SIGINT arrives
///
/// Returns the signal number, or `None` if the signal stream closed first.
pub async fn shutdown_signal() -> std::io::Result<Option<i32>> {
    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    let handle = signals.handle();

    let received = signals.next().await;
    if let Some(signal) = received {
        info!("Received signal: {}", signal);
    }

    handle.close();
    Ok(received)
}
