use tokio::select;
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

async fn stop_signal() {
    let (mut sigint, mut sigterm) = match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
        (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
        (Err(err), _) | (_, Err(err)) => {
            error!("could not install signal handlers: {}", err);
            return std::future::pending().await;
        }
    };

    select! {
        _ = sigint.recv() => (),
        _ = sigterm.recv() => (),
    }
}

/// A token that is cancelled on SIGINT or SIGTERM.
pub fn bind() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        select! {
            _ = stop_signal() => info!("shutdown requested"),
            _ = token_clone.cancelled() => (),
        }

        token_clone.cancel();
    });

    token
}
