use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info};

/// Accept connections forever, handling each one in its own task.
///
/// Neither a failed accept nor a failed handler stops the loop.
pub(crate) async fn accept_loop<F, Fut>(listener: TcpListener, role: &'static str, handler: F) -> Result<()>
where
    F: Fn(TcpStream, SocketAddr) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let local = listener
        .local_addr()
        .context("listener has no local address")?;
    info!("{} node listening on {}", role, local);

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!("{} accepted connection from {}", role, peer);
                let handling = handler(stream, peer);
                tokio::spawn(async move {
                    if let Err(e) = handling.await {
                        error!("{} failed to handle connection from {}: {:#}", role, peer, e);
                    }
                });
            }
            Err(e) => error!("{} failed to accept connection: {}", role, e),
        }
    }
}
