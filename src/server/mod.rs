//! Server module
//!
//! Accepts TCP connections and delegates command processing to the shared
//! dispatcher, one spawned task per connection.

mod banner;
mod connection;

pub use banner::{print_logo, print_start_message};
pub use connection::Connection;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::dispatch::Dispatcher;

/// Runs the server on `addr`, sharing one dispatcher across connections.
pub async fn run(addr: &str, dispatcher: Arc<Mutex<Dispatcher>>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("rudis listening on {}", addr);

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("new connection from {}", peer);

        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            let mut connection = Connection::new(socket);
            if let Err(e) = connection.handle(dispatcher).await {
                error!("connection error from {}: {}", peer, e);
            }
            info!("connection closed: {}", peer);
        });
    }
}
