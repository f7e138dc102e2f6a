//! Connection handling
//!
//! One command line in, one reply out. The reply may contain internal
//! newlines (numbered listings); the transport terminates it with a single
//! trailing newline.

use std::sync::Arc;

use anyhow::bail;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::debug;

use crate::dispatch::{Dispatcher, Session};

pub struct Connection {
    stream: TcpStream,
    read_buffer: BytesMut,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Self {
        Connection {
            stream,
            read_buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Serves the connection until the peer closes it or a command replies
    /// `stop`. Each connection owns its session; the dispatcher is shared
    /// and locked per command.
    pub async fn handle(&mut self, dispatcher: Arc<Mutex<Dispatcher>>) -> anyhow::Result<()> {
        let mut session = Session::new();
        loop {
            let n = self.stream.read_buf(&mut self.read_buffer).await?;
            if n == 0 {
                if self.read_buffer.is_empty() {
                    return Ok(());
                }
                bail!("connection reset by peer");
            }
            debug!("read {} bytes", n);

            while let Some(line) = self.next_line() {
                let reply = {
                    let mut dispatcher = dispatcher.lock().await;
                    dispatcher.dispatch(&mut session, &line)
                };
                debug!("reply: {}", reply);
                self.stream.write_all(reply.as_bytes()).await?;
                self.stream.write_all(b"\n").await?;
                self.stream.flush().await?;
                if reply == "stop" {
                    return Ok(());
                }
            }
        }
    }

    /// Pops one newline-terminated line off the read buffer.
    fn next_line(&mut self) -> Option<String> {
        let end = self.read_buffer.iter().position(|&b| b == b'\n')?;
        let line = self.read_buffer.split_to(end + 1);
        Some(
            String::from_utf8_lossy(&line[..end])
                .trim_end_matches('\r')
                .to_owned(),
        )
    }
}
