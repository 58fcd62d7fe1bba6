//! Message-framed, keepalive'd transport over one WebSocket.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures_util::sink::SinkExt;
use futures_util::stream::{SplitSink, SplitStream, StreamExt};
use thiserror::Error;
use tokio::time::{timeout, timeout_at, Instant};

/// Time allowed to write a single frame to the peer.
pub const WRITE_WAIT: Duration = Duration::from_secs(10);

/// Time allowed between reads; refreshed whenever the peer answers a ping.
pub const PONG_WAIT: Duration = Duration::from_secs(60);

/// Ping interval. Must stay below [`PONG_WAIT`].
pub const PING_PERIOD: Duration = Duration::from_secs(PONG_WAIT.as_secs() * 9 / 10);

/// Largest accepted inbound frame. Enforced at the socket upgrade; a peer
/// exceeding it gets a fatal framing error.
pub const MAX_FRAME_BYTES: usize = 1024;

/// Fatal transport failure. Any of these ends the connection.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport error: {0}")]
    Io(#[from] axum::Error),
    #[error("deadline elapsed")]
    DeadlineExpired,
    #[error("connection closed by peer")]
    Closed,
}

/// One client connection, exclusively owned by its participant.
///
/// The read and write pumps run concurrently, so the connection splits into
/// a [`FrameReader`] and a [`FrameWriter`] before use.
pub struct Connection {
    socket: WebSocket,
}

impl Connection {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }

    /// Split into independently owned read and write halves.
    pub fn split(self) -> (FrameReader, FrameWriter) {
        let (sink, stream) = self.socket.split();
        let reader = FrameReader {
            stream,
            deadline: Instant::now() + PONG_WAIT,
        };
        (reader, FrameWriter { sink })
    }

    /// Close a connection whose pumps never ran.
    pub async fn close(mut self) {
        let _ = self.socket.send(Message::Close(None)).await;
    }
}

/// Reading half. Owns the read deadline.
pub struct FrameReader {
    stream: SplitStream<WebSocket>,
    deadline: Instant,
}

impl FrameReader {
    /// Read the next data frame (text or binary).
    ///
    /// Control frames are consumed here: a pong pushes the read deadline out
    /// by [`PONG_WAIT`], pings are answered by the socket itself. A close
    /// frame, an exhausted deadline or an I/O failure is fatal.
    pub async fn read_frame(&mut self) -> Result<Message, TransportError> {
        loop {
            let message = timeout_at(self.deadline, self.stream.next())
                .await
                .map_err(|_| TransportError::DeadlineExpired)?
                .ok_or(TransportError::Closed)??;

            match message {
                Message::Pong(_) => self.deadline = Instant::now() + PONG_WAIT,
                Message::Ping(_) => {}
                Message::Close(_) => return Err(TransportError::Closed),
                data => return Ok(data),
            }
        }
    }
}

/// Writing half. Every write is bounded by [`WRITE_WAIT`].
pub struct FrameWriter {
    sink: SplitSink<WebSocket, Message>,
}

impl FrameWriter {
    /// Write one frame, failing if it does not complete within [`WRITE_WAIT`].
    pub async fn write_frame(&mut self, message: Message) -> Result<(), TransportError> {
        timeout(WRITE_WAIT, self.sink.send(message))
            .await
            .map_err(|_| TransportError::DeadlineExpired)?
            .map_err(TransportError::from)
    }

    /// Send a keepalive ping.
    pub async fn send_ping(&mut self) -> Result<(), TransportError> {
        self.write_frame(Message::Ping(Bytes::new())).await
    }

    /// Close the connection. Idempotent.
    pub async fn close(&mut self) {
        let _ = self.sink.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_period_stays_below_pong_wait() {
        // given / when / then:
        assert!(PING_PERIOD < PONG_WAIT);
        assert_eq!(PING_PERIOD, Duration::from_secs(54));
    }
}
