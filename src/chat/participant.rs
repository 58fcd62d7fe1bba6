//! One user joined to one room.
//!
//! A participant owns its [`Connection`] and runs two pumps: the read pump
//! decodes inbound frames onto the `in` channel, the write pump drains the
//! `out` channel onto the socket and keeps the peer alive with periodic
//! pings. The room side never touches the socket; it observes the
//! participant only through its [`ParticipantHandle`].

use axum::extract::ws::Message;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant};

use crate::events::{codec, Event};

use super::connection::{Connection, FrameReader, FrameWriter, TransportError, PING_PERIOD};

/// The room-facing side of a participant: identity, inbound events,
/// outbound events and the termination signal.
///
/// `done` closes exactly once, after both pumps have stopped; nothing can
/// race a cleanup triggered by it.
pub struct ParticipantHandle {
    id: String,
    events_in: mpsc::Receiver<Event>,
    events_out: mpsc::Sender<Event>,
    done: watch::Receiver<()>,
}

impl ParticipantHandle {
    pub(crate) fn new(
        id: String,
        events_in: mpsc::Receiver<Event>,
        events_out: mpsc::Sender<Event>,
        done: watch::Receiver<()>,
    ) -> Self {
        Self {
            id,
            events_in,
            events_out,
            done,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        String,
        mpsc::Receiver<Event>,
        mpsc::Sender<Event>,
        watch::Receiver<()>,
    ) {
        (self.id, self.events_in, self.events_out, self.done)
    }
}

/// A connected user. Owned by the boundary until its join succeeds, then by
/// the task driving [`Participant::run`].
pub struct Participant {
    id: String,
    conn: Connection,
    in_tx: mpsc::Sender<Event>,
    out_rx: mpsc::Receiver<Event>,
    done_tx: watch::Sender<()>,
}

impl Participant {
    /// Create a participant owning `conn`, plus the handle a room uses to
    /// exchange events with it.
    pub fn new(id: impl Into<String>, conn: Connection) -> (Self, ParticipantHandle) {
        let id = id.into();
        let (in_tx, in_rx) = mpsc::channel(1);
        let (out_tx, out_rx) = mpsc::channel(1);
        let (done_tx, done_rx) = watch::channel(());

        let handle = ParticipantHandle::new(id.clone(), in_rx, out_tx, done_rx);
        let participant = Self {
            id,
            conn,
            in_tx,
            out_rx,
            done_tx,
        };
        (participant, handle)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Discard a participant whose join failed, closing its connection.
    pub async fn close(self) {
        self.conn.close().await;
    }

    /// Drive both pumps until the connection dies.
    ///
    /// Waits for the read pump to exit, cancels the write pump, waits for it
    /// too, and only then lets the handle's `done` channel close. The
    /// cancellation signal is separate from `out`, so events already queued
    /// are not reordered by a shutdown race.
    pub async fn run(self) {
        let (reader, writer) = self.conn.split();
        let (cancel_tx, cancel_rx) = watch::channel(());

        let read = tokio::spawn(read_pump(self.id.clone(), reader, self.in_tx));
        let write = tokio::spawn(write_pump(self.id.clone(), writer, self.out_rx, cancel_rx));

        let _ = read.await;
        drop(cancel_tx);
        let _ = write.await;

        tracing::debug!("Participant '{}' finished", self.id);
        // done_tx drops here, closing the handle's done channel.
    }
}

/// Read frames, decode them and forward events to the room side. Frame-level
/// errors are logged and skipped; transport errors end the pump.
async fn read_pump(id: String, mut reader: FrameReader, events: mpsc::Sender<Event>) {
    loop {
        let message = match reader.read_frame().await {
            Ok(message) => message,
            Err(TransportError::Closed) => {
                tracing::debug!("Participant '{}' closed the connection", id);
                return;
            }
            Err(e) => {
                tracing::warn!("Failed to read frame from '{}': {}", id, e);
                return;
            }
        };

        let text = match message {
            Message::Text(text) => text,
            other => {
                tracing::warn!("Got frame of unexpected type from '{}': {:?}", id, other);
                continue;
            }
        };

        let event = match codec::decode(text.as_str()) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Failed to decode frame from '{}': {}", id, e);
                continue;
            }
        };

        if events.send(event).await.is_err() {
            return;
        }
    }
}

/// Drain outbound events onto the socket and ping the peer every
/// [`PING_PERIOD`]. Exits on write failure or cancellation; always closes
/// the connection on the way out.
async fn write_pump(
    id: String,
    mut writer: FrameWriter,
    mut events: mpsc::Receiver<Event>,
    mut cancel: watch::Receiver<()>,
) {
    let mut ping = interval_at(Instant::now() + PING_PERIOD, PING_PERIOD);

    loop {
        tokio::select! {
            maybe = events.recv() => {
                let Some(event) = maybe else { break };

                let frame = match codec::encode(&event) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!("Failed to encode event for '{}': {}", id, e);
                        continue;
                    }
                };
                if let Err(e) = writer.write_frame(Message::Text(frame.into())).await {
                    tracing::warn!("Failed to write frame to '{}': {}", id, e);
                    break;
                }
            }
            _ = ping.tick() => {
                if let Err(e) = writer.send_ping().await {
                    tracing::warn!("Failed to ping '{}': {}", id, e);
                    break;
                }
            }
            _ = cancel.changed() => break,
        }
    }

    writer.close().await;
}
