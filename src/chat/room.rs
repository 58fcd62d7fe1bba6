//! A room: one named broadcast domain, one actor.
//!
//! All joins, leaves and inbound events are serialized through a single loop
//! task, which is the only writer of the membership map. Per-member delivery
//! never blocks the loop: each outbound event is handed to a short-lived
//! task racing the send against the member's termination signal, and the
//! tasks for one member are chained so its stream keeps the order in which
//! the loop accepted the events.

use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::events::{Event, SystemNotice};

use super::participant::ParticipantHandle;
use super::preprocessor::pre_process;

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("participant '{id}' is already in room '{room}'")]
    ParticipantAlreadyPresent { id: String, room: String },
    #[error("room '{0}' is no longer running")]
    Closed(String),
}

struct JoinRequest {
    handle: ParticipantHandle,
    reply: oneshot::Sender<Result<(), RoomError>>,
}

/// An inbound event together with the identity of its sender.
struct Inbound {
    producer: String,
    event: Event,
}

/// Handle to a running room. Cloneable; the loop task lives until every
/// handle is gone.
#[derive(Clone)]
pub struct Room {
    name: String,
    join_tx: mpsc::Sender<JoinRequest>,
}

impl Room {
    /// Start a room's loop task and return its handle.
    pub fn spawn(name: impl Into<String>) -> Self {
        let name = name.into();
        let (join_tx, join_rx) = mpsc::channel(1);
        let (leave_tx, leave_rx) = mpsc::channel(1);
        let (events_tx, events_rx) = mpsc::channel(1);

        let room_loop = RoomLoop {
            name: name.clone(),
            members: HashMap::new(),
            join_rx,
            leave_rx,
            events_rx,
            leave_tx,
            events_tx,
        };
        tokio::spawn(room_loop.run());

        Self { name, join_tx }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a participant to the room. Resolves once the loop has processed
    /// the join.
    pub async fn join(&self, handle: ParticipantHandle) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = JoinRequest {
            handle,
            reply: reply_tx,
        };
        if self.join_tx.send(request).await.is_err() {
            return Err(RoomError::Closed(self.name.clone()));
        }
        reply_rx
            .await
            .unwrap_or_else(|_| Err(RoomError::Closed(self.name.clone())))
    }
}

/// Room-side record of one member.
struct Member {
    out: mpsc::Sender<Event>,
    done: watch::Receiver<()>,
    /// Most recently spawned delivery task, chained by its successor.
    last_delivery: Option<JoinHandle<()>>,
}

impl Member {
    /// Queue one event for this member without blocking the caller.
    ///
    /// The spawned task first waits for the member's previous delivery, so
    /// at most one send per member is ever in flight, then races the send
    /// against the member's `done` so a terminated peer cannot hold the
    /// event indefinitely.
    fn enqueue(&mut self, event: Event) {
        let out = self.out.clone();
        let mut done = self.done.clone();
        let previous = self.last_delivery.take();

        self.last_delivery = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            tokio::select! {
                _ = out.send(event) => {}
                _ = done.changed() => {}
            }
        }));
    }
}

struct RoomLoop {
    name: String,
    members: HashMap<String, Member>,
    join_rx: mpsc::Receiver<JoinRequest>,
    leave_rx: mpsc::Receiver<String>,
    events_rx: mpsc::Receiver<Inbound>,
    leave_tx: mpsc::Sender<String>,
    events_tx: mpsc::Sender<Inbound>,
}

impl RoomLoop {
    async fn run(mut self) {
        loop {
            tokio::select! {
                request = self.join_rx.recv() => match request {
                    Some(request) => self.handle_join(request),
                    None => break,
                },
                id = self.leave_rx.recv() => match id {
                    Some(id) => self.handle_leave(id),
                    None => break,
                },
                inbound = self.events_rx.recv() => match inbound {
                    Some(inbound) => self.handle_event(inbound),
                    None => break,
                },
            }
        }
    }

    /// Admit a participant. The join notice goes to existing members before
    /// the newcomer is inserted, so nobody sees their own join.
    fn handle_join(&mut self, request: JoinRequest) {
        let JoinRequest { handle, reply } = request;

        if self.members.contains_key(handle.id()) {
            let _ = reply.send(Err(RoomError::ParticipantAlreadyPresent {
                id: handle.id().to_string(),
                room: self.name.clone(),
            }));
            return;
        }
        let _ = reply.send(Ok(()));

        let (id, events_in, events_out, done) = handle.into_parts();

        self.broadcast(notice(format!("{} joined chat", id)));

        tokio::spawn(pump_messages(
            id.clone(),
            events_in,
            done.clone(),
            self.events_tx.clone(),
            self.leave_tx.clone(),
        ));
        self.members.insert(
            id.clone(),
            Member {
                out: events_out,
                done,
                last_delivery: None,
            },
        );

        tracing::info!("Participant '{}' joined room '{}'", id, self.name);
    }

    /// Remove a member. Idempotent; the leave notice goes to the remaining
    /// members only.
    fn handle_leave(&mut self, id: String) {
        if self.members.remove(&id).is_none() {
            tracing::debug!("Leave for unknown participant '{}' in room '{}'", id, self.name);
            return;
        }
        tracing::info!("Participant '{}' left room '{}'", id, self.name);
        self.broadcast(notice(format!("{} left chat", id)));
    }

    fn handle_event(&mut self, inbound: Inbound) {
        let Inbound {
            producer,
            mut event,
        } = inbound;

        if let Err(e) = pre_process(&mut event, &producer) {
            tracing::warn!("Dropping event in room '{}': {}", self.name, e);
            return;
        }
        self.broadcast(event);
    }

    fn broadcast(&mut self, event: Event) {
        for member in self.members.values_mut() {
            member.enqueue(event.clone());
        }
    }
}

fn notice(text: String) -> Event {
    Event::System(SystemNotice {
        text,
        time: Utc::now(),
    })
}

/// Per-member bridge between a participant and its room: forwards inbound
/// events to the loop, tagged with the sender's identity, and posts a leave
/// request once the participant terminates. Forwarding into a busy room
/// blocks here, which is the intended backpressure on a single sender.
async fn pump_messages(
    id: String,
    mut events_in: mpsc::Receiver<Event>,
    mut done: watch::Receiver<()>,
    events_tx: mpsc::Sender<Inbound>,
    leave_tx: mpsc::Sender<String>,
) {
    loop {
        tokio::select! {
            maybe = events_in.recv() => match maybe {
                Some(event) => {
                    let inbound = Inbound {
                        producer: id.clone(),
                        event,
                    };
                    if events_tx.send(inbound).await.is_err() {
                        return;
                    }
                }
                None => {
                    // Read pump is gone; wait out the full termination signal.
                    let _ = done.changed().await;
                    let _ = leave_tx.send(id).await;
                    return;
                }
            },
            _ = done.changed() => {
                let _ = leave_tx.send(id).await;
                return;
            }
        }
    }
}
