//! Room session actor: an isolated Tokio task that owns one game.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. This is the "actor model" — no shared
//! mutable state, just message passing. Because the actor processes one
//! command at a time, every mutate-then-broadcast is atomic per room
//! and no lock ever guards the game state.
//!
//! The actor also owns the room's two timers: the optional per-turn
//! countdown (expiry forfeits the turn) and the computer opponent's
//! think delay. Both are deadlines checked in the same `select!` loop
//! that receives commands, so timer fire and command handling can never
//! interleave inside one room.

use std::collections::HashMap;

use gridline_game::{GameState, DEFAULT_GRID_SIZE};
use gridline_protocol::{ClientEvent, ClientId, Seat, Snapshot};
use rand::seq::IteratorRandom;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Duration, Instant};

use crate::RoomError;

/// How long the computer opponent "thinks" before moving.
const AI_THINK_DELAY: Duration = Duration::from_millis(500);

/// Command channel size for session actors.
const CHANNEL_SIZE: usize = 64;

/// Channel sender for delivering snapshots to one connection.
pub type SnapshotSender = mpsc::UnboundedSender<Snapshot>;

/// What a connection is to its room.
///
/// Assigned at attach time and permanent for the connection's lifetime:
/// the first two distinct connections take the two seats, everyone
/// after that watches. A vacated seat is not re-issued — a room where a
/// player left stays in spectator-only mode until it empties out and is
/// recreated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player(Seat),
    Spectator,
}

/// Commands sent to a session actor through its channel.
///
/// The `oneshot::Sender` in some variants is a "reply channel" — the
/// caller sends a command and waits for the response on that channel.
pub(crate) enum SessionCommand {
    /// Register a connection's outbound channel and assign it a role.
    Attach {
        client_id: ClientId,
        sender: SnapshotSender,
        reply: oneshot::Sender<Role>,
    },

    /// Deliver a decoded client event. Fire-and-forget: invalid events
    /// are dropped inside the actor, never answered.
    Event {
        client_id: ClientId,
        event: ClientEvent,
    },

    /// Remove a connection (socket closed).
    Detach { client_id: ClientId },

    /// Request room metadata.
    Info { reply: oneshot::Sender<RoomInfo> },
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    /// The room's identifier, as taken from the connection path.
    pub room_id: String,
    /// Number of attached connections, spectators included.
    pub connections: usize,
    /// Number of seats ever claimed (0, 1, or 2).
    pub seats_claimed: usize,
    /// Current board dimension.
    pub grid_size: usize,
}

/// Handle to a running session actor. Used to send commands to it.
///
/// This is cheap to clone — it's just an `mpsc::Sender` wrapper. The
/// registry holds one of these per room, and every connection handler
/// for the room holds a clone.
#[derive(Clone)]
pub struct SessionHandle {
    room_id: String,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Returns the room's identifier.
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Whether the actor behind this handle has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Registers a connection and returns its role. The session sends
    /// the current snapshot to `sender` before this returns.
    pub async fn attach(
        &self,
        client_id: ClientId,
        sender: SnapshotSender,
    ) -> Result<Role, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Attach {
                client_id,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Delivers a client event to the session (fire-and-forget).
    pub async fn event(
        &self,
        client_id: ClientId,
        event: ClientEvent,
    ) -> Result<(), RoomError> {
        self.sender
            .send(SessionCommand::Event { client_id, event })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Removes a connection from the session.
    pub async fn detach(&self, client_id: ClientId) -> Result<(), RoomError> {
        self.sender
            .send(SessionCommand::Detach { client_id })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Requests the current room metadata.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// The internal session actor state. Runs inside a Tokio task.
struct SessionActor {
    room_id: String,
    game: GameState,
    /// Current seat occupants. A vacated seat stays `None`.
    seats: [Option<ClientId>; 2],
    /// Seats handed out so far. Never decremented, which is what makes
    /// seat assignment permanent.
    claimed: usize,
    /// Per-connection outbound channels, spectators included.
    senders: HashMap<ClientId, SnapshotSender>,
    /// When the current turn forfeits, if a timer is configured.
    turn_deadline: Option<Instant>,
    /// When the computer opponent moves, if it is armed.
    ai_deadline: Option<Instant>,
    receiver: mpsc::Receiver<SessionCommand>,
}

/// A deadline that never fires within a session's lifetime. `select!`
/// needs some instant for a disarmed timer branch; the branch guard
/// keeps it from being polled.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(60 * 60 * 24)
}

impl SessionActor {
    /// Runs the actor loop, processing commands and timer deadlines
    /// until the last connection detaches.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, "room session started");

        loop {
            let turn_at = self.turn_deadline.unwrap_or_else(far_future);
            let ai_at = self.ai_deadline.unwrap_or_else(far_future);

            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(SessionCommand::Attach { client_id, sender, reply }) => {
                            let role = self.handle_attach(client_id, sender);
                            let _ = reply.send(role);
                        }
                        Some(SessionCommand::Event { client_id, event }) => {
                            self.handle_event(client_id, event);
                        }
                        Some(SessionCommand::Detach { client_id }) => {
                            self.handle_detach(client_id);
                            if self.senders.is_empty() {
                                break;
                            }
                        }
                        Some(SessionCommand::Info { reply }) => {
                            let _ = reply.send(self.info());
                        }
                        None => break,
                    }
                }
                _ = time::sleep_until(turn_at), if self.turn_deadline.is_some() => {
                    self.handle_turn_expiry();
                }
                _ = time::sleep_until(ai_at), if self.ai_deadline.is_some() => {
                    self.handle_ai_move();
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room session stopped");
    }

    fn handle_attach(&mut self, client_id: ClientId, sender: SnapshotSender) -> Role {
        let role = if self.claimed < 2 {
            let seat = if self.claimed == 0 { Seat::Host } else { Seat::Guest };
            self.seats[seat.index()] = Some(client_id);
            self.claimed += 1;
            Role::Player(seat)
        } else {
            Role::Spectator
        };

        // The new connection gets the current state right away; nobody
        // else's view changed, so this is not a broadcast. Attaching
        // does not touch the game, so the turn clock keeps running.
        let _ = sender.send(self.snapshot());
        self.senders.insert(client_id, sender);

        tracing::info!(
            room_id = %self.room_id,
            %client_id,
            ?role,
            connections = self.senders.len(),
            "connection attached"
        );
        role
    }

    /// Removes a connection. A seated player leaving vacates the seat
    /// and resets the round so the remaining player is not stuck
    /// mid-game against nobody.
    fn handle_detach(&mut self, client_id: ClientId) {
        if self.senders.remove(&client_id).is_none() {
            return;
        }

        let vacated = self
            .seats
            .iter()
            .position(|occupant| *occupant == Some(client_id));

        tracing::info!(
            room_id = %self.room_id,
            %client_id,
            seated = vacated.is_some(),
            connections = self.senders.len(),
            "connection detached"
        );

        if let Some(index) = vacated {
            self.seats[index] = None;
            self.game.reset_round();
            self.rearm();
            self.broadcast();
        }
    }

    /// Applies one client event. Every precondition failure lands here
    /// as a silent drop: a debug log, no state change, no broadcast.
    fn handle_event(&mut self, client_id: ClientId, event: ClientEvent) {
        let seat = self.seat_of(client_id);

        match event {
            ClientEvent::Join {
                name,
                grid_size,
                timer_seconds,
                ai_enabled,
            } => {
                let Some(seat) = seat else {
                    self.drop_event(client_id, "join from spectator");
                    return;
                };
                if grid_size == Some(0) {
                    self.drop_event(client_id, "grid size 0");
                    return;
                }

                self.game.set_name(seat, name);
                if seat == Seat::Host {
                    // Host join doubles as room config + new round.
                    self.game.configure(grid_size, timer_seconds, ai_enabled);
                    self.rearm();
                }
                self.broadcast();
            }

            ClientEvent::Move { index } => {
                let Some(seat) = seat else {
                    self.drop_event(client_id, "move from spectator");
                    return;
                };
                if let Err(reason) = self.game.validate_move(seat, index) {
                    self.drop_event(client_id, &reason);
                    return;
                }
                self.game.apply_move(seat, index);
                self.rearm();
                self.broadcast();
            }

            ClientEvent::Reset => {
                if seat != Some(Seat::Host) {
                    self.drop_event(client_id, "reset from non-host");
                    return;
                }
                self.game.reset_round();
                self.rearm();
                self.broadcast();
            }
        }
    }

    /// The turn countdown ran out: the pending turn passes to the other
    /// seat. An automatic pass, not a loss.
    fn handle_turn_expiry(&mut self) {
        tracing::debug!(room_id = %self.room_id, "turn timer expired");
        self.game.forfeit_turn();
        self.rearm();
        self.broadcast();
    }

    /// The computer opponent's think delay elapsed: play a uniformly
    /// random empty cell as seat 1.
    fn handle_ai_move(&mut self) {
        self.ai_deadline = None;

        // Conditions may have changed since the delay was armed (a
        // human claimed the seat, the game ended). Re-check before
        // moving.
        if !self.ai_turn_pending() {
            return;
        }
        let Some(index) = self.game.empty_cells().choose(&mut rand::rng()) else {
            return;
        };

        tracing::debug!(room_id = %self.room_id, index, "computer plays");
        self.game.apply_move(Seat::Guest, index);
        self.rearm();
        self.broadcast();
    }

    /// Whether seat 1 is currently the computer's to play: AI on, game
    /// running, seat 1's turn, no human in seat 1, and a host present
    /// to play against.
    fn ai_turn_pending(&self) -> bool {
        self.game.ai_enabled()
            && self.game.winner().is_none()
            && self.game.turn() == Seat::Guest
            && self.seats[Seat::Guest.index()].is_none()
            && self.seats[Seat::Host.index()].is_some()
    }

    /// Re-arms both deadlines from the current game state. Called after
    /// every transition that restarts the turn clock — an accepted
    /// move, a forfeit, a reset, a host (re)configure — and never on
    /// attach, so joining spectators don't refresh the countdown.
    fn rearm(&mut self) {
        self.turn_deadline = match (self.game.timer_seconds(), self.game.winner()) {
            (Some(secs), None) => Some(Instant::now() + Duration::from_secs(secs)),
            _ => None,
        };
        self.ai_deadline = self
            .ai_turn_pending()
            .then(|| Instant::now() + AI_THINK_DELAY);
    }

    /// Seconds left on the current turn, rounded up so the display
    /// never shows 0 while the turn is still live.
    fn time_left(&self) -> Option<u64> {
        let deadline = self.turn_deadline?;
        let now = Instant::now();
        if deadline <= now {
            return Some(0);
        }
        let remaining = deadline - now;
        Some(remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0))
    }

    fn seat_of(&self, client_id: ClientId) -> Option<Seat> {
        if self.seats[0] == Some(client_id) {
            Some(Seat::Host)
        } else if self.seats[1] == Some(client_id) {
            Some(Seat::Guest)
        } else {
            None
        }
    }

    fn drop_event(&self, client_id: ClientId, reason: &str) {
        tracing::debug!(
            room_id = %self.room_id,
            %client_id,
            reason,
            "event dropped"
        );
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.game.board().to_vec(),
            turn: self.game.turn().index() as u8,
            names: self.game.names().clone(),
            wins: self.game.wins(),
            winner: self.game.winner(),
            win_line: self.game.win_line().to_vec(),
            grid_size: self.game.grid_size(),
            time_left: self.time_left(),
            ai_enabled: self.game.ai_enabled(),
        }
    }

    /// Sends the current snapshot to every attached connection. Built
    /// once, cloned per receiver; a closed receiver is silently skipped
    /// (its Detach is already in flight).
    fn broadcast(&self) {
        let snapshot = self.snapshot();
        for sender in self.senders.values() {
            let _ = sender.send(snapshot.clone());
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id.clone(),
            connections: self.senders.len(),
            seats_claimed: self.claimed,
            grid_size: self.game.grid_size(),
        }
    }
}

/// Spawns a new session actor task and returns a handle to it.
pub fn spawn_session(room_id: String) -> SessionHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);

    let actor = SessionActor {
        room_id: room_id.clone(),
        game: GameState::new(DEFAULT_GRID_SIZE),
        seats: [None, None],
        claimed: 0,
        senders: HashMap::new(),
        turn_deadline: None,
        ai_deadline: None,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        room_id,
        sender: tx,
    }
}
