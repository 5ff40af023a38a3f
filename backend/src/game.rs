//! Authoritative game server
//!
//! A single-threaded state machine advanced once per tick by the caller.
//! It owns the board, the clocks and the connection slots; nothing else
//! mutates them.
//!
//! # States
//!
//! ```text
//! NoGame ──3 joined──▶ InGame ──end──▶ AwaitingRematch ──all agree──▶ InGame
//!    ▲                                        │
//!    └──────────────fewer than 3──────────────┘
//! ```
//!
//! # Tick (in game)
//!
//! 1. If the turn changed, regenerate the legal moves and check end
//!    conditions: no moves > insufficient material > fifty-move rule.
//! 2. Charge the clock of the side to move; a flagged clock eliminates it.
//! 3. Service at most one message per connection.
//! 4. Ping everyone once per second; a player who missed the previous ping
//!    is treated as disconnected.
//! 5. Drop disconnected players (eliminating them) and compact the slots.
//! 6. With one colour left, or a draw, broadcast the result.
//!
//! Bad input never produces a reply: illegal, out-of-turn and malformed
//! messages are logged and dropped.

use rand::seq::SliceRandom;
use rand::Rng;
use shared::{EndOfGame, EndReason, Eliminated, GameStart, Message, MovePlayed, Ping, Rematch};
use tracing::{debug, info, warn};
use tri_engine::constants::FIFTY_MOVE_PLIES;
use tri_engine::{
    describe, generate, in_check, is_insufficient_material, Board, Clock, Colour, Move, MoveList,
};

use crate::config::GameSettings;
use crate::transport::{Connection, Incoming, Listener};

pub const MAX_PLAYERS: usize = 3;

/// Seconds of tick time between pings
const PING_INTERVAL: f32 = 1.0;

/// Seconds a turned-away connection gets to receive its `GameInProgress`
const CLOSE_GRACE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    NoGame,
    InGame,
    AwaitingRematch,
}

struct Player<C> {
    conn: C,
    colour: Option<Colour>,
    rematch: bool,
    /// Answered the most recent ping
    ponged: bool,
}

impl<C: Connection> Player<C> {
    fn new(conn: C) -> Self {
        Self {
            conn,
            colour: None,
            rematch: false,
            ponged: true,
        }
    }
}

/// A rejected connection kept open until its last frame is written
struct Closing<C> {
    conn: C,
    waited: f32,
}

struct Session {
    board: Board,
    clock: Clock,
    /// Legal moves for `turn`, generated when that turn began
    legal: MoveList,
    turn: Option<Colour>,
}

#[derive(Debug, Default)]
struct PingState {
    elapsed: f32,
    nonce: u32,
    outstanding: bool,
}

/// End-of-game evidence gathered during one tick
#[derive(Debug, Default)]
struct TickOutcome {
    reason: Option<EndReason>,
    draw: bool,
}

pub struct GameServer<L: Listener> {
    listener: L,
    settings: GameSettings,
    players: Vec<Player<L::Conn>>,
    closing: Vec<Closing<L::Conn>>,
    state: ServerState,
    session: Option<Session>,
    ping: PingState,
}

impl<L: Listener> GameServer<L> {
    pub fn new(listener: L, settings: GameSettings) -> Self {
        Self {
            listener,
            settings,
            players: Vec::with_capacity(MAX_PLAYERS),
            closing: Vec::new(),
            state: ServerState::NoGame,
            session: None,
            ping: PingState::default(),
        }
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Board of the current or most recent game
    pub fn board(&self) -> Option<&Board> {
        self.session.as_ref().map(|s| &s.board)
    }

    /// Remaining clock time of `colour` in the current or most recent game
    pub fn remaining(&self, colour: Colour) -> Option<f32> {
        self.session.as_ref().map(|s| s.clock.remaining(colour))
    }

    /// Advances the server by `dt` seconds of wall time.
    pub fn tick(&mut self, dt: f32) {
        if self.state == ServerState::AwaitingRematch && self.players.len() < MAX_PLAYERS {
            self.return_to_lobby();
        }
        self.accept_connections();

        match self.state {
            ServerState::NoGame => self.update_lobby(dt),
            ServerState::InGame => self.update_game(dt),
            ServerState::AwaitingRematch => self.update_rematch(dt),
        }

        for (index, player) in self.players.iter_mut().enumerate() {
            if let Err(e) = player.conn.flush() {
                debug!("Flush to slot {} failed: {}", index, e);
            }
        }
        self.flush_closing(dt);
    }

    /// Drops rejected connections once their output is written or the grace
    /// period runs out.
    fn flush_closing(&mut self, dt: f32) {
        self.closing.retain_mut(|closing| {
            closing.waited += dt;
            if let Err(e) = closing.conn.flush() {
                debug!("Could not notify {}: {}", closing.conn.peer(), e);
                return false;
            }
            closing.conn.has_pending_output() && closing.waited < CLOSE_GRACE
        });
    }

    fn accept_connections(&mut self) {
        loop {
            let mut conn = match self.listener.accept() {
                Ok(Some(conn)) => conn,
                Ok(None) => break,
                Err(e) => {
                    warn!("Accept failed: {}", e);
                    break;
                }
            };

            if self.state == ServerState::NoGame && self.players.len() < MAX_PLAYERS {
                info!("Player joined from {} (slot {})", conn.peer(), self.players.len());
                self.players.push(Player::new(conn));
            } else {
                info!("Rejecting {}: game in progress", conn.peer());
                match conn.send(&Message::GameInProgress) {
                    Ok(()) => self.closing.push(Closing { conn, waited: 0.0 }),
                    Err(e) => debug!("Could not notify {}: {}", conn.peer(), e),
                }
            }
        }
    }

    fn update_lobby(&mut self, dt: f32) {
        let mut gone = self.service_messages();
        self.update_ping(dt, &mut gone);
        self.drop_players(gone, &mut TickOutcome::default());

        if self.players.len() == MAX_PLAYERS {
            self.start_game();
        }
    }

    fn update_rematch(&mut self, dt: f32) {
        let mut gone = self.service_messages();
        self.update_ping(dt, &mut gone);
        self.drop_players(gone, &mut TickOutcome::default());

        if self.players.len() < MAX_PLAYERS {
            self.return_to_lobby();
        } else if self.players.iter().all(|p| p.rematch) {
            info!("All players agreed to a rematch");
            self.start_game();
        }
    }

    fn update_game(&mut self, dt: f32) {
        let mut outcome = TickOutcome::default();

        self.begin_turn(&mut outcome);
        if !self.is_decided(&outcome) {
            self.run_clock(dt, &mut outcome);
        }
        if !self.is_decided(&outcome) {
            let mut gone = self.service_messages();
            self.update_ping(dt, &mut gone);
            self.drop_players(gone, &mut outcome);
        }
        if self.is_decided(&outcome) {
            self.finish_game(outcome);
        }
    }

    fn return_to_lobby(&mut self) {
        info!("{} player(s) left, waiting for more", self.players.len());
        self.state = ServerState::NoGame;
        for player in &mut self.players {
            player.colour = None;
            player.rematch = false;
        }
    }

    fn start_game(&mut self) {
        let mut colours = Colour::ALL;
        colours.shuffle(&mut rand::rng());

        for (index, (player, colour)) in self.players.iter_mut().zip(colours).enumerate() {
            player.colour = Some(colour);
            player.rematch = false;
            info!("Slot {} ({}) plays {}", index, player.conn.peer(), colour);

            let start = Message::GameStart(GameStart {
                colour,
                time_control: self.settings.time_control,
                position: self.settings.position.clone(),
            });
            if let Err(e) = player.conn.send(&start) {
                warn!("Could not send game start to slot {}: {}", index, e);
            }
        }

        self.session = Some(Session {
            board: self.settings.start.clone(),
            clock: Clock::new(self.settings.time_control),
            legal: MoveList::new(),
            turn: None,
        });
        self.state = ServerState::InGame;
        info!(
            "Game started ({}+{})",
            self.settings.time_control.minutes, self.settings.time_control.increment
        );
    }

    /// Regenerates the legal moves when the side to move has changed and
    /// checks the end conditions that depend on them.
    fn begin_turn(&mut self, outcome: &mut TickOutcome) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let side = session.board.side_to_move;
        if session.turn == Some(side) {
            return;
        }
        session.turn = Some(side);
        session.legal = generate(&session.board, side);

        if session.legal.is_empty() {
            let reason = if in_check(&session.board, side) {
                EndReason::Checkmate
            } else {
                EndReason::Stalemate
            };
            // with all three still playing, the stuck colour drops out and the
            // other two play on
            if session.board.surviving().count() == Colour::ALL.len() {
                info!("{} has no legal moves", side);
                if self.eliminate(side, reason) {
                    outcome.reason = Some(reason);
                }
            } else if reason == EndReason::Checkmate {
                if self.eliminate(side, reason) {
                    outcome.reason = Some(reason);
                }
            } else {
                info!("{} is stalemated", side);
                outcome.reason = Some(reason);
                outcome.draw = true;
            }
        } else if is_insufficient_material(&session.board) {
            outcome.reason = Some(EndReason::InsufficientMaterial);
            outcome.draw = true;
        } else if session.board.halfmove_clock >= FIFTY_MOVE_PLIES {
            outcome.reason = Some(EndReason::FiftyMoveRule);
            outcome.draw = true;
        }
    }

    fn run_clock(&mut self, dt: f32, outcome: &mut TickOutcome) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let side = session.board.side_to_move;
        session.clock.tick(side, dt);
        if session.clock.is_flagged(side) && self.eliminate(side, EndReason::Timeout) {
            outcome.reason = Some(EndReason::Timeout);
        }
    }

    /// Reads at most one message from every connection. Returns the slots
    /// that disconnected or said goodbye.
    fn service_messages(&mut self) -> Vec<usize> {
        let mut gone = Vec::new();
        for index in 0..self.players.len() {
            match self.players[index].conn.poll() {
                Incoming::Nothing => {}
                Incoming::Closed => {
                    info!("Slot {} disconnected", index);
                    gone.push(index);
                }
                Incoming::Malformed(e) => {
                    debug!("Dropping malformed frame from slot {}: {}", index, e);
                }
                Incoming::Message(message) => {
                    if self.handle_message(index, message) {
                        gone.push(index);
                    }
                }
            }
        }
        gone
    }

    /// Returns true when the player is leaving.
    fn handle_message(&mut self, index: usize, message: Message) -> bool {
        match message {
            Message::PlayMove(play) => self.handle_move(index, play.mv),
            Message::Ping(Ping { nonce }) => {
                if self.ping.outstanding && nonce == self.ping.nonce {
                    self.players[index].ponged = true;
                }
            }
            Message::Rematch(Rematch { agree }) => {
                if self.state == ServerState::AwaitingRematch {
                    debug!("Slot {} rematch vote: {}", index, agree);
                    self.players[index].rematch = agree;
                }
            }
            Message::Goodbye => {
                info!("Slot {} said goodbye", index);
                return true;
            }
            other => debug!("Ignoring message with tag {} from slot {}", other.tag(), index),
        }
        false
    }

    fn handle_move(&mut self, index: usize, mv: Move) {
        if self.state != ServerState::InGame {
            return;
        }
        let Some(colour) = self.players[index].colour else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.turn != Some(colour) || session.board.side_to_move != colour {
            debug!("{} tried to move out of turn", colour);
            return;
        }
        if !session.legal.contains(&mv) {
            debug!("Rejected illegal move {} from {}", mv, colour);
            return;
        }

        let notation = describe(&session.board, mv);
        session.clock.add_increment(colour);
        session.board.apply(mv);
        // later submissions this tick must wait for the next turn's list
        session.legal = MoveList::new();
        session.turn = None;
        let seconds = session.clock.remaining(colour);

        info!("{} played {}", colour, notation);
        self.broadcast(&Message::MovePlayed(MovePlayed { mv, seconds }));
    }

    fn update_ping(&mut self, dt: f32, gone: &mut Vec<usize>) {
        self.ping.elapsed += dt;
        if self.ping.elapsed < PING_INTERVAL {
            return;
        }
        self.ping.elapsed = 0.0;

        if self.ping.outstanding {
            for (index, player) in self.players.iter().enumerate() {
                if !player.ponged && !gone.contains(&index) {
                    warn!("Slot {} did not answer the last ping", index);
                    gone.push(index);
                }
            }
        }

        self.ping.nonce = rand::rng().random();
        self.ping.outstanding = true;
        for player in &mut self.players {
            player.ponged = false;
        }
        let nonce = self.ping.nonce;
        self.broadcast(&Message::Ping(Ping { nonce }));
    }

    /// Removes the given slots, eliminating their colours mid-game, and
    /// keeps the remaining slots densely packed.
    fn drop_players(&mut self, mut gone: Vec<usize>, outcome: &mut TickOutcome) {
        gone.sort_unstable();
        gone.dedup();
        for &index in gone.iter().rev() {
            let player = self.players.remove(index);
            info!("Slot {} ({}) left", index, player.conn.peer());
            if self.state != ServerState::InGame {
                continue;
            }
            if let Some(colour) = player.colour {
                if self.eliminate(colour, EndReason::Abandonment) {
                    outcome.reason = Some(EndReason::Abandonment);
                }
            }
        }
    }

    /// Eliminates `colour` and tells everyone. Returns false when it was
    /// already out or the game is already decided.
    fn eliminate(&mut self, colour: Colour, cause: EndReason) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.board.is_eliminated(colour) || session.board.surviving().count() <= 1 {
            return false;
        }
        session.board.eliminate(colour);
        let seconds = session.clock.remaining(colour).max(0.0);

        info!("{} eliminated ({})", colour, cause);
        self.broadcast(&Message::Eliminated(Eliminated { colour, seconds }));
        true
    }

    fn is_decided(&self, outcome: &TickOutcome) -> bool {
        outcome.draw
            || self
                .session
                .as_ref()
                .is_some_and(|s| s.board.surviving().count() <= 1)
    }

    fn finish_game(&mut self, outcome: TickOutcome) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let survivors: Vec<Colour> = session.board.surviving().collect();
        let winner = match survivors.as_slice() {
            [winner] if !outcome.draw => Some(*winner),
            _ => None,
        };
        let reason = outcome.reason.unwrap_or(EndReason::Abandonment);

        match winner {
            Some(colour) => info!("Game over: {} wins by {}", colour, reason),
            None => info!("Game over: draw by {}", reason),
        }
        self.broadcast(&Message::EndOfGame(EndOfGame { winner, reason }));
        self.state = ServerState::AwaitingRematch;
        for player in &mut self.players {
            player.rematch = false;
        }
    }

    fn broadcast(&mut self, message: &Message) {
        for (index, player) in self.players.iter_mut().enumerate() {
            if let Err(e) = player.conn.send(message) {
                warn!("Send to slot {} failed: {}", index, e);
            }
        }
    }
}
