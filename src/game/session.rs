//! Client-side mirror of the server's game
//!
//! The server is authoritative: the mirror only replays what it broadcasts
//! (`GameStart`, `MovePlayed`, `Eliminated`) and never judges legality of
//! other players' moves. Its own moves come from the same generator the
//! server validates against, so a bot never submits a move the server
//! would reject.

use rand::seq::IndexedRandom;
use rand::Rng;
use shared::{EndOfGame, Eliminated, GameStart, Message, MovePlayed, Ping, PlayMove, Rematch};
use tracing::{debug, info};
use tri_engine::{describe, generate, Board, Clock, Colour};

use crate::core::{ClientError, ClientResult};

/// One game as seen by this client
#[derive(Debug, Clone)]
pub struct MirrorGame {
    pub colour: Colour,
    pub board: Board,
    pub clock: Clock,
    pub result: Option<EndOfGame>,
}

impl MirrorGame {
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    fn is_my_turn(&self) -> bool {
        !self.is_over()
            && !self.board.is_eliminated(self.colour)
            && self.board.side_to_move == self.colour
    }
}

pub struct Session {
    bot: bool,
    game: Option<MirrorGame>,
    /// Ply the bot last submitted a move for
    submitted: Option<u32>,
}

impl Session {
    pub fn new(bot: bool) -> Self {
        Self {
            bot,
            game: None,
            submitted: None,
        }
    }

    pub fn game(&self) -> Option<&MirrorGame> {
        self.game.as_ref()
    }

    /// Applies one server message and returns the replies to send.
    ///
    /// # Errors
    ///
    /// `GameInProgress` when the server turned us away, or an unreadable
    /// start position.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        message: Message,
        rng: &mut R,
    ) -> ClientResult<Vec<Message>> {
        let mut replies = Vec::new();
        match message {
            Message::GameStart(start) => self.start(start)?,
            Message::MovePlayed(played) => self.move_played(played),
            Message::Eliminated(out) => self.eliminated(out),
            Message::EndOfGame(end) => {
                self.end(end);
                if self.bot {
                    replies.push(Message::Rematch(Rematch { agree: true }));
                }
            }
            Message::Ping(Ping { nonce }) => replies.push(Message::Ping(Ping { nonce })),
            Message::GameInProgress => return Err(ClientError::GameInProgress),
            other => debug!("Ignoring unexpected message with tag {}", other.tag()),
        }

        if self.bot {
            if let Some(play) = self.pick_move(rng) {
                replies.push(play);
            }
        }
        Ok(replies)
    }

    fn start(&mut self, start: GameStart) -> ClientResult<()> {
        let board = Board::from_position(&start.position)?;
        info!(
            "Game started: playing {} ({}+{})",
            start.colour, start.time_control.minutes, start.time_control.increment
        );
        self.game = Some(MirrorGame {
            colour: start.colour,
            board,
            clock: Clock::new(start.time_control),
            result: None,
        });
        self.submitted = None;
        Ok(())
    }

    fn move_played(&mut self, played: MovePlayed) {
        let Some(game) = self.game.as_mut() else {
            debug!("Move before game start");
            return;
        };
        let mover = game.board.side_to_move;
        info!(
            "{} played {} ({:.1} s left)",
            mover,
            describe(&game.board, played.mv),
            played.seconds
        );
        game.clock.set(mover, played.seconds);
        game.board.apply(played.mv);
    }

    fn eliminated(&mut self, out: Eliminated) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        info!("{} was eliminated", out.colour);
        game.clock.set(out.colour, out.seconds);
        if !game.board.is_eliminated(out.colour) {
            game.board.eliminate(out.colour);
        }
    }

    fn end(&mut self, end: EndOfGame) {
        match end.winner {
            Some(colour) => info!("Game over: {} wins by {}", colour, end.reason),
            None => info!("Game over: draw by {}", end.reason),
        }
        if let Some(game) = self.game.as_mut() {
            game.result = Some(end);
        }
    }

    fn pick_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Message> {
        let game = self.game.as_ref()?;
        if !game.is_my_turn() || self.submitted == Some(game.board.ply) {
            return None;
        }
        let legal = generate(&game.board, game.colour);
        let mv = *legal.as_slice().choose(rng)?;
        debug!("Submitting {}", describe(&game.board, mv));
        self.submitted = Some(game.board.ply);
        Some(Message::PlayMove(PlayMove { mv }))
    }
}
