//! Room Flow Integration Tests
//!
//! Drives the game server through the in-memory transport:
//! - Lobby fill-up and late joiners
//! - Move arbitration
//! - Disconnects, timeouts and other end conditions
//! - Ping liveness and rematches

use backend::game::{GameServer, ServerState};
use backend::transport::memory::{memory_transport, MemoryClient, MemoryConnector, MemoryListener};
use backend::GameSettings;
use shared::{EndOfGame, EndReason, Eliminated, Message, Ping, PlayMove, Rematch, MESSAGE_SIZE};
use tri_engine::constants::FIFTY_MOVE_PLIES;
use tri_engine::{parse_square, Colour, Move, MoveFlag, TimeControl, DEFAULT_POSITION};

type Server = GameServer<MemoryListener>;

fn settings(position: &str, minutes: u32, increment: u32) -> GameSettings {
    GameSettings::new(position.to_string(), TimeControl { minutes, increment }).unwrap()
}

fn game_start_colour(messages: &[Message]) -> Option<Colour> {
    messages.iter().find_map(|m| match m {
        Message::GameStart(start) => Some(start.colour),
        _ => None,
    })
}

/// Three seated players, indexed White, Gray, Black
struct Table {
    server: Server,
    connector: MemoryConnector,
    seats: Vec<Option<MemoryClient>>,
}

impl Table {
    fn new(settings: GameSettings) -> Self {
        let (listener, mut connector) = memory_transport();
        let mut server = GameServer::new(listener, settings);
        let clients: Vec<MemoryClient> = (0..3).map(|_| connector.connect().unwrap()).collect();
        server.tick(0.0);
        assert_eq!(server.state(), ServerState::InGame);

        let mut seats: Vec<Option<MemoryClient>> = vec![None, None, None];
        for mut client in clients {
            let colour = game_start_colour(&client.drain()).expect("GameStart");
            assert!(seats[colour.index()].is_none(), "colour assigned twice");
            seats[colour.index()] = Some(client);
        }
        Self {
            server,
            connector,
            seats,
        }
    }

    fn seat(&mut self, colour: Colour) -> &mut MemoryClient {
        self.seats[colour.index()].as_mut().expect("seat is occupied")
    }

    fn leave(&mut self, colour: Colour) {
        self.seats[colour.index()] = None;
    }

    fn play(&mut self, colour: Colour, mv: Move) {
        self.seat(colour)
            .send(&Message::PlayMove(PlayMove { mv }))
            .unwrap();
    }

    /// Messages received by every seated player since the last call
    fn drain_all(&mut self) -> Vec<Vec<Message>> {
        self.seats
            .iter_mut()
            .flatten()
            .map(MemoryClient::drain)
            .collect()
    }
}

fn mv(from: &str, to: &str, flag: MoveFlag) -> Move {
    Move::new(parse_square(from).unwrap(), parse_square(to).unwrap(), flag)
}

fn end_of_game(messages: &[Message]) -> Option<EndOfGame> {
    messages.iter().find_map(|m| match m {
        Message::EndOfGame(end) => Some(*end),
        _ => None,
    })
}

fn eliminated(messages: &[Message]) -> Vec<Colour> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::Eliminated(Eliminated { colour, .. }) => Some(*colour),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Lobby
// ============================================================================

#[test]
fn test_three_joins_start_game_with_distinct_colours() {
    let (listener, mut connector) = memory_transport();
    let mut server = GameServer::new(listener, settings(DEFAULT_POSITION, 10, 10));

    let mut clients: Vec<MemoryClient> = (0..2).map(|_| connector.connect().unwrap()).collect();
    server.tick(0.0);
    assert_eq!(server.state(), ServerState::NoGame);
    assert_eq!(server.player_count(), 2);

    clients.push(connector.connect().unwrap());
    server.tick(0.0);
    assert_eq!(server.state(), ServerState::InGame);

    let mut colours: Vec<Colour> = clients
        .iter_mut()
        .map(|c| game_start_colour(&c.drain()).expect("every player gets GameStart"))
        .collect();
    colours.sort();
    assert_eq!(colours, Colour::ALL.to_vec());
}

#[test]
fn test_late_joiner_gets_game_in_progress_and_is_closed() {
    let mut table = Table::new(settings(DEFAULT_POSITION, 10, 10));

    let mut late = table.connector.connect().unwrap();
    table.server.tick(0.0);

    assert_eq!(late.drain(), vec![Message::GameInProgress]);
    assert!(late.is_closed());
    assert_eq!(table.server.player_count(), 3);
    assert_eq!(table.server.state(), ServerState::InGame);
}

// ============================================================================
// Moves
// ============================================================================

#[test]
fn test_legal_move_is_broadcast_with_clock() {
    let mut table = Table::new(settings(DEFAULT_POSITION, 10, 10));
    let opening = mv("We2", "We4", MoveFlag::PawnTwoForward);

    table.play(Colour::White, opening);
    table.server.tick(0.1);

    for messages in table.drain_all() {
        match messages.as_slice() {
            [Message::MovePlayed(played)] => {
                assert_eq!(played.mv, opening);
                assert!((played.seconds - 609.9).abs() < 0.01);
            }
            other => panic!("expected one MovePlayed, got {other:?}"),
        }
    }
    let board = table.server.board().unwrap();
    assert_eq!(board.side_to_move, Colour::Gray);
    assert_eq!(board.ply, 1);
}

#[test]
fn test_out_of_turn_illegal_and_malformed_input_is_dropped() {
    let mut table = Table::new(settings(DEFAULT_POSITION, 10, 10));

    table.play(Colour::Gray, mv("Ge2", "Ge4", MoveFlag::PawnTwoForward));
    table.server.tick(0.1);
    table.play(Colour::White, mv("We2", "We5", MoveFlag::None));
    table.server.tick(0.1);
    // right squares, wrong flag
    table.play(Colour::White, mv("We2", "We4", MoveFlag::None));
    table.server.tick(0.1);

    let mut garbage = [0u8; MESSAGE_SIZE];
    garbage[0] = 0xFF;
    garbage[1] = 0xFF;
    table.seat(Colour::Black).send_raw(garbage).unwrap();
    table.server.tick(0.1);

    assert!(table.drain_all().iter().all(Vec::is_empty));
    let board = table.server.board().unwrap();
    assert_eq!(board.side_to_move, Colour::White);
    assert_eq!(board.ply, 0);
    assert_eq!(table.server.player_count(), 3);
}

// ============================================================================
// End Conditions
// ============================================================================

#[test]
fn test_disconnects_eliminate_and_last_player_wins() {
    let mut table = Table::new(settings(DEFAULT_POSITION, 10, 10));

    table.leave(Colour::White);
    table.server.tick(0.1);
    for messages in table.drain_all() {
        assert_eq!(eliminated(&messages), vec![Colour::White]);
        assert!(end_of_game(&messages).is_none());
    }
    let board = table.server.board().unwrap();
    assert!(board.is_eliminated(Colour::White));
    assert_eq!(board.side_to_move, Colour::Gray);
    assert_eq!(table.server.state(), ServerState::InGame);

    table.leave(Colour::Black);
    table.server.tick(0.1);
    let messages = table.seat(Colour::Gray).drain();
    assert_eq!(eliminated(&messages), vec![Colour::Black]);
    assert_eq!(
        end_of_game(&messages),
        Some(EndOfGame {
            winner: Some(Colour::Gray),
            reason: EndReason::Abandonment,
        })
    );
    assert_eq!(table.server.state(), ServerState::AwaitingRematch);

    table.server.tick(0.1);
    assert_eq!(table.server.state(), ServerState::NoGame);
}

#[test]
fn test_flagged_clock_eliminates_without_client_input() {
    let mut table = Table::new(settings(DEFAULT_POSITION, 1, 0));

    table.server.tick(61.0);
    for messages in table.drain_all() {
        assert_eq!(eliminated(&messages), vec![Colour::White]);
    }

    table.server.tick(61.0);
    let messages = table.seat(Colour::Black).drain();
    assert_eq!(eliminated(&messages), vec![Colour::Gray]);
    assert_eq!(
        end_of_game(&messages),
        Some(EndOfGame {
            winner: Some(Colour::Black),
            reason: EndReason::Timeout,
        })
    );
}

#[test]
fn test_fifty_move_rule_draws() {
    let mut settings = settings(DEFAULT_POSITION, 10, 10);
    settings.start.halfmove_clock = FIFTY_MOVE_PLIES;
    let mut table = Table::new(settings);

    table.server.tick(0.1);
    for messages in table.drain_all() {
        assert_eq!(
            end_of_game(&messages),
            Some(EndOfGame {
                winner: None,
                reason: EndReason::FiftyMoveRule,
            })
        );
    }
}

#[test]
fn test_lone_kings_draw_by_insufficient_material() {
    let position = "B 8/8/8/8/8/3Bk4\n\
                    G 8/8/8/8/8/3Gk4\n\
                    W 8/8/8/8/8/3Wk4\n\
                    w - - - -";
    let mut table = Table::new(settings(position, 10, 10));

    table.server.tick(0.1);
    let messages = table.seat(Colour::Gray).drain();
    assert_eq!(
        end_of_game(&messages),
        Some(EndOfGame {
            winner: None,
            reason: EndReason::InsufficientMaterial,
        })
    );
}

#[test]
fn test_first_colour_without_moves_is_eliminated_and_play_continues() {
    // gray rooks take away every white king move without giving check
    let position = "B 8/8/8/8/8/3Bk4\n\
                    G 8/8/8/8/8/3Gk4\n\
                    W 1Gr6/8/8/8/2Gr5/Wk7\n\
                    w - - - -";
    let mut table = Table::new(settings(position, 10, 10));

    table.server.tick(0.1);
    for messages in table.drain_all() {
        assert_eq!(eliminated(&messages), vec![Colour::White]);
        assert!(end_of_game(&messages).is_none());
    }
    assert_eq!(table.server.state(), ServerState::InGame);
    assert_eq!(table.server.board().unwrap().side_to_move, Colour::Gray);
}

#[test]
fn test_stalemate_after_an_elimination_is_a_draw() {
    // black rooks box the gray king in; the white knights close the bridged moat
    let position = "B 8/8/8/8/8/3Bk4\n\
                    G 8/1Br6/8/8/7Br/Gk7\n\
                    W 8/8/8/8/7Wn/3Wk3Wn\n\
                    w - - - -";
    let mut table = Table::new(settings(position, 10, 10));

    table.leave(Colour::White);
    table.server.tick(0.1);
    assert_eq!(table.server.state(), ServerState::InGame);
    assert_eq!(table.server.board().unwrap().side_to_move, Colour::Gray);

    table.server.tick(0.1);
    for messages in table.drain_all() {
        assert_eq!(eliminated(&messages), vec![Colour::White]);
        assert_eq!(
            end_of_game(&messages),
            Some(EndOfGame {
                winner: None,
                reason: EndReason::Stalemate,
            })
        );
    }
    assert!(!table.server.board().unwrap().is_eliminated(Colour::Gray));
}

// ============================================================================
// Liveness and Rematch
// ============================================================================

#[test]
fn test_missed_ping_disconnects_in_lobby() {
    let (listener, mut connector) = memory_transport();
    let mut server = GameServer::new(listener, settings(DEFAULT_POSITION, 10, 10));
    let mut alive = connector.connect().unwrap();
    let mut silent = connector.connect().unwrap();

    server.tick(1.0);
    let nonce = alive
        .drain()
        .iter()
        .find_map(|m| match m {
            Message::Ping(Ping { nonce }) => Some(*nonce),
            _ => None,
        })
        .expect("ping after one second");
    alive.send(&Message::Ping(Ping { nonce })).unwrap();

    server.tick(1.0);
    assert_eq!(server.player_count(), 1);
    assert!(silent.is_closed());
    assert!(!alive.is_closed());
}

#[test]
fn test_rematch_needs_all_three_votes() {
    let mut table = Table::new(settings(DEFAULT_POSITION, 1, 0));
    table.server.tick(61.0);
    table.server.tick(61.0);
    assert_eq!(table.server.state(), ServerState::AwaitingRematch);
    table.drain_all();

    for (colour, agree) in [
        (Colour::White, true),
        (Colour::Gray, true),
        (Colour::Black, false),
    ] {
        table
            .seat(colour)
            .send(&Message::Rematch(Rematch { agree }))
            .unwrap();
    }
    table.server.tick(0.0);
    assert_eq!(table.server.state(), ServerState::AwaitingRematch);

    table
        .seat(Colour::Black)
        .send(&Message::Rematch(Rematch { agree: true }))
        .unwrap();
    table.server.tick(0.0);
    assert_eq!(table.server.state(), ServerState::InGame);
    for messages in table.drain_all() {
        assert!(game_start_colour(&messages).is_some());
    }
    assert_eq!(table.server.remaining(Colour::White), Some(60.0));
}
