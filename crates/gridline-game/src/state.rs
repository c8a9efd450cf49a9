//! The per-room game state machine.
//!
//! [`GameState`] is the validated record behind a room: board, turn,
//! winner, per-seat names and win counters, and the host-settable
//! config. The room session owns one of these and funnels every event
//! through [`GameState::validate_move`] before mutating — rejection has
//! no side effects, which is what lets invalid input be dropped silently
//! without a broadcast.

use gridline_protocol::{Cell, Seat, Winner};

use crate::detect::{evaluate, Outcome};

/// Board dimension used until the host configures one.
pub const DEFAULT_GRID_SIZE: usize = 3;

/// What an accepted move did to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Mark placed, game continues, turn advanced.
    Placed,
    /// Mark placed and it completed this line. Turn frozen.
    Won { line: Vec<usize> },
    /// Mark placed, board full, no line. Turn frozen.
    Drawn,
}

/// One room's game state.
///
/// `board`, `turn`, `winner`, and `win_line` are round state, cleared by
/// [`reset_round`](Self::reset_round). `names` and `wins` are room
/// state and survive resets for the room's lifetime.
#[derive(Debug, Clone)]
pub struct GameState {
    grid_size: usize,
    board: Vec<Cell>,
    turn: Seat,
    winner: Option<Winner>,
    win_line: Vec<usize>,
    names: [String; 2],
    wins: [u32; 2],
    timer_seconds: Option<u64>,
    ai_enabled: bool,
}

impl GameState {
    /// Creates a fresh game with the given board dimension.
    pub fn new(grid_size: usize) -> Self {
        debug_assert!(grid_size >= 1);
        Self {
            grid_size,
            board: vec![None; grid_size * grid_size],
            turn: Seat::Host,
            winner: None,
            win_line: Vec::new(),
            names: [String::new(), String::new()],
            wins: [0, 0],
            timer_seconds: None,
            ai_enabled: false,
        }
    }

    /// Applies host config and starts a fresh round.
    ///
    /// Absent fields keep their current values, so a host re-join
    /// without options is simply "new game, same settings". Callers
    /// must have already checked `grid_size >= 1`.
    pub fn configure(
        &mut self,
        grid_size: Option<usize>,
        timer_seconds: Option<u64>,
        ai_enabled: Option<bool>,
    ) {
        if let Some(n) = grid_size {
            debug_assert!(n >= 1);
            self.grid_size = n;
        }
        if let Some(secs) = timer_seconds {
            self.timer_seconds = Some(secs);
        }
        if let Some(ai) = ai_enabled {
            self.ai_enabled = ai;
        }
        self.reset_round();
    }

    /// Records a seat's display name. Survives resets and disconnects.
    pub fn set_name(&mut self, seat: Seat, name: String) {
        self.names[seat.index()] = name;
    }

    /// The single validation gate for moves.
    ///
    /// Checks every precondition without touching state: the sender's
    /// turn, the game not being over, the index in range, and the cell
    /// empty. The returned reason is for debug logging only — invalid
    /// moves are dropped, not answered.
    pub fn validate_move(&self, seat: Seat, index: usize) -> Result<(), String> {
        if self.winner.is_some() {
            return Err("game is over".into());
        }
        if self.turn != seat {
            return Err("not your turn".into());
        }
        if index >= self.board.len() {
            return Err(format!(
                "index {index} out of range for a {n}x{n} board",
                n = self.grid_size
            ));
        }
        if self.board[index].is_some() {
            return Err("cell is occupied".into());
        }
        Ok(())
    }

    /// Places `seat`'s mark at `index` and re-evaluates the board.
    ///
    /// The move must have passed [`validate_move`](Self::validate_move).
    /// On a win the seat's counter is incremented and the turn freezes;
    /// on a draw the turn freezes; otherwise the turn advances.
    pub fn apply_move(&mut self, seat: Seat, index: usize) -> MoveOutcome {
        debug_assert!(self.validate_move(seat, index).is_ok());

        self.board[index] = Some(seat.mark());

        match evaluate(&self.board, self.grid_size) {
            Outcome::Line { mark, indices } => {
                self.winner = Some(Winner::from(mark));
                self.win_line = indices.clone();
                self.wins[seat.index()] += 1;
                MoveOutcome::Won { line: indices }
            }
            Outcome::Draw => {
                self.winner = Some(Winner::Draw);
                MoveOutcome::Drawn
            }
            Outcome::Continue => {
                self.turn = self.turn.other();
                MoveOutcome::Placed
            }
        }
    }

    /// Passes the pending turn without touching the board.
    ///
    /// This is the timer-expiry action: an automatic pass, not a loss.
    pub fn forfeit_turn(&mut self) {
        if self.winner.is_none() {
            self.turn = self.turn.other();
        }
    }

    /// Clears the round: empty board, turn back to the host, winner and
    /// win line gone. `names`, `wins`, and config are untouched.
    pub fn reset_round(&mut self) {
        self.board = vec![None; self.grid_size * self.grid_size];
        self.turn = Seat::Host;
        self.winner = None;
        self.win_line.clear();
    }

    /// Indices of currently-empty cells, in board order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| i)
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn board(&self) -> &[Cell] {
        &self.board
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn win_line(&self) -> &[usize] {
        &self.win_line
    }

    pub fn names(&self) -> &[String; 2] {
        &self.names
    }

    pub fn wins(&self) -> [u32; 2] {
        self.wins
    }

    pub fn timer_seconds(&self) -> Option<u64> {
        self.timer_seconds
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridline_protocol::Mark;

    /// Validates and applies a move, panicking on rejection — for the
    /// happy-path sequences below.
    fn play(game: &mut GameState, seat: Seat, index: usize) -> MoveOutcome {
        game.validate_move(seat, index).expect("move should be valid");
        game.apply_move(seat, index)
    }

    #[test]
    fn test_new_game_defaults() {
        let game = GameState::default();
        assert_eq!(game.grid_size(), 3);
        assert_eq!(game.board().len(), 9);
        assert!(game.board().iter().all(|c| c.is_none()));
        assert_eq!(game.turn(), Seat::Host);
        assert_eq!(game.winner(), None);
        assert!(game.win_line().is_empty());
        assert_eq!(game.wins(), [0, 0]);
    }

    #[test]
    fn test_turn_alternates_while_game_continues() {
        let mut game = GameState::new(3);
        assert_eq!(play(&mut game, Seat::Host, 0), MoveOutcome::Placed);
        assert_eq!(game.turn(), Seat::Guest);
        assert_eq!(play(&mut game, Seat::Guest, 4), MoveOutcome::Placed);
        assert_eq!(game.turn(), Seat::Host);
    }

    #[test]
    fn test_validate_rejects_wrong_turn() {
        let game = GameState::new(3);
        let err = game.validate_move(Seat::Guest, 0).unwrap_err();
        assert!(err.contains("not your turn"));
    }

    #[test]
    fn test_validate_rejects_occupied_cell() {
        let mut game = GameState::new(3);
        play(&mut game, Seat::Host, 0);
        let err = game.validate_move(Seat::Guest, 0).unwrap_err();
        assert!(err.contains("occupied"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let game = GameState::new(3);
        let err = game.validate_move(Seat::Host, 9).unwrap_err();
        assert!(err.contains("out of range"));
    }

    #[test]
    fn test_rejection_has_no_side_effects() {
        let mut game = GameState::new(3);
        play(&mut game, Seat::Host, 0);

        let before = game.clone();
        // Wrong turn, occupied cell, out of range — none may mutate.
        assert!(game.validate_move(Seat::Host, 1).is_err());
        assert!(game.validate_move(Seat::Guest, 0).is_err());
        assert!(game.validate_move(Seat::Guest, 99).is_err());

        assert_eq!(game.board(), before.board());
        assert_eq!(game.turn(), before.turn());
        assert_eq!(game.winner(), before.winner());
    }

    #[test]
    fn test_host_wins_top_row() {
        // Seat 0 takes 0,1,2 while seat 1 plays elsewhere.
        let mut game = GameState::new(3);
        play(&mut game, Seat::Host, 0);
        play(&mut game, Seat::Guest, 3);
        play(&mut game, Seat::Host, 1);
        play(&mut game, Seat::Guest, 4);

        let outcome = play(&mut game, Seat::Host, 2);

        assert_eq!(outcome, MoveOutcome::Won { line: vec![0, 1, 2] });
        assert_eq!(game.winner(), Some(Winner::X));
        assert_eq!(game.win_line(), &[0, 1, 2]);
        assert_eq!(game.wins(), [1, 0]);
        // Turn does not advance past a finished game.
        assert_eq!(game.turn(), Seat::Host);
    }

    #[test]
    fn test_draw_sequence_fills_board_without_line() {
        // X:0 O:1 X:2 O:4 X:3 O:6 X:7 O:5 X:8 — full board, no line.
        let mut game = GameState::new(3);
        for (seat, index) in [
            (Seat::Host, 0),
            (Seat::Guest, 1),
            (Seat::Host, 2),
            (Seat::Guest, 4),
            (Seat::Host, 3),
            (Seat::Guest, 6),
            (Seat::Host, 7),
            (Seat::Guest, 5),
        ] {
            assert_eq!(play(&mut game, seat, index), MoveOutcome::Placed);
        }

        assert_eq!(play(&mut game, Seat::Host, 8), MoveOutcome::Drawn);
        assert_eq!(game.winner(), Some(Winner::Draw));
        assert!(game.win_line().is_empty());
        assert_eq!(game.wins(), [0, 0]);
    }

    #[test]
    fn test_finished_game_is_a_fixed_point() {
        let mut game = GameState::new(3);
        play(&mut game, Seat::Host, 0);
        play(&mut game, Seat::Guest, 3);
        play(&mut game, Seat::Host, 1);
        play(&mut game, Seat::Guest, 4);
        play(&mut game, Seat::Host, 2);

        let finished = game.clone();
        for seat in [Seat::Host, Seat::Guest] {
            for index in 0..9 {
                let err = game.validate_move(seat, index).unwrap_err();
                assert!(err.contains("game is over"));
            }
        }
        assert_eq!(game.board(), finished.board());
        assert_eq!(game.winner(), finished.winner());
        assert_eq!(game.win_line(), finished.win_line());
    }

    #[test]
    fn test_forfeit_turn_flips_turn_and_leaves_board() {
        let mut game = GameState::new(3);
        play(&mut game, Seat::Host, 4);
        let board = game.board().to_vec();

        game.forfeit_turn();
        assert_eq!(game.turn(), Seat::Host);
        assert_eq!(game.board(), board.as_slice());

        game.forfeit_turn();
        assert_eq!(game.turn(), Seat::Guest);
    }

    #[test]
    fn test_forfeit_turn_is_inert_after_game_over() {
        let mut game = GameState::new(3);
        play(&mut game, Seat::Host, 0);
        play(&mut game, Seat::Guest, 3);
        play(&mut game, Seat::Host, 1);
        play(&mut game, Seat::Guest, 4);
        play(&mut game, Seat::Host, 2);

        game.forfeit_turn();
        assert_eq!(game.turn(), Seat::Host);
    }

    #[test]
    fn test_reset_round_keeps_names_and_wins() {
        let mut game = GameState::new(3);
        game.set_name(Seat::Host, "alice".into());
        game.set_name(Seat::Guest, "bob".into());
        play(&mut game, Seat::Host, 0);
        play(&mut game, Seat::Guest, 3);
        play(&mut game, Seat::Host, 1);
        play(&mut game, Seat::Guest, 4);
        play(&mut game, Seat::Host, 2);

        game.reset_round();

        assert!(game.board().iter().all(|c| c.is_none()));
        assert_eq!(game.turn(), Seat::Host);
        assert_eq!(game.winner(), None);
        assert!(game.win_line().is_empty());
        assert_eq!(game.wins(), [1, 0]);
        assert_eq!(game.names(), &["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn test_configure_resizes_board_and_resets_round() {
        let mut game = GameState::new(3);
        play(&mut game, Seat::Host, 0);

        game.configure(Some(4), Some(10), Some(true));

        assert_eq!(game.grid_size(), 4);
        assert_eq!(game.board().len(), 16);
        assert!(game.board().iter().all(|c| c.is_none()));
        assert_eq!(game.timer_seconds(), Some(10));
        assert!(game.ai_enabled());
        assert_eq!(game.turn(), Seat::Host);
    }

    #[test]
    fn test_configure_without_fields_keeps_settings() {
        let mut game = GameState::new(3);
        game.configure(Some(5), Some(7), Some(true));
        play(&mut game, Seat::Host, 0);

        // Host re-join with no options: fresh round, same settings.
        game.configure(None, None, None);

        assert_eq!(game.grid_size(), 5);
        assert_eq!(game.timer_seconds(), Some(7));
        assert!(game.ai_enabled());
        assert!(game.board().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_empty_cells_tracks_board() {
        let mut game = GameState::new(2);
        assert_eq!(game.empty_cells().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        play(&mut game, Seat::Host, 1);
        assert_eq!(game.empty_cells().collect::<Vec<_>>(), vec![0, 2, 3]);
    }

    #[test]
    fn test_marks_match_seats() {
        let mut game = GameState::new(3);
        play(&mut game, Seat::Host, 0);
        play(&mut game, Seat::Guest, 1);
        assert_eq!(game.board()[0], Some(Mark::X));
        assert_eq!(game.board()[1], Some(Mark::O));
    }
}
