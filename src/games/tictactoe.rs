//! Tic-tac-toe rules
//!
//! Turn-based, so it does not run on the simulation loop. The host maps
//! cell clicks to `play` and renders `board()` and `status()` into the DOM.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Player::X => "X",
            Player::O => "O",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won(Player),
    Draw,
}

/// Why a move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    OutOfRange,
    Occupied,
    GameOver,
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Snapshot {
    board: [Option<Player>; 9],
    current: Player,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToe {
    board: [Option<Player>; 9],
    current: Player,
    outcome: Outcome,
    history: Vec<Snapshot>,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            current: Player::X,
            outcome: Outcome::InProgress,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &[Option<Player>; 9] {
        &self.board
    }

    pub fn current(&self) -> Player {
        self.current
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Place the current player's mark at `index` (0-8, row-major)
    pub fn play(&mut self, index: usize) -> Result<Outcome, MoveError> {
        if self.outcome != Outcome::InProgress {
            return Err(MoveError::GameOver);
        }
        let cell = self.board.get_mut(index).ok_or(MoveError::OutOfRange)?;
        if cell.is_some() {
            return Err(MoveError::Occupied);
        }

        self.history.push(Snapshot {
            board: self.board,
            current: self.current,
        });
        self.board[index] = Some(self.current);

        if self.has_line(self.current) {
            self.outcome = Outcome::Won(self.current);
            log::info!("Player {} wins", self.current);
        } else if self.board.iter().all(Option::is_some) {
            self.outcome = Outcome::Draw;
            log::info!("Game ended in a draw");
        } else {
            self.current = self.current.other();
        }
        Ok(self.outcome)
    }

    fn has_line(&self, player: Player) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.board[i] == Some(player)))
    }

    /// Undo is available while the game is still open and a move was made
    pub fn can_undo(&self) -> bool {
        self.outcome == Outcome::InProgress && !self.history.is_empty()
    }

    /// Take back the last move. Returns false when undo is not available.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        match self.history.pop() {
            Some(snapshot) => {
                self.board = snapshot.board;
                self.current = snapshot.current;
                true
            }
            None => false,
        }
    }

    pub fn restart(&mut self) {
        *self = Self::new();
    }

    /// Status line for the page
    pub fn status(&self) -> String {
        match self.outcome {
            Outcome::InProgress => format!("Player {}'s turn", self.current),
            Outcome::Won(player) => format!("Player {} wins!", player),
            Outcome::Draw => "Game ended in a draw!".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_all(game: &mut TicTacToe, moves: &[usize]) {
        for &m in moves {
            game.play(m).unwrap();
        }
    }

    #[test]
    fn test_x_first_and_alternates() {
        let mut game = TicTacToe::new();
        assert_eq!(game.current(), Player::X);
        game.play(4).unwrap();
        assert_eq!(game.current(), Player::O);
        assert_eq!(game.board()[4], Some(Player::X));
        assert_eq!(game.status(), "Player O's turn");
    }

    #[test]
    fn test_rejects_bad_moves() {
        let mut game = TicTacToe::new();
        game.play(0).unwrap();
        assert_eq!(game.play(0), Err(MoveError::Occupied));
        assert_eq!(game.play(9), Err(MoveError::OutOfRange));
        assert_eq!(game.current(), Player::O);
    }

    #[test]
    fn test_diagonal_win_locks_board() {
        let mut game = TicTacToe::new();
        play_all(&mut game, &[0, 1, 4, 2]);
        assert_eq!(game.play(8), Ok(Outcome::Won(Player::X)));
        assert_eq!(game.status(), "Player X wins!");
        assert_eq!(game.play(5), Err(MoveError::GameOver));
        assert!(!game.can_undo());
        assert!(!game.undo());
    }

    #[test]
    fn test_draw() {
        let mut game = TicTacToe::new();
        // X O X / X O O / O X X
        play_all(&mut game, &[0, 1, 2, 4, 3, 5, 7, 6]);
        assert_eq!(game.play(8), Ok(Outcome::Draw));
        assert_eq!(game.status(), "Game ended in a draw!");
    }

    #[test]
    fn test_undo_restores_turn() {
        let mut game = TicTacToe::new();
        assert!(!game.can_undo());
        play_all(&mut game, &[0, 4]);
        assert!(game.undo());
        assert_eq!(game.board()[4], None);
        assert_eq!(game.current(), Player::O);
        assert!(game.undo());
        assert!(!game.undo());
        assert_eq!(game, TicTacToe::new());
    }

    #[test]
    fn test_restart() {
        let mut game = TicTacToe::new();
        play_all(&mut game, &[0, 3, 1, 4, 2]);
        assert_eq!(game.outcome(), Outcome::Won(Player::X));
        game.restart();
        assert_eq!(game, TicTacToe::new());
    }
}
