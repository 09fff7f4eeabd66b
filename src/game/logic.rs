//! Tic-tac-toe rules, independent of the engine

use std::fmt;

pub const BOARD_SIZE: usize = 3;

/// Every line that wins, in the order they are checked: rows, columns,
/// then the two diagonals.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Name of the image drawn for this mark
    pub fn image(self) -> &'static str {
        match self {
            Mark::X => "cross",
            Mark::O => "circle",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// Outcome of trying to place a mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed(Mark),
    Occupied,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    cells: [[Option<Mark>; BOARD_SIZE]; BOARD_SIZE],
    turn: Mark,
    running: bool,
    winner: Option<Mark>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Empty board, X to move.
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            turn: Mark::X,
            running: true,
            winner: None,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Mark> {
        self.cells[row][col]
    }

    /// Whose turn it is
    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// The mark a hover over `(row, col)` should preview, if any.
    pub fn preview(&self, row: usize, col: usize) -> Option<Mark> {
        (self.running && self.cells[row][col].is_none()).then_some(self.turn)
    }

    /// Put the current player's mark on `(row, col)`. The turn passes only
    /// when the mark is actually placed.
    pub fn place(&mut self, row: usize, col: usize) -> Placement {
        if !self.running {
            return Placement::GameOver;
        }
        if self.cells[row][col].is_some() {
            return Placement::Occupied;
        }

        let mark = self.turn;
        self.cells[row][col] = Some(mark);
        self.turn = mark.other();
        Placement::Placed(mark)
    }

    /// Look for a completed line. The first one found ends the game.
    pub fn check_winner(&mut self) -> Option<Mark> {
        if self.winner.is_some() {
            return self.winner;
        }

        for line in LINES {
            let [a, b, c] = line.map(|(row, col)| self.cells[row][col]);
            if let Some(mark) = a {
                if b == a && c == a {
                    log::info!("{} wins!", mark);
                    self.running = false;
                    self.winner = Some(mark);
                    return self.winner;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_line_wins() {
        for line in LINES {
            for mark in [Mark::X, Mark::O] {
                let mut state = GameState::new();
                for (row, col) in line {
                    state.cells[row][col] = Some(mark);
                }
                assert_eq!(state.check_winner(), Some(mark), "{:?} with {:?}", line, mark);
                assert!(!state.is_running());
                assert_eq!(state.winner(), Some(mark));
            }
        }
    }

    #[test]
    fn test_full_board_without_line_keeps_running() {
        // X O X
        // X O O
        // O X X
        let mut state = GameState::new();
        for (row, col) in [(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (2, 0), (2, 1), (1, 2), (2, 2)] {
            assert!(matches!(state.place(row, col), Placement::Placed(_)));
            assert_eq!(state.check_winner(), None);
        }
        assert!(state.is_running());
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_no_full_board_without_line_ends_the_game() {
        // Bit i is cell (i / 3, i % 3)
        const WINS: [u16; 8] = [
            0b000_000_111,
            0b000_111_000,
            0b111_000_000,
            0b001_001_001,
            0b010_010_010,
            0b100_100_100,
            0b100_010_001,
            0b001_010_100,
        ];

        let mut drawn = 0;
        for crosses in 0u16..0b1_000_000_000 {
            if crosses.count_ones() != 5 {
                continue;
            }
            let circles = !crosses & 0b111_111_111;
            if WINS.iter().any(|&w| crosses & w == w || circles & w == w) {
                continue;
            }

            let mut state = GameState::new();
            for i in 0..9 {
                let mark = if crosses & (1 << i) != 0 { Mark::X } else { Mark::O };
                state.cells[i / 3][i % 3] = Some(mark);
            }
            assert_eq!(state.check_winner(), None, "board {:09b}", crosses);
            assert!(state.is_running());
            drawn += 1;
        }
        assert_eq!(drawn, 16);
    }

    #[test]
    fn test_turn_alternates_only_on_placement() {
        let mut state = GameState::new();
        assert_eq!(state.place(1, 1), Placement::Placed(Mark::X));
        assert_eq!(state.turn(), Mark::O);

        assert_eq!(state.place(1, 1), Placement::Occupied);
        assert_eq!(state.turn(), Mark::O);
        assert_eq!(state.cell(1, 1), Some(Mark::X));

        assert_eq!(state.place(0, 0), Placement::Placed(Mark::O));
        assert_eq!(state.turn(), Mark::X);
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let mut state = GameState::new();
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            state.place(row, col);
        }
        assert_eq!(state.check_winner(), Some(Mark::X));

        assert_eq!(state.place(2, 2), Placement::GameOver);
        assert_eq!(state.cell(2, 2), None);
        assert_eq!(state.preview(2, 2), None);
        assert_eq!(state.turn(), Mark::O);
    }

    #[test]
    fn test_first_line_found_wins() {
        let mut state = GameState::new();
        for col in 0..BOARD_SIZE {
            state.cells[0][col] = Some(Mark::O);
            state.cells[2][col] = Some(Mark::X);
        }
        assert_eq!(state.check_winner(), Some(Mark::O));
    }

    #[test]
    fn test_preview() {
        let mut state = GameState::new();
        assert_eq!(state.preview(0, 0), Some(Mark::X));
        state.place(0, 0);
        assert_eq!(state.preview(0, 0), None);
        assert_eq!(state.preview(0, 1), Some(Mark::O));
    }
}
