use crate::error::GameError;
use itertools::Itertools;
use ndarray::prelude::*;
use std::{fmt, ops::Deref};

/// Row and column, 0-indexed.
pub type Position = (usize, usize);

/// Contents of one square. `Cross` is player A (+1) and always opens.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i8)]
pub enum Mark {
    Empty = 0,
    Cross = 1,
    Nought = -1,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    CrossWins,
    NoughtWins,
    Drawn,
    InPlay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    state: Array2<Mark>,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Self::Cross => Mark::Nought,
            Self::Nought => Mark::Cross,
            Self::Empty => Mark::Empty,
        }
    }
    /// Character used in the canonical hash.
    pub fn as_char(self) -> char {
        match self {
            Self::Cross => 'x',
            Self::Nought => 'o',
            Self::Empty => '-',
        }
    }
    fn symbol(self) -> char {
        match self {
            Self::Empty => ' ',
            mark => mark.as_char(),
        }
    }
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::InPlay
    }
    fn won_by(mark: Mark) -> Self {
        match mark {
            Mark::Cross => Outcome::CrossWins,
            Mark::Nought => Outcome::NoughtWins,
            Mark::Empty => Outcome::InPlay,
        }
    }
}

impl Deref for GameState {
    type Target = Array2<Mark>;
    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let separator = "-".repeat(4 * self.size() + 1);
        for row in self.rows() {
            writeln!(f, "{separator}")?;
            writeln!(f, "| {} | ", row.iter().map(|m| m.symbol()).join(" | "))?;
        }
        writeln!(f, "{separator}")
    }
}

/// The mark shared by every cell of a line, if the line is complete.
fn line_owner<'a>(mut line: impl Iterator<Item = &'a Mark>) -> Option<Mark> {
    line.all_equal_value()
        .ok()
        .copied()
        .filter(|&mark| mark != Mark::Empty)
}

impl GameState {
    pub fn new(size: usize) -> Self {
        GameState {
            state: Array::from_elem((size, size), Mark::Empty),
        }
    }
    pub fn size(&self) -> usize {
        self.nrows()
    }
    /// Row-major key for the value table; depends only on the cell contents.
    pub fn canonical_hash(&self) -> String {
        self.iter().map(|m| m.as_char()).collect()
    }
    /// Empty squares in row-major order.
    pub fn available_positions(&self) -> Vec<Position> {
        self.indexed_iter()
            .filter(|(_index, &value)| value == Mark::Empty)
            .map(|(index, _)| index)
            .collect()
    }
    pub fn place(&mut self, (row, col): Position, mark: Mark) -> Result<(), GameError> {
        match self.state.get_mut([row, col]) {
            Some(cell) if *cell == Mark::Empty && mark != Mark::Empty => {
                *cell = mark;
                Ok(())
            }
            _ => Err(GameError::InvalidMove { row, col }),
        }
    }
    pub fn is_full(&self) -> bool {
        self.iter().all(|&value| value != Mark::Empty)
    }
    pub fn clear(&mut self) {
        self.state.fill(Mark::Empty);
    }
    /// Rows, then columns, then the main diagonal, then the anti-diagonal;
    /// the first complete line decides.
    pub fn winner(&self) -> Outcome {
        let n = self.size();
        let owner = self
            .rows()
            .into_iter()
            .find_map(|row| line_owner(row.iter()))
            .or_else(|| {
                self.columns()
                    .into_iter()
                    .find_map(|column| line_owner(column.iter()))
            })
            .or_else(|| line_owner(self.diag().iter()))
            .or_else(|| line_owner((0..n).map(|i| &self.state[[i, n - 1 - i]])));
        match owner {
            Some(mark) => Outcome::won_by(mark),
            None if self.is_full() => Outcome::Drawn,
            None => Outcome::InPlay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(rows: [[i8; 3]; 3]) -> GameState {
        let mut board = GameState::new(3);
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                let mark = match value {
                    1 => Mark::Cross,
                    -1 => Mark::Nought,
                    _ => continue,
                };
                board.place((r, c), mark).unwrap();
            }
        }
        board
    }

    #[test]
    fn center_move_leaves_eight_squares() {
        let mut board = GameState::new(3);
        board.place((1, 1), Mark::Cross).unwrap();
        assert_eq!(board.available_positions().len(), 8);
        assert!(!board.available_positions().contains(&(1, 1)));
        assert_eq!(board.winner(), Outcome::InPlay);
    }

    #[test]
    fn available_positions_are_row_major_and_stable() {
        let mut board = GameState::new(3);
        board.place((0, 1), Mark::Nought).unwrap();
        let first = board.available_positions();
        assert_eq!(first, board.available_positions());
        assert_eq!(first[..3], [(0, 0), (0, 2), (1, 0)]);
    }

    #[test]
    fn top_row_wins_for_cross() {
        let board = board_from([[1, 1, 1], [0, 0, 0], [0, 0, 0]]);
        assert_eq!(board.winner(), Outcome::CrossWins);
    }

    #[test]
    fn column_and_diagonals_win() {
        let column = board_from([[0, -1, 1], [0, -1, 1], [0, -1, 0]]);
        assert_eq!(column.winner(), Outcome::NoughtWins);
        let diagonal = board_from([[1, -1, 0], [-1, 1, 0], [0, 0, 1]]);
        assert_eq!(diagonal.winner(), Outcome::CrossWins);
        let anti = board_from([[1, 1, -1], [0, -1, 0], [-1, 0, 1]]);
        assert_eq!(anti.winner(), Outcome::NoughtWins);
    }

    #[test]
    fn full_board_without_line_is_drawn() {
        let board = board_from([[1, -1, 1], [1, -1, -1], [-1, 1, 1]]);
        assert!(board.is_full());
        assert_eq!(board.winner(), Outcome::Drawn);
    }

    #[test]
    fn first_complete_line_decides() {
        // Not reachable in alternating play; pins the checking order.
        let rows = board_from([[-1, -1, -1], [0, 0, 0], [1, 1, 1]]);
        assert_eq!(rows.winner(), Outcome::NoughtWins);
        let columns = board_from([[1, 0, -1], [1, 0, -1], [1, 0, -1]]);
        assert_eq!(columns.winner(), Outcome::CrossWins);
    }

    #[test]
    fn hash_ignores_move_order() {
        let mut first = GameState::new(3);
        first.place((0, 0), Mark::Cross).unwrap();
        first.place((2, 2), Mark::Nought).unwrap();
        first.place((1, 1), Mark::Cross).unwrap();
        let mut second = GameState::new(3);
        second.place((1, 1), Mark::Cross).unwrap();
        second.place((2, 2), Mark::Nought).unwrap();
        second.place((0, 0), Mark::Cross).unwrap();
        assert_eq!(first.canonical_hash(), second.canonical_hash());
        assert_eq!(first.canonical_hash(), "x---x---o");
    }

    #[test]
    fn invalid_moves_leave_board_untouched() {
        let mut board = GameState::new(3);
        board.place((0, 0), Mark::Cross).unwrap();
        let before = board.clone();
        assert!(matches!(
            board.place((0, 0), Mark::Nought),
            Err(GameError::InvalidMove { row: 0, col: 0 })
        ));
        assert!(board.place((3, 0), Mark::Nought).is_err());
        assert!(board.place((1, 1), Mark::Empty).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn clear_empties_every_square() {
        let mut board = board_from([[1, -1, 1], [0, 0, 0], [0, 0, 0]]);
        board.clear();
        assert_eq!(board.available_positions().len(), 9);
        assert_eq!(board.canonical_hash(), "---------");
    }

    #[test]
    fn renders_rows_with_separators() {
        let board = board_from([[1, 0, -1], [0, 0, 0], [0, 0, 0]]);
        let rendered = board.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "-------------");
        assert_eq!(lines[1], "| x |   | o | ");
        assert_eq!(lines[3], "|   |   |   | ");
    }

    #[test]
    fn larger_boards_use_the_anti_diagonal() {
        let mut board = GameState::new(4);
        for i in 0..4 {
            board.place((i, 3 - i), Mark::Cross).unwrap();
        }
        assert_eq!(board.winner(), Outcome::CrossWins);
        assert_eq!(board.available_positions().len(), 12);
    }

    #[test]
    fn marks_alternate() {
        assert_eq!(Mark::Cross.other(), Mark::Nought);
        assert_eq!(Mark::Nought.other(), Mark::Cross);
        assert_eq!(Mark::Cross as i8, 1);
        assert_eq!(Mark::Nought as i8, -1);
    }
}
