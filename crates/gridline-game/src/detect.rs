//! The win detector: a pure function over a board.

use gridline_protocol::{Cell, Mark};

/// The result of evaluating a board position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No line is complete and at least one cell is empty.
    Continue,
    /// A line is fully occupied by one mark. `indices` are the board
    /// positions forming the line, in line order.
    Line { mark: Mark, indices: Vec<usize> },
    /// Every cell is occupied and no line is uniform.
    Draw,
}

/// Evaluates an N×N board for a completed line or a draw.
///
/// Candidate lines are checked in a fixed total order: for each
/// `i in 0..n`, row `i` then column `i`; then the main diagonal; then
/// the anti-diagonal — 2N+2 lines for a square grid. The first uniform
/// non-empty line wins, which makes the result deterministic when a
/// single move completes more than one line at once (a corner move can
/// finish a row and a diagonal simultaneously).
///
/// For `n == 1` the row, column, and both diagonals collapse to the
/// single cell; the row is checked first, so exactly one `Line` is
/// reported.
pub fn evaluate(board: &[Cell], n: usize) -> Outcome {
    debug_assert_eq!(board.len(), n * n, "board must have n² cells");

    let mut lines: Vec<Vec<usize>> = Vec::with_capacity(2 * n + 2);
    for i in 0..n {
        lines.push((0..n).map(|c| i * n + c).collect());
        lines.push((0..n).map(|r| r * n + i).collect());
    }
    lines.push((0..n).map(|i| i * n + i).collect());
    lines.push((0..n).map(|i| (i + 1) * n - (i + 1)).collect());

    for indices in lines {
        if let Some(mark) = board[indices[0]] {
            if indices.iter().all(|&i| board[i] == Some(mark)) {
                return Outcome::Line { mark, indices };
            }
        }
    }

    if board.iter().all(|cell| cell.is_some()) {
        Outcome::Draw
    } else {
        Outcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_board(n: usize) -> Vec<Cell> {
        vec![None; n * n]
    }

    /// Builds an n×n board with the given indices set to `mark`.
    fn board_with(n: usize, mark: Mark, indices: &[usize]) -> Vec<Cell> {
        let mut board = empty_board(n);
        for &i in indices {
            board[i] = Some(mark);
        }
        board
    }

    #[test]
    fn test_empty_board_continues_for_all_sizes() {
        for n in 1..=5 {
            assert_eq!(evaluate(&empty_board(n), n), Outcome::Continue, "n={n}");
        }
    }

    #[test]
    fn test_every_row_and_column_detected() {
        for n in [3, 4] {
            for i in 0..n {
                let row: Vec<usize> = (0..n).map(|c| i * n + c).collect();
                let board = board_with(n, Mark::X, &row);
                assert_eq!(
                    evaluate(&board, n),
                    Outcome::Line { mark: Mark::X, indices: row },
                    "row {i} of {n}x{n}"
                );

                let col: Vec<usize> = (0..n).map(|r| r * n + i).collect();
                let board = board_with(n, Mark::O, &col);
                assert_eq!(
                    evaluate(&board, n),
                    Outcome::Line { mark: Mark::O, indices: col },
                    "column {i} of {n}x{n}"
                );
            }
        }
    }

    #[test]
    fn test_both_diagonals_detected() {
        for n in [2, 3, 4] {
            let main: Vec<usize> = (0..n).map(|i| i * n + i).collect();
            let board = board_with(n, Mark::X, &main);
            assert_eq!(
                evaluate(&board, n),
                Outcome::Line { mark: Mark::X, indices: main },
                "main diagonal of {n}x{n}"
            );

            let anti: Vec<usize> = (0..n).map(|i| (i + 1) * n - (i + 1)).collect();
            let board = board_with(n, Mark::O, &anti);
            assert_eq!(
                evaluate(&board, n),
                Outcome::Line { mark: Mark::O, indices: anti },
                "anti-diagonal of {n}x{n}"
            );
        }
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // X O X / X O O / O X X — filled, no uniform line.
        use Mark::{O, X};
        let board: Vec<Cell> = [X, O, X, X, O, O, O, X, X]
            .into_iter()
            .map(Some)
            .collect();
        assert_eq!(evaluate(&board, 3), Outcome::Draw);
    }

    #[test]
    fn test_partial_board_without_line_continues() {
        let board = board_with(3, Mark::X, &[0, 4]);
        assert_eq!(evaluate(&board, 3), Outcome::Continue);
    }

    #[test]
    fn test_dual_completion_row_beats_anti_diagonal() {
        // Row 0 (0,1,2) and the anti-diagonal (2,4,6) are both complete;
        // the move at index 2 finished both. Row 0 is checked first.
        let board = board_with(3, Mark::X, &[0, 1, 2, 4, 6]);
        assert_eq!(
            evaluate(&board, 3),
            Outcome::Line { mark: Mark::X, indices: vec![0, 1, 2] }
        );
    }

    #[test]
    fn test_dual_completion_column_beats_main_diagonal() {
        // Column 0 (0,3,6) and the main diagonal (0,4,8) are both
        // complete. Column 0 comes right after row 0 in the check
        // order, well before the diagonals.
        let board = board_with(3, Mark::O, &[0, 3, 6, 4, 8]);
        assert_eq!(
            evaluate(&board, 3),
            Outcome::Line { mark: Mark::O, indices: vec![0, 3, 6] }
        );
    }

    #[test]
    fn test_one_by_one_grid_reports_single_line() {
        let board = vec![Some(Mark::X)];
        // Row 0, column 0, and both diagonals are the same cell; the
        // detector must terminate with one Line, not double-report.
        assert_eq!(
            evaluate(&board, 1),
            Outcome::Line { mark: Mark::X, indices: vec![0] }
        );
    }

    #[test]
    fn test_one_by_one_empty_grid_continues() {
        assert_eq!(evaluate(&[None], 1), Outcome::Continue);
    }
}
