use thiserror::Error;

/// Reasons a pair of coverage tables can be rejected when building a
/// [`Problem`](crate::Problem).
///
/// These are all programming errors on the caller's side: the solver
/// only ever runs on tables that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError<C, R> {
    #[error("column {0:?} was declared twice")]
    DuplicateColumn(C),

    #[error("row {0:?} was declared twice")]
    DuplicateRow(R),

    #[error("row {row:?} covers column {column:?}, which was never declared")]
    UnknownColumn { row: R, column: C },

    #[error("row {row:?} lists column {column:?} more than once")]
    RepeatedColumn { row: R, column: C },

    #[error("column {column:?} lists row {row:?}, which has no options entry")]
    UnknownRow { column: C, row: R },

    #[error("column {column:?} and row {row:?} disagree about covering each other")]
    Asymmetric { column: C, row: R },
}

/// Errors raised while setting up a puzzle board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("unknown month {0:?}")]
    UnknownMonth(String),

    #[error("day {0} is outside 1..=31")]
    DayOutOfRange(u32),

    #[error("a piece shape needs at least one cell")]
    EmptyShape,

    #[error("board dimensions must be non-zero, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },

    #[error("cell ({x}, {y}) lies outside the {width}x{height} board")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("no orientation {orientation} of piece {piece} to place")]
    UnknownPlacement { piece: usize, orientation: usize },

    #[error("piece {piece} cannot cover cell ({x}, {y})")]
    CellNotFree { piece: char, x: usize, y: usize },
}
