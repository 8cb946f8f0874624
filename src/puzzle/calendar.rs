//! The "puzzle a day" calendar: a 7x7 tray showing the months and the
//! days of the month, tiled by nine pieces so that exactly the cells
//! of one month and one day stay visible.
//!
//! ```text
//! Jan Feb Mar Apr May Jun  #
//! Jul Aug Sep Oct Nov Dec  #
//!  1   2   3   4   5   6   7
//!  8   9  10  11  12  13  14
//! 15  16  17  18  19  20  21
//! 22  23  24  25  26  27  28
//!  #   #  29  30  31   #   #
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::PuzzleError;
use crate::puzzle::board::Board;
use crate::puzzle::shape::Piece;

pub const SIZE: usize = 7;

/// Cells of the 7x7 square that are not part of the tray.
pub const WALLS: [(usize, usize); 6] = [(6, 0), (6, 1), (0, 6), (1, 6), (5, 6), (6, 6)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// 1 for January through 12 for December.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Where this month sits on the tray: six months to a row.
    pub fn cell(self) -> (usize, usize) {
        let index = self as usize;
        (index % 6, index / 6)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts a month number (`"3"`), a full name (`"March"`) or a three
/// letter abbreviation (`"mar"`), ignoring case.
impl FromStr for Month {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Month, PuzzleError> {
        let s = s.trim();
        if let Ok(number) = s.parse::<usize>() {
            return match number {
                1..=12 => Ok(Month::ALL[number - 1]),
                _ => Err(PuzzleError::UnknownMonth(s.to_string())),
            };
        }
        let lower = s.to_lowercase();
        Month::ALL
            .into_iter()
            .find(|month| {
                let name = month.name().to_lowercase();
                lower == name || (lower.len() == 3 && name.starts_with(&lower))
            })
            .ok_or_else(|| PuzzleError::UnknownMonth(s.to_string()))
    }
}

/// Where `day` sits on the tray: seven days to a row below the months,
/// with 29 to 31 in the middle of the short bottom row.
pub fn day_cell(day: u32) -> Result<(usize, usize), PuzzleError> {
    match day {
        1..=28 => {
            let index = (day - 1) as usize;
            Ok((index % 7, 2 + index / 7))
        }
        29..=31 => Ok(((day - 27) as usize, 6)),
        _ => Err(PuzzleError::DayOutOfRange(day)),
    }
}

/// The nine pieces, `A` to `I`.  Their areas add up to 41, the number
/// of tray cells left once a month and a day are marked.
pub fn pieces() -> Vec<Piece> {
    vec![
        // 2x2 square
        Piece::from_cells('A', &[(0, 0), (1, 0), (0, 1), (1, 1)]),
        // cross
        Piece::from_cells('B', &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)]),
        // C
        Piece::from_cells('C', &[(0, 0), (1, 0), (0, 1), (0, 2), (1, 2)]),
        // long elbow
        Piece::from_cells('D', &[(2, 0), (0, 1), (1, 1), (2, 1), (0, 2)]),
        // short elbow
        Piece::from_cells('E', &[(1, 0), (0, 1), (1, 1), (0, 2)]),
        // tetris T
        Piece::from_cells('F', &[(0, 0), (0, 1), (1, 1), (0, 2)]),
        // square plus one
        Piece::from_cells('G', &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]),
        // L
        Piece::from_cells('H', &[(0, 0), (1, 0), (0, 1), (0, 2)]),
        // long L
        Piece::from_cells('I', &[(0, 0), (1, 0), (0, 1), (0, 2), (0, 3)]),
    ]
}

impl Board {
    /// The calendar tray with `month` and `day` marked.
    ///
    /// Every day from 1 to 31 is accepted for every month; the tray
    /// doesn't know about month lengths.
    pub fn calendar(month: Month, day: u32) -> Result<Board, PuzzleError> {
        let mut board = Board::new(SIZE, SIZE)?;
        for (x, y) in WALLS {
            board.wall(x, y)?;
        }
        let (x, y) = month.cell();
        board.mark(x, y)?;
        let (x, y) = day_cell(day)?;
        board.mark(x, y)?;
        Ok(board)
    }
}
