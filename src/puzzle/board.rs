use std::collections::BTreeSet;
use std::fmt;

use log::debug;

use crate::error::{PuzzleError, TableError};
use crate::puzzle::shape::Piece;
use crate::table::Problem;

/// A column of a tiling problem.
///
/// Cells order before pieces, and cells in reading order, so the
/// solver's lowest-column tie-break works through the board from the
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// This free cell must be covered by exactly one piece.
    Cell { y: usize, x: usize },
    /// The piece with this index must be used exactly once.
    Piece(usize),
}

/// A row of a tiling problem: one piece, in one of its orientations,
/// with the orientation's top-left bounding box corner at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placement {
    pub piece: usize,
    pub orientation: usize,
    pub x: usize,
    pub y: usize,
}

impl Placement {
    /// The board cells this placement occupies.
    pub fn cells<'a>(self, pieces: &'a [Piece]) -> impl Iterator<Item = (usize, usize)> + 'a {
        let (x, y) = (self.x, self.y);
        pieces
            .get(self.piece)
            .and_then(|piece| piece.orientations().get(self.orientation))
            .into_iter()
            .flat_map(|shape| shape.cells().iter())
            .map(move |&(dx, dy)| (x + dx, y + dy))
    }
}

/// A rectangular grid, some of whose cells are unavailable.
///
/// Unavailable cells come in two kinds, which only differ when drawn:
/// _walls_ are outside the playing area, and _marks_ are cells that
/// are deliberately left uncovered (the day shown by a calendar
/// puzzle, say).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    walls: BTreeSet<(usize, usize)>,
    marks: BTreeSet<(usize, usize)>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Result<Board, PuzzleError> {
        if width == 0 || height == 0 {
            return Err(PuzzleError::EmptyBoard { width, height });
        }
        Ok(Board {
            width,
            height,
            walls: BTreeSet::new(),
            marks: BTreeSet::new(),
        })
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<(), PuzzleError> {
        if x >= self.width || y >= self.height {
            return Err(PuzzleError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Takes a cell out of the playing area.
    pub fn wall(&mut self, x: usize, y: usize) -> Result<(), PuzzleError> {
        self.check_bounds(x, y)?;
        self.walls.insert((x, y));
        Ok(())
    }

    /// Reserves a cell that must stay uncovered.
    pub fn mark(&mut self, x: usize, y: usize) -> Result<(), PuzzleError> {
        self.check_bounds(x, y)?;
        self.marks.insert((x, y));
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_free(&self, x: usize, y: usize) -> bool {
        x < self.width
            && y < self.height
            && !self.walls.contains(&(x, y))
            && !self.marks.contains(&(x, y))
    }

    /// The free cells, in reading order.
    pub fn free_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_free(x, y))
    }

    /// Every way of laying one of `pieces` entirely on free cells,
    /// in ascending order.
    pub fn placements(&self, pieces: &[Piece]) -> Vec<Placement> {
        let mut placements = Vec::new();
        for (piece_index, piece) in pieces.iter().enumerate() {
            for (orientation, shape) in piece.orientations().iter().enumerate() {
                if shape.width() > self.width || shape.height() > self.height {
                    continue;
                }
                for x in 0..=self.width - shape.width() {
                    for y in 0..=self.height - shape.height() {
                        if shape
                            .cells()
                            .iter()
                            .all(|&(dx, dy)| self.is_free(x + dx, y + dy))
                        {
                            placements.push(Placement {
                                piece: piece_index,
                                orientation,
                                x,
                                y,
                            });
                        }
                    }
                }
            }
        }
        debug!(
            "{} placements of {} pieces on a {}x{} board",
            placements.len(),
            pieces.len(),
            self.width,
            self.height
        );
        placements
    }

    /// Builds the exact cover problem for tiling this board's free
    /// cells with every one of `pieces`, each used exactly once.
    pub fn problem(
        &self,
        pieces: &[Piece],
    ) -> Result<Problem<Column, Placement>, TableError<Column, Placement>> {
        let mut problem = Problem::new();
        for (x, y) in self.free_cells() {
            problem.add_column(Column::Cell { y, x })?;
        }
        for piece in 0..pieces.len() {
            problem.add_column(Column::Piece(piece))?;
        }
        for placement in self.placements(pieces) {
            let columns: Vec<Column> = placement
                .cells(pieces)
                .map(|(x, y)| Column::Cell { y, x })
                .chain([Column::Piece(placement.piece)])
                .collect();
            problem.add_row(placement, columns)?;
        }
        Ok(problem)
    }

    /// Draws `placements` onto this board.
    ///
    /// Every cell of every placement has to be free and not already
    /// taken by an earlier placement.
    pub fn tiling(
        &self,
        pieces: &[Piece],
        placements: &[Placement],
    ) -> Result<Tiling, PuzzleError> {
        let mut grid = vec![vec!['.'; self.width]; self.height];
        for &(x, y) in &self.walls {
            grid[y][x] = '#';
        }
        for &(x, y) in &self.marks {
            grid[y][x] = '*';
        }
        for placement in placements {
            let piece = pieces
                .get(placement.piece)
                .filter(|piece| placement.orientation < piece.orientations().len())
                .ok_or(PuzzleError::UnknownPlacement {
                    piece: placement.piece,
                    orientation: placement.orientation,
                })?;
            for (x, y) in placement.cells(pieces) {
                if !self.is_free(x, y) || grid[y][x] != '.' {
                    return Err(PuzzleError::CellNotFree {
                        piece: piece.name(),
                        x,
                        y,
                    });
                }
                grid[y][x] = piece.name();
            }
        }
        Ok(Tiling { grid })
    }
}

/// A set of placements drawn onto a board: one letter per piece, `#`
/// for walls, `*` for marks and `.` for anything left uncovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tiling {
    grid: Vec<Vec<char>>,
}

impl fmt::Display for Tiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.grid.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row.iter().map(char::to_string).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
