use std::collections::BTreeSet;

use crate::error::PuzzleError;

/// A polyomino: a set of unit cells, stored normalized (translated so
/// that the smallest x and the smallest y are both zero) and sorted.
///
/// Two shapes compare equal exactly when they cover the same cells, so
/// deduplicating orientations is just a matter of collecting them into
/// a set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Shape {
    cells: Vec<(usize, usize)>,
}

impl Shape {
    /// Builds a shape from arbitrary cell coordinates.  Repeated cells
    /// are merged.
    pub fn new<I>(cells: I) -> Result<Shape, PuzzleError>
    where
        I: IntoIterator<Item = (isize, isize)>,
    {
        let cells: Vec<(isize, isize)> = cells.into_iter().collect();
        if cells.is_empty() {
            return Err(PuzzleError::EmptyShape);
        }
        Ok(Shape::normalized(cells))
    }

    // Callers guarantee `cells` is non-empty.
    fn normalized(cells: Vec<(isize, isize)>) -> Shape {
        let min_x = cells.iter().map(|&(x, _)| x).min().unwrap_or(0);
        let min_y = cells.iter().map(|&(_, y)| y).min().unwrap_or(0);
        let cells: BTreeSet<(usize, usize)> = cells
            .into_iter()
            .map(|(x, y)| ((x - min_x) as usize, (y - min_y) as usize))
            .collect();
        Shape {
            cells: cells.into_iter().collect(),
        }
    }

    fn transformed<F>(&self, f: F) -> Shape
    where
        F: Fn(isize, isize) -> (isize, isize),
    {
        Shape::normalized(
            self.cells
                .iter()
                .map(|&(x, y)| f(x as isize, y as isize))
                .collect(),
        )
    }

    /// The cells, sorted by x and then y.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn width(&self) -> usize {
        self.cells.iter().map(|&(x, _)| x + 1).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.cells.iter().map(|&(_, y)| y + 1).max().unwrap_or(0)
    }

    /// Quarter turn, `(x, y)` to `(y, -x)`: clockwise with y pointing
    /// up, so counterclockwise as drawn with y growing downwards.
    pub fn rotate(&self) -> Shape {
        self.transformed(|x, y| (y, -x))
    }

    /// Mirror image across the vertical axis.
    pub fn reflect(&self) -> Shape {
        self.transformed(|x, y| (-x, y))
    }

    /// Every distinct shape reachable by rotating and reflecting this
    /// one, in ascending order.  Between one and eight shapes.
    pub fn orientations(&self) -> Vec<Shape> {
        let mut found = BTreeSet::new();
        let mut current = self.clone();
        for _ in 0..4 {
            found.insert(current.reflect());
            let next = current.rotate();
            found.insert(current);
            current = next;
        }
        found.into_iter().collect()
    }
}

/// A named piece, together with all the orientations it can be laid
/// down in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    name: char,
    shape: Shape,
    orientations: Vec<Shape>,
}

impl Piece {
    pub fn new(name: char, shape: Shape) -> Piece {
        let orientations = shape.orientations();
        Piece {
            name,
            shape,
            orientations,
        }
    }

    // For the built-in piece sets, whose cell lists are never empty.
    pub(crate) fn from_cells(name: char, cells: &[(isize, isize)]) -> Piece {
        Piece::new(name, Shape::normalized(cells.to_vec()))
    }

    pub fn name(&self) -> char {
        self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn orientations(&self) -> &[Shape] {
        &self.orientations
    }
}
