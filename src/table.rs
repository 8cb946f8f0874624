use std::collections::{BTreeMap, BTreeSet};

use crate::error::TableError;

/// The mutable Column → candidate Rows table.  A column present here is
/// still uncovered; the solver removes columns as rows covering them
/// are selected, and puts them back on backtrack.
pub type Constraints<C, R> = BTreeMap<C, BTreeSet<R>>;

/// The read-only Row → Columns table, listing each row's columns in
/// the order the row declared them.
pub type Options<R, C> = BTreeMap<R, Vec<C>>;

/// Representation of an exact cover problem to be solved by
/// [`solve()`](crate::solve).
///
/// A problem consists of a set of _columns_ (requirements) and a set of
/// _rows_ (options); each row covers some number of columns.  A
/// solution is a subset of the rows such that every column is covered
/// by exactly one of them.
///
/// Both identifier types need a total order: the solver breaks ties
/// between equally constrained columns towards the lowest column, and
/// tries the candidate rows of a column in ascending order, which makes
/// the order of the solutions reproducible.
///
/// For example, tiling a board with polyominoes:
///
///   Each cell of the board is a column (it must be covered exactly
///   once), and so is each piece (it must be used exactly once).  Each
///   way of putting one piece somewhere on the board is a row, covering
///   the cells it occupies plus the column of the piece itself.  See
///   [`Board::problem`](crate::puzzle::Board::problem).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem<C, R> {
    pub(crate) constraints: Constraints<C, R>,
    pub(crate) options: Options<R, C>,
}

impl<C, R> Default for Problem<C, R>
where
    C: Ord + Clone,
    R: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, R> Problem<C, R>
where
    C: Ord + Clone,
    R: Ord + Clone,
{
    /// Initializes a new, empty, [`Problem`] instance.  With no columns
    /// it has exactly one solution: selecting nothing.
    pub fn new() -> Problem<C, R> {
        Problem {
            constraints: BTreeMap::new(),
            options: BTreeMap::new(),
        }
    }

    /// Declares a column that every solution must cover exactly once.
    ///
    /// A column no row ever covers is legal; it just makes the problem
    /// infeasible.
    pub fn add_column(&mut self, column: C) -> Result<(), TableError<C, R>> {
        if self.constraints.contains_key(&column) {
            return Err(TableError::DuplicateColumn(column));
        }
        self.constraints.insert(column, BTreeSet::new());
        Ok(())
    }

    /// Adds a row covering the given columns, all of which must have
    /// been declared already.
    ///
    /// On error the problem is left unchanged.
    pub fn add_row<I>(&mut self, row: R, columns: I) -> Result<(), TableError<C, R>>
    where
        I: IntoIterator<Item = C>,
    {
        if self.options.contains_key(&row) {
            return Err(TableError::DuplicateRow(row));
        }

        let mut covered: Vec<C> = Vec::new();
        for column in columns {
            if !self.constraints.contains_key(&column) {
                return Err(TableError::UnknownColumn { row, column });
            }
            if covered.contains(&column) {
                return Err(TableError::RepeatedColumn { row, column });
            }
            covered.push(column);
        }

        for column in &covered {
            if let Some(candidates) = self.constraints.get_mut(column) {
                candidates.insert(row.clone());
            }
        }
        self.options.insert(row, covered);
        Ok(())
    }

    /// Builds a problem from a pair of pre-built tables, checking that
    /// they describe the same bipartite structure: every row listed
    /// under a column has an options entry naming that column, and every
    /// column a row names is a key of `constraints` listing that row.
    pub fn from_tables(
        constraints: Constraints<C, R>,
        options: Options<R, C>,
    ) -> Result<Problem<C, R>, TableError<C, R>> {
        for (column, candidates) in &constraints {
            for row in candidates {
                match options.get(row) {
                    None => {
                        return Err(TableError::UnknownRow {
                            column: column.clone(),
                            row: row.clone(),
                        });
                    }
                    Some(columns) if !columns.contains(column) => {
                        return Err(TableError::Asymmetric {
                            column: column.clone(),
                            row: row.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        for (row, columns) in &options {
            for (i, column) in columns.iter().enumerate() {
                if columns[..i].contains(column) {
                    return Err(TableError::RepeatedColumn {
                        row: row.clone(),
                        column: column.clone(),
                    });
                }
                match constraints.get(column) {
                    None => {
                        return Err(TableError::UnknownColumn {
                            row: row.clone(),
                            column: column.clone(),
                        });
                    }
                    Some(candidates) if !candidates.contains(row) => {
                        return Err(TableError::Asymmetric {
                            column: column.clone(),
                            row: row.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(Problem {
            constraints,
            options,
        })
    }

    /// The Column → Rows table.  Outside of a running solve this always
    /// holds every declared column with all of its rows.
    pub fn constraints(&self) -> &Constraints<C, R> {
        &self.constraints
    }

    /// The Row → Columns table.
    pub fn options(&self) -> &Options<R, C> {
        &self.options
    }

    pub fn column_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn row_count(&self) -> usize {
        self.options.len()
    }

    /// The columns covered by `row`, in declaration order.
    pub fn columns_of(&self, row: &R) -> Option<&[C]> {
        self.options.get(row).map(Vec::as_slice)
    }
}
