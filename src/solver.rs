use std::collections::BTreeSet;
use std::iter::FusedIterator;

use log::{debug, trace};

use crate::table::{Constraints, Options, Problem};

/// Everything one `select` took out of the constraints table: each
/// covered column with the candidate rows it had at removal time, in
/// removal order.  `deselect` replays it backwards.
#[derive(Debug)]
pub(crate) struct Undo<C, R> {
    removed: Vec<(C, BTreeSet<R>)>,
}

/// Counters describing the work a [`Solutions`] iterator has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Rows selected (search tree nodes below the root).
    pub nodes: usize,
    /// Columns found with no candidate rows left.
    pub dead_ends: usize,
    /// Solutions handed back to the caller.
    pub solutions: usize,
}

// One level of the depth-first search: a snapshot of the chosen
// column's candidates taken on entry, and the undo record of the
// candidate currently selected (if any).
struct Frame<C, R> {
    candidates: Vec<R>,
    next: usize,
    undo: Option<Undo<C, R>>,
}

/// An iterator yielding solutions to an exact cover problem.  This is
/// typically created by [`solve()`].
///
/// The iterator holds the problem's constraints table mutably borrowed
/// and edits it in place while searching.  Once the iterator returns
/// `None`, or is dropped part-way through, the table is back in its
/// original state.
pub struct Solutions<'a, C, R>
where
    C: Ord + Clone,
    R: Ord + Clone,
{
    constraints: &'a mut Constraints<C, R>,
    options: &'a Options<R, C>,
    frames: Vec<Frame<C, R>>,
    solution: Vec<R>,
    started: bool,
    finished: bool,
    stats: Stats,
}

/// Finds the uncovered column with the fewest candidate rows, if any
/// column is uncovered.  Ties go to the lowest column.
fn find_min_candidates_column<C, R>(constraints: &Constraints<C, R>) -> Option<&BTreeSet<R>> {
    let mut best: Option<&BTreeSet<R>> = None;
    for candidates in constraints.values() {
        if best.is_none_or(|b| candidates.len() < b.len()) {
            best = Some(candidates);
            if candidates.is_empty() {
                break;
            }
        }
    }
    best
}

/// Covers every column of `row`, and strikes each row that shares one
/// of those columns from all of its other columns, since such rows now
/// conflict with the partial solution.
///
/// A covered column leaves the table together with its candidate set;
/// the set itself is kept intact in the returned [`Undo`] record, which
/// is all `deselect` needs to put things back.
pub(crate) fn select<C, R>(
    constraints: &mut Constraints<C, R>,
    options: &Options<R, C>,
    row: &R,
) -> Undo<C, R>
where
    C: Ord + Clone,
    R: Ord + Clone,
{
    let columns = &options[row];
    let mut removed = Vec::with_capacity(columns.len());
    for covered in columns {
        let Some(candidates) = constraints.remove(covered) else {
            continue;
        };
        for conflicting in &candidates {
            for other in &options[conflicting] {
                if other == covered {
                    continue;
                }
                if let Some(others) = constraints.get_mut(other) {
                    others.remove(conflicting);
                }
            }
        }
        removed.push((covered.clone(), candidates));
    }
    Undo { removed }
}

/// Exact inverse of [`select`]: must run in the reverse order of the
/// removals, since a later removal was made with the earlier columns
/// already gone.
pub(crate) fn deselect<C, R>(
    constraints: &mut Constraints<C, R>,
    options: &Options<R, C>,
    undo: Undo<C, R>,
) where
    C: Ord + Clone,
    R: Ord + Clone,
{
    for (covered, candidates) in undo.removed.into_iter().rev() {
        for conflicting in &candidates {
            for other in &options[conflicting] {
                if other == &covered {
                    continue;
                }
                if let Some(others) = constraints.get_mut(other) {
                    others.insert(conflicting.clone());
                }
            }
        }
        constraints.insert(covered, candidates);
    }
}

impl<C, R> Solutions<'_, C, R>
where
    C: Ord + Clone,
    R: Ord + Clone,
{
    /// The work done so far.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Opens a frame for the most constrained column.  Returns `true`
    /// when there is no column left, i.e. the partial solution is a
    /// full one.
    fn descend(&mut self) -> bool {
        let Some(candidates) = find_min_candidates_column(&*self.constraints) else {
            return true;
        };
        if candidates.is_empty() {
            // Nothing can cover this column any more, so don't bother
            // opening a frame for it.
            self.stats.dead_ends += 1;
            trace!("dead end at depth {}", self.solution.len());
            return false;
        }
        let frame = Frame {
            candidates: candidates.iter().cloned().collect(),
            next: 0,
            undo: None,
        };
        trace!(
            "branching on {} candidates at depth {}",
            frame.candidates.len(),
            self.solution.len()
        );
        self.frames.push(frame);
        false
    }

    fn found(&mut self) -> Option<Vec<R>> {
        self.stats.solutions += 1;
        debug!(
            "solution #{} with {} rows",
            self.stats.solutions,
            self.solution.len()
        );
        Some(self.solution.clone())
    }
}

impl<C, R> Iterator for Solutions<'_, C, R>
where
    C: Ord + Clone,
    R: Ord + Clone,
{
    // NB: We hand out owned copies of the partial solution, because
    // the frame stack goes on to mutate it on the next call.
    type Item = Vec<R>;

    fn next(&mut self) -> Option<Self::Item> {
        // Between calls, each frame except possibly the top one has its
        // current candidate selected, and the solution vector holds
        // exactly those candidates, outermost first.
        if !self.started {
            self.started = true;
            if self.descend() {
                return self.found();
            }
        }

        loop {
            let Some(frame) = self.frames.last_mut() else {
                if !self.finished {
                    self.finished = true;
                    debug!("search finished: {:?}", self.stats);
                }
                return None;
            };

            if let Some(undo) = frame.undo.take() {
                deselect(self.constraints, self.options, undo);
                self.solution.pop();
                trace!(
                    "deselected candidate {} of {} at depth {}",
                    frame.next,
                    frame.candidates.len(),
                    self.solution.len()
                );
            }

            let Some(row) = frame.candidates.get(frame.next).cloned() else {
                // Every candidate for this column has been explored.
                self.frames.pop();
                continue;
            };
            frame.next += 1;
            trace!(
                "selecting candidate {} of {} at depth {}",
                frame.next,
                frame.candidates.len(),
                self.solution.len()
            );

            frame.undo = Some(select(self.constraints, self.options, &row));
            self.stats.nodes += 1;
            self.solution.push(row);

            if self.descend() {
                return self.found();
            }
        }
    }
}

impl<C, R> FusedIterator for Solutions<'_, C, R>
where
    C: Ord + Clone,
    R: Ord + Clone,
{
}

impl<C, R> Drop for Solutions<'_, C, R>
where
    C: Ord + Clone,
    R: Ord + Clone,
{
    fn drop(&mut self) {
        // Unwind whatever is still selected, innermost frame first.
        while let Some(frame) = self.frames.pop() {
            if let Some(undo) = frame.undo {
                deselect(self.constraints, self.options, undo);
            }
        }
        self.solution.clear();
    }
}

/// Computes solutions to the exact cover problem described by the
/// supplied [`Problem`], lazily.
///
/// Solutions come out in a fixed order: at each step the search covers
/// the column with the fewest candidates (lowest column on ties), and
/// tries its candidates in ascending row order.  Each solution lists its
/// rows in the order they were chosen.
pub fn solve<C, R>(problem: &mut Problem<C, R>) -> Solutions<'_, C, R>
where
    C: Ord + Clone,
    R: Ord + Clone,
{
    debug!(
        "solving {} columns over {} rows",
        problem.constraints.len(),
        problem.options.len()
    );
    Solutions {
        constraints: &mut problem.constraints,
        options: &problem.options,
        frames: Vec::new(),
        solution: Vec::new(),
        started: false,
        finished: false,
        stats: Stats::default(),
    }
}

impl<C, R> Problem<C, R>
where
    C: Ord + Clone,
    R: Ord + Clone,
{
    /// Shorthand for [`solve(self)`](solve).
    pub fn solutions(&mut self) -> Solutions<'_, C, R> {
        solve(self)
    }

    /// Runs the whole search, counting solutions without keeping them.
    pub fn count_solutions(&mut self) -> usize {
        solve(self).count()
    }

    /// The first solution in search order, if there is one.
    pub fn first_solution(&mut self) -> Option<Vec<R>> {
        solve(self).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn problem_from(columns: &[char], rows: &[(u32, &[char])]) -> Problem<char, u32> {
        let mut problem = Problem::new();
        for &column in columns {
            problem.add_column(column).unwrap();
        }
        for &(row, covered) in rows {
            problem.add_row(row, covered.iter().copied()).unwrap();
        }
        problem
    }

    // This is the example problem from
    // <https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X>, given
    // column by column: column i is covered by the rows in COLUMNS[i].
    const COLUMNS: [&[u32]; 8] = [
        &[0, 1],
        &[4, 5],
        &[3, 4],
        &[0, 1, 2],
        &[2, 3],
        &[2, 3],
        &[3, 4],
        &[0, 2, 4, 5],
    ];

    fn wikipedia() -> Problem<usize, u32> {
        let mut problem = Problem::new();
        for column in 0..COLUMNS.len() {
            problem.add_column(column).unwrap();
        }
        for row in 0..6 {
            problem
                .add_row(
                    row,
                    (0..COLUMNS.len()).filter(|&column| COLUMNS[column].contains(&row)),
                )
                .unwrap();
        }
        problem
    }

    #[test]
    fn simple() {
        let mut problem = wikipedia();

        let mut count: usize = 0;
        for mut soln in solve(&mut problem) {
            count += 1;
            soln.sort();
            assert_eq!(
                vec![1u32, 3, 5],
                soln,
                "solution: expected(left) != actual(right)"
            );
        }

        assert_eq!(1, count, "solution count: expected(left) != actual(right)");
    }

    #[test]
    fn disjoint_rows() {
        let mut problem = problem_from(&['A', 'B'], &[(1, &['A']), (2, &['B'])]);
        let solutions: Vec<_> = solve(&mut problem).collect();
        assert_eq!(vec![vec![1, 2]], solutions);
    }

    #[test]
    fn overlapping_choices() {
        let mut problem = problem_from(
            &['A', 'B'],
            &[(1, &['A', 'B']), (2, &['A']), (3, &['B'])],
        );
        let solutions: Vec<_> = solve(&mut problem).collect();
        assert_eq!(vec![vec![1], vec![2, 3]], solutions);
    }

    #[test]
    fn infeasible() {
        let mut problem = problem_from(&['A', 'B'], &[(1, &['A'])]);
        let mut solutions = solve(&mut problem);
        assert_eq!(None, solutions.next());
        assert_eq!(1, solutions.stats().dead_ends);
        assert_eq!(0, solutions.stats().nodes);
    }

    #[test]
    fn no_columns() {
        let mut problem: Problem<char, u32> = Problem::new();
        let solutions: Vec<_> = solve(&mut problem).collect();
        assert_eq!(vec![Vec::<u32>::new()], solutions);

        // Rows that cover nothing are never needed.
        let mut problem = problem_from(&[], &[(1, &[])]);
        assert_eq!(1, problem.count_solutions());
    }

    #[test]
    fn dead_end_is_pruned() {
        // Covering A with row 2 strips row 3 from B, leaving B with no
        // candidates at all.
        let mut problem = problem_from(
            &['A', 'B', 'C'],
            &[
                (1, &['A', 'B']),
                (2, &['A', 'C']),
                (3, &['B', 'C']),
                (4, &['C']),
            ],
        );
        let mut solutions = solve(&mut problem);
        assert_eq!(Some(vec![1, 4]), solutions.next());
        assert_eq!(None, solutions.next());
        assert_eq!(
            Stats {
                nodes: 3,
                dead_ends: 1,
                solutions: 1
            },
            solutions.stats()
        );
    }

    #[test]
    fn select_deselect_symmetry() {
        let problem = wikipedia();
        let mut constraints = problem.constraints.clone();

        for row in problem.options.keys() {
            let undo = select(&mut constraints, &problem.options, row);
            for column in &problem.options[row] {
                assert!(!constraints.contains_key(column));
            }
            for candidates in constraints.values() {
                assert!(!candidates.contains(row));
            }
            deselect(&mut constraints, &problem.options, undo);
            assert_eq!(problem.constraints, constraints);
        }
    }

    #[test]
    fn nested_select_deselect_symmetry() {
        let problem = wikipedia();
        let mut constraints = problem.constraints.clone();

        for first in problem.options.keys() {
            let outer = select(&mut constraints, &problem.options, first);
            let after_outer = constraints.clone();
            let live: BTreeSet<u32> = constraints.values().flatten().copied().collect();
            for second in &live {
                let inner = select(&mut constraints, &problem.options, second);
                deselect(&mut constraints, &problem.options, inner);
                assert_eq!(after_outer, constraints);
            }
            deselect(&mut constraints, &problem.options, outer);
            assert_eq!(problem.constraints, constraints);
        }
    }

    #[test]
    fn tables_restored_after_search() {
        let mut problem = wikipedia();
        let original = problem.clone();
        assert_eq!(1, problem.count_solutions());
        assert_eq!(original, problem);
    }

    #[test]
    fn tables_restored_after_early_drop() {
        // Four columns, each coverable by two rows of its own: 16
        // solutions, of which only the first two are consumed.
        let mut problem: Problem<u8, u8> = Problem::new();
        for column in 0..4 {
            problem.add_column(column).unwrap();
            problem.add_row(2 * column, [column]).unwrap();
            problem.add_row(2 * column + 1, [column]).unwrap();
        }
        let original = problem.clone();

        {
            let mut solutions = solve(&mut problem);
            assert_eq!(Some(vec![0, 2, 4, 6]), solutions.next());
            assert_eq!(Some(vec![0, 2, 4, 7]), solutions.next());
        }
        assert_eq!(original, problem);

        assert_eq!(16, problem.count_solutions());
        assert_eq!(Some(vec![0, 2, 4, 6]), problem.first_solution());
        assert_eq!(original, problem);
    }

    #[test]
    fn exhausted_iterator_stays_exhausted() {
        let mut problem = problem_from(&['A'], &[(1, &['A'])]);
        let mut solutions = problem.solutions();
        assert_eq!(Some(vec![1]), solutions.next());
        assert_eq!(None, solutions.next());
        assert_eq!(None, solutions.next());
    }

    #[test]
    fn matches_brute_force() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let column_count: u32 = rng.gen_range(1..=5);
            let row_count: u32 = rng.gen_range(1..=8);

            let mut rows: Vec<Vec<u32>> = Vec::new();
            for _ in 0..row_count {
                let mut covered: Vec<u32> =
                    (0..column_count).filter(|_| rng.gen_bool(0.4)).collect();
                if covered.is_empty() {
                    covered.push(rng.gen_range(0..column_count));
                }
                rows.push(covered);
            }

            let mut expected: BTreeSet<Vec<u32>> = BTreeSet::new();
            for mask in 0u32..(1 << row_count) {
                let mut hits = vec![0; column_count as usize];
                for (row, covered) in rows.iter().enumerate() {
                    if mask & (1u32 << row) != 0 {
                        for &column in covered {
                            hits[column as usize] += 1;
                        }
                    }
                }
                if hits.iter().all(|&h| h == 1) {
                    expected.insert(
                        (0..row_count)
                            .filter(|&row| mask & (1u32 << row) != 0)
                            .collect(),
                    );
                }
            }

            let mut problem: Problem<u32, u32> = Problem::new();
            for column in 0..column_count {
                problem.add_column(column).unwrap();
            }
            for (row, covered) in rows.iter().enumerate() {
                problem.add_row(row as u32, covered.iter().copied()).unwrap();
            }
            let original = problem.clone();

            let mut found: Vec<Vec<u32>> = solve(&mut problem)
                .map(|mut soln| {
                    soln.sort();
                    soln
                })
                .collect();
            let count = found.len();
            found.sort();
            found.dedup();

            assert_eq!(count, found.len(), "seed {seed}: duplicate solutions");
            assert_eq!(
                expected,
                found.into_iter().collect::<BTreeSet<_>>(),
                "seed {seed}: expected(left) != actual(right)"
            );
            assert_eq!(original, problem, "seed {seed}: tables not restored");
        }
    }

    #[test]
    fn sudoku() {
        // For Sudoku, we have a 9x9 grid of numbers 1-9, with four
        // types of rules:
        // * All the squares in a given row must have different numbers.
        // * All the squares in a given column must have different numbers.
        // * All the squares in a given 3x3 subgrid must have different numbers.
        // * Any given square can only have one number.
        //
        // Each 1..=9 possibility for each square is a row; the clues
        // get a column each that only their own row covers, which
        // forces them into every solution.

        #[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug)]
        struct GridVal {
            row: usize, // 1..9
            col: usize, // 1..9
            val: usize, // 1..9
        }

        #[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug)]
        enum Rule {
            Square(usize, usize),
            RowVal(usize, usize),
            ColVal(usize, usize),
            BoxVal(usize, usize),
            Clue(GridVal),
        }

        // This set was the NYT Hard sudoku puzzle on 2025-04-04,
        // numbering rows from the bottom up and columns from left to
        // right.
        let clues: BTreeSet<GridVal> = [
            (1, 6, 7),
            (1, 8, 8),
            (2, 5, 2),
            (3, 1, 2),
            (3, 2, 4),
            (3, 4, 6),
            (4, 3, 7),
            (4, 4, 2),
            (4, 6, 1),
            (4, 7, 6),
            (5, 2, 1),
            (5, 5, 6),
            (5, 6, 3),
            (5, 8, 7),
            (6, 2, 5),
            (6, 7, 9),
            (7, 3, 9),
            (7, 6, 5),
            (8, 4, 4),
            (8, 5, 7),
            (8, 9, 9),
            (9, 1, 8),
            (9, 8, 4),
        ]
        .into_iter()
        .map(|(row, col, val)| GridVal { row, col, val })
        .collect();

        let mut problem = Problem::new();
        for a in 1..=9 {
            for b in 1..=9 {
                problem.add_column(Rule::Square(a, b)).unwrap();
                problem.add_column(Rule::RowVal(a, b)).unwrap();
                problem.add_column(Rule::ColVal(a, b)).unwrap();
                problem.add_column(Rule::BoxVal(a, b)).unwrap();
            }
        }
        for clue in &clues {
            problem.add_column(Rule::Clue(*clue)).unwrap();
        }

        for row in 1..=9 {
            for col in 1..=9 {
                for val in 1..=9 {
                    let id = GridVal { row, col, val };
                    let subgrid = (row - 1) / 3 * 3 + (col - 1) / 3 + 1;
                    let mut rules = vec![
                        Rule::Square(row, col),
                        Rule::RowVal(row, val),
                        Rule::ColVal(col, val),
                        Rule::BoxVal(subgrid, val),
                    ];
                    if clues.contains(&id) {
                        rules.push(Rule::Clue(id));
                    }
                    problem.add_row(id, rules).unwrap();
                }
            }
        }

        let solutions: Vec<_> = solve(&mut problem).collect();
        assert_eq!(
            1,
            solutions.len(),
            "solution count: expected(left) != actual(right)"
        );

        let soln = &solutions[0];
        assert_eq!(81, soln.len());
        for clue in &clues {
            assert!(soln.contains(clue), "clue {clue:?} missing");
        }
    }
}
