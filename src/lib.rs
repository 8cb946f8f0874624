#![doc = include_str!("../README.md")]
//!
//!
//! To solve an exact cover problem with this implementation,
//! instantiate a [`Problem`] using [`Problem::new()`], declare its
//! columns and rows, and call [`solve()`] to produce one or more
//! solutions.
//!
//! An example, based on Wikipedia's [Algorithm
//! X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X) article:
//!
//! ```
//! // This is the example problem from
//! // <https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X>; it
//! // makes for a nice test case, since the article explains
//! // every step of the execution.
//!
//! let mut problem = algox::Problem::new();
//! for column in 1..=7 {
//!     problem.add_column(column)?;
//! }
//!
//! problem.add_row('A', [1, 4, 7])?;
//! problem.add_row('B', [1, 4])?;
//! problem.add_row('C', [4, 5, 7])?;
//! problem.add_row('D', [3, 5, 6])?;
//! problem.add_row('E', [2, 3, 6, 7])?;
//! problem.add_row('F', [2, 7])?;
//!
//! // And then, actually solve the problem.
//! let mut solution_count = 0;
//! for mut soln in algox::solve(&mut problem) {
//!     solution_count += 1;
//!     soln.sort();
//!     assert_eq!(
//!         vec!['B', 'D', 'F'],
//!         soln,
//!         "solution: expected(left) != actual(right)"
//!     )
//! };
//!
//! assert_eq!(1, solution_count);
//! # Ok::<(), algox::TableError<i32, char>>(())
//! ```
//!
//! Solutions are produced lazily, so stopping early is just a matter of
//! not asking for more; dropping the iterator puts the problem's tables
//! back the way they were.  The [`puzzle`] module builds problems for
//! polyomino tilings, including the calendar puzzle.

pub mod error;
pub mod puzzle;
pub mod solver;
pub mod table;

pub use error::{PuzzleError, TableError};
pub use solver::{Solutions, Stats, solve};
pub use table::{Constraints, Options, Problem};
