//! Operations across trees

mod diff;

pub use diff::{diff_trees, Diff, DiffEntry};
