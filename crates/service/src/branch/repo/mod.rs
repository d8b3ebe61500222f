//! Concrete `BranchRepository` backends.

pub mod json_file;
pub mod seaorm;
