//! Filesystem actions over selected records.

pub mod relocate;

pub use relocate::{delete_selected, move_selected, BatchOutcome, FileOpError};
