//! imgdupe - duplicate and near-duplicate image finder.
//!
//! Scans a directory tree for images, fingerprints each file with a
//! 64-bit DCT perceptual hash plus an MD5 content digest, groups
//! visually connected files into clusters, classifies members as
//! byte-identical or merely similar, and moves or deletes the
//! operator-selected spares with collision-safe naming.

pub mod actions;
pub mod app;
pub mod cli;
pub mod clusters;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

pub use app::run_app;
