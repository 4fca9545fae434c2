// Word-level comparison between the original and optimized resume.
// Pure and synchronous: safe to call from any handler without spawn_blocking.

pub mod engine;
pub mod handlers;
pub mod stats;

pub use stats::{compare, ComparisonReport};
