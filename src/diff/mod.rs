pub mod canonical;
pub mod engine;

pub use engine::{diff, ModifiedPair, ResourceDiff};
