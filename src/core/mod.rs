pub mod dedup;
pub mod engine;
pub mod normalizer;
pub mod pipeline;
pub mod subtract_pipeline;
pub mod suffix;

pub use crate::domain::model::{DedupKey, DedupStats, MatchOn, Record};
pub use crate::domain::ports::{Pipeline, SuffixResolver};
pub use crate::utils::error::Result;
