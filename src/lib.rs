pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CommonArgs, SubtractArgs, UniqueArgs};

pub use config::toml_config::DedupConfig;
pub use crate::core::{
    engine::DedupEngine, normalizer::DomainNormalizer, pipeline::UniquePipeline,
    subtract_pipeline::SubtractPipeline,
};
pub use utils::error::{DedupError, Result};
