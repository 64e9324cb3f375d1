use crate::core::{DedupStats, Pipeline};
use crate::utils::error::Result;
use std::io::Write;
use std::time::Instant;

pub struct DedupEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> DedupEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run<W: Write>(&mut self, output: W) -> Result<DedupStats> {
        let started = Instant::now();
        tracing::info!("Starting {} pass", self.pipeline.name());

        let stats = self.pipeline.run(output)?;

        tracing::info!(
            "✅ {} pass finished in {:?}: read {}, kept {}, dropped {} duplicates, \
             skipped {} malformed",
            self.pipeline.name(),
            started.elapsed(),
            stats.read,
            stats.emitted,
            stats.duplicates,
            stats.malformed
        );

        Ok(stats)
    }
}
