use crate::adapters::csv_io::{self, CsvSource};
use crate::config::toml_config::UniqueConfig;
use crate::core::dedup::{KeyBuilder, RowOutcome, SeenKeys};
use crate::core::normalizer::DomainNormalizer;
use crate::core::{DedupStats, Pipeline, SuffixResolver};
use crate::domain::model::RECORD_WIDTH;
use crate::utils::error::Result;
use std::io::{Read, Write};

/// Keep-first dedup of a single CSV stream.
pub struct UniquePipeline<I: Read, R: SuffixResolver> {
    input: I,
    normalizer: DomainNormalizer<R>,
    config: UniqueConfig,
}

impl<I: Read, R: SuffixResolver> UniquePipeline<I, R> {
    pub fn new(input: I, normalizer: DomainNormalizer<R>, config: UniqueConfig) -> Self {
        Self {
            input,
            normalizer,
            config,
        }
    }
}

impl<I: Read, R: SuffixResolver> Pipeline for UniquePipeline<I, R> {
    fn name(&self) -> &'static str {
        "unique"
    }

    fn run<W: Write>(&mut self, output: W) -> Result<DedupStats> {
        let mut stats = DedupStats::default();
        let mut writer = csv_io::writer(output);

        let source = CsvSource::open(
            csv_io::reader(&mut self.input),
            &self.config.schema,
            "input",
            self.config.match_on,
        )?;

        // 有標題列時補齊到標題寬度，否則補到匯出格式的 5 欄
        let width = match &source.header {
            Some(header) => {
                writer.write_record(&header.fields)?;
                header.len()
            }
            None => RECORD_WIDTH,
        };

        let Some(columns) = source.columns else {
            writer.flush()?;
            return Ok(stats);
        };

        let keys = KeyBuilder::new(&self.normalizer, columns, self.config.match_on);
        let mut seen = SeenKeys::new();

        for record in source {
            let record = record?.padded(width);
            stats.read += 1;

            match seen.check(&keys, &record) {
                RowOutcome::Emit => {
                    writer.write_record(&record.fields)?;
                    stats.emitted += 1;
                }
                RowOutcome::Duplicate => {
                    tracing::debug!("Dropping duplicate row {}", stats.read);
                    stats.duplicates += 1;
                }
                RowOutcome::Malformed => {
                    tracing::debug!(
                        "Skipping malformed row {} ({} fields)",
                        stats.read,
                        record.len()
                    );
                    stats.malformed += 1;
                }
            }
        }

        writer.flush()?;
        Ok(stats)
    }
}
