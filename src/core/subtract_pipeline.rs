use crate::adapters::csv_io::{self, CsvSource};
use crate::config::toml_config::SubtractConfig;
use crate::core::dedup::{KeyBuilder, ReferenceSet, RowOutcome};
use crate::core::normalizer::DomainNormalizer;
use crate::core::{DedupStats, Pipeline, SuffixResolver};
use crate::domain::model::Record;
use crate::utils::error::Result;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Removes target rows whose credential already appears in the reference export.
pub struct SubtractPipeline<R: SuffixResolver> {
    target: PathBuf,
    reference: PathBuf,
    normalizer: DomainNormalizer<R>,
    config: SubtractConfig,
}

impl<R: SuffixResolver> SubtractPipeline<R> {
    pub fn new(
        target: impl Into<PathBuf>,
        reference: impl Into<PathBuf>,
        normalizer: DomainNormalizer<R>,
        config: SubtractConfig,
    ) -> Self {
        Self {
            target: target.into(),
            reference: reference.into(),
            normalizer,
            config,
        }
    }

    /// Reads the whole reference source into a key set.
    pub fn build_reference(&self) -> Result<ReferenceSet> {
        tracing::debug!("Reading reference source {}", self.reference.display());
        self.build_reference_from(csv_io::open(&self.reference)?)
    }

    fn build_reference_from<I: Read>(&self, reader: csv::Reader<I>) -> Result<ReferenceSet> {
        let source = CsvSource::open(
            reader,
            &self.config.reference,
            "reference",
            self.config.match_on,
        )?;

        let Some(columns) = source.columns else {
            return Ok(ReferenceSet::default());
        };

        let records = source.collect::<Result<Vec<Record>>>()?;
        let keys = KeyBuilder::new(&self.normalizer, columns, self.config.match_on);
        let (reference, skipped) = ReferenceSet::build(&keys, records);

        tracing::info!(
            "Reference set built: {} keys ({} short rows skipped)",
            reference.len(),
            skipped
        );
        Ok(reference)
    }

    fn filter<I: Read, W: Write>(
        &self,
        reference: &ReferenceSet,
        target: csv::Reader<I>,
        output: W,
    ) -> Result<DedupStats> {
        let mut stats = DedupStats {
            reference_keys: Some(reference.len()),
            ..DedupStats::default()
        };

        let source = CsvSource::open(target, &self.config.target, "target", self.config.match_on)?;
        let mut writer = csv_io::writer(output);

        if let Some(header) = &source.header {
            writer.write_record(&header.fields)?;
        }

        let Some(columns) = source.columns else {
            writer.flush()?;
            return Ok(stats);
        };

        let keys = KeyBuilder::new(&self.normalizer, columns, self.config.match_on);

        for record in source {
            let record = record?;
            stats.read += 1;

            match reference.check(&keys, &record) {
                RowOutcome::Emit => {
                    writer.write_record(&record.fields)?;
                    stats.emitted += 1;
                }
                RowOutcome::Duplicate => {
                    tracing::debug!("Row {} already in reference", stats.read);
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

impl<R: SuffixResolver> Pipeline for SubtractPipeline<R> {
    fn name(&self) -> &'static str {
        "subtract"
    }

    fn run<W: Write>(&mut self, output: W) -> Result<DedupStats> {
        let reference = self.build_reference()?;
        let target = csv_io::open(&self.target)?;
        self.filter(&reference, target, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::suffix::CompoundSuffixHeuristic;
    use crate::domain::model::{DedupKey, MatchOn};

    fn pipeline(config: SubtractConfig) -> SubtractPipeline<CompoundSuffixHeuristic> {
        SubtractPipeline::new(
            "unused-target.csv",
            "unused-reference.csv",
            DomainNormalizer::heuristic(CompoundSuffixHeuristic::default()),
            config,
        )
    }

    fn subtract(target: &str, reference: &str, config: SubtractConfig) -> (String, DedupStats) {
        let p = pipeline(config);
        let reference = p
            .build_reference_from(csv_io::reader(reference.as_bytes()))
            .unwrap();
        let mut output = Vec::new();
        let stats = p
            .filter(&reference, csv_io::reader(target.as_bytes()), &mut output)
            .unwrap();
        (String::from_utf8(output).unwrap(), stats)
    }

    const REFERENCE: &str = "Title,URL (memo),Username,Password,Notes,OTPAuth\n\
                             X,x.com (work),u,p,,\n";

    #[test]
    fn test_reference_keys_use_normalized_domain() {
        let p = pipeline(SubtractConfig::default());
        let reference = p
            .build_reference_from(csv_io::reader(REFERENCE.as_bytes()))
            .unwrap();
        assert_eq!(reference.len(), 1);
        assert!(reference.contains(&DedupKey::triple("x.com", "u", "p")));
    }

    #[test]
    fn test_exact_match_is_excluded_and_other_password_kept() {
        let target = "X,https://www.x.com/login,u,p,\nX2,https://x.com,u,other,\n";
        let (output, stats) = subtract(target, REFERENCE, SubtractConfig::default());

        assert_eq!(output, "X2,https://x.com,u,other,\n");
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.emitted, 1);
        assert_eq!(stats.reference_keys, Some(1));
    }

    #[test]
    fn test_target_header_is_preserved() {
        let target = "name,url,username,password,note\nX,https://x.com,u,p,\nY,y.com,u,p,\n";
        let (output, _) = subtract(target, REFERENCE, SubtractConfig::default());
        assert_eq!(output, "name,url,username,password,note\nY,y.com,u,p,\n");
    }

    #[test]
    fn test_short_target_rows_are_skipped() {
        let target = "A,a.com\nB,b.com,u,p,\n";
        let (output, stats) = subtract(target, REFERENCE, SubtractConfig::default());

        assert_eq!(output, "B,b.com,u,p,\n");
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.read, 2);
    }

    #[test]
    fn test_short_reference_rows_are_skipped() {
        let reference = "Title,URL (memo),Username,Password\nbroken,x.com\n";
        let target = "X,x.com,u,p,\n";
        let (output, stats) = subtract(target, reference, SubtractConfig::default());

        assert_eq!(output, target);
        assert_eq!(stats.reference_keys, Some(0));
    }

    #[test]
    fn test_empty_reference_returns_target_unchanged() {
        let target = "A,a.com,u,p,n\nB,b.com,v,q,\n";
        for reference in ["", "Title,URL (memo),Username,Password\n"] {
            let (output, stats) = subtract(target, reference, SubtractConfig::default());
            assert_eq!(output, target);
            assert_eq!(stats.emitted, 2);
        }
    }

    #[test]
    fn test_pair_matching_ignores_password() {
        let config = SubtractConfig {
            match_on: MatchOn::DomainUser,
            ..SubtractConfig::default()
        };
        let target = "X,https://x.com,u,other,\nY,https://x.com,v,p,\n";
        let (output, _) = subtract(target, REFERENCE, config);
        assert_eq!(output, "Y,https://x.com,v,p,\n");
    }

    #[test]
    fn test_reference_without_password_column_fails() {
        let p = pipeline(SubtractConfig::default());
        let err = p
            .build_reference_from(csv_io::reader("Title,URL,Username\nX,x.com,u\n".as_bytes()))
            .unwrap_err();
        assert!(err.is_config_error());
    }
}
