use crate::domain::model::DedupStats;
use crate::utils::error::Result;
use std::io::Write;

/// Reduces a bare host name to its registrable domain.
///
/// Returns `None` when the strategy has no answer for `host`; callers then fall
/// back to a coarser strategy.
pub trait SuffixResolver {
    fn registrable_domain(&self, host: &str) -> Option<String>;
}

impl<R: SuffixResolver + ?Sized> SuffixResolver for Box<R> {
    fn registrable_domain(&self, host: &str) -> Option<String> {
        (**self).registrable_domain(host)
    }
}

/// A complete dedup pass writing CSV to `output`.
pub trait Pipeline {
    fn name(&self) -> &'static str;
    fn run<W: Write>(&mut self, output: W) -> Result<DedupStats>;
}
