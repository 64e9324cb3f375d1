use crate::core::suffix::{CompoundSuffixHeuristic, PublicSuffixList, SuffixStrategy};
use crate::domain::ports::SuffixResolver;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

// 備註（"example.com (memo)"）或空白之後的內容一律捨棄
static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s(]").unwrap());
static LEADING_WWW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^www\.").unwrap());

const PARSE_SCHEME: &str = "https://";

/// Turns URL-like strings from password exports into registrable domains.
///
/// `resolver` is consulted first; when it has no answer the compound-suffix
/// heuristic decides.
#[derive(Debug, Clone)]
pub struct DomainNormalizer<R: SuffixResolver> {
    resolver: R,
    fallback: CompoundSuffixHeuristic,
}

impl<R: SuffixResolver> DomainNormalizer<R> {
    pub fn new(resolver: R, fallback: CompoundSuffixHeuristic) -> Self {
        Self { resolver, fallback }
    }

    /// Never fails: on unparseable input the best partial string is returned,
    /// possibly empty.
    pub fn normalize(&self, raw: &str) -> String {
        let host = extract_host(raw);
        let host = LEADING_WWW.replace(&host, "");

        let registrable = self
            .resolver
            .registrable_domain(&host)
            .unwrap_or_else(|| self.fallback.reduce(&host));

        registrable.to_lowercase()
    }
}

impl DomainNormalizer<CompoundSuffixHeuristic> {
    pub fn heuristic(fallback: CompoundSuffixHeuristic) -> Self {
        Self::new(fallback.clone(), fallback)
    }
}

impl DomainNormalizer<Box<dyn SuffixResolver>> {
    pub fn for_strategy(strategy: SuffixStrategy, fallback: CompoundSuffixHeuristic) -> Self {
        let resolver: Box<dyn SuffixResolver> = match strategy {
            SuffixStrategy::Public => Box::new(PublicSuffixList::new()),
            SuffixStrategy::Heuristic => Box::new(fallback.clone()),
        };
        tracing::debug!("Domain normalizer using {:?} suffix strategy", strategy);
        Self::new(resolver, fallback)
    }
}

/// Host part of `raw` after annotation stripping, or the stripped string itself
/// when no URL host can be parsed out of it.
fn extract_host(raw: &str) -> String {
    let trimmed = raw.trim();
    let cleaned = ANNOTATION.split(trimmed).next().unwrap_or_default();

    let candidate = if cleaned.contains("://") {
        cleaned.to_string()
    } else {
        format!("{}{}", PARSE_SCHEME, cleaned)
    };

    match Url::parse(&candidate) {
        Ok(url) => match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => cleaned.to_string(),
        },
        Err(_) => cleaned.to_string(),
    }
}
