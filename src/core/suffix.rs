//! Suffix-resolution strategies used by the domain normalizer.
//!
//! [`PublicSuffixList`] consults the bundled public suffix list through
//! `tldextract`. [`CompoundSuffixHeuristic`] needs no data: it keeps the last two
//! labels, or three when the last two are a known compound suffix. The heuristic
//! is imprecise for any compound suffix missing from its set (`com.br`,
//! `github.io`, ...), which is why it is only the fallback.

use crate::domain::ports::SuffixResolver;
use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;
use tldextract::{TldExtractor, TldOption};

pub const DEFAULT_COMPOUND_SUFFIXES: [&str; 4] = ["co.uk", "co.jp", "com.au", "co.nz"];

/// Which strategy the normalizer consults first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SuffixStrategy {
    #[default]
    Public,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSuffixHeuristic {
    compound: BTreeSet<String>,
}

impl CompoundSuffixHeuristic {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            compound: suffixes
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn is_compound(&self, suffix: &str) -> bool {
        self.compound.contains(suffix)
    }

    /// Always produces an answer: hosts with fewer than two labels come back as-is.
    pub fn reduce(&self, host: &str) -> String {
        let labels: Vec<&str> = host.split('.').collect();
        if labels.len() < 2 {
            return host.to_string();
        }

        let last_two = labels[labels.len() - 2..].join(".");
        if labels.len() >= 3 && self.is_compound(&last_two.to_ascii_lowercase()) {
            labels[labels.len() - 3..].join(".")
        } else {
            last_two
        }
    }
}

impl Default for CompoundSuffixHeuristic {
    fn default() -> Self {
        Self::new(DEFAULT_COMPOUND_SUFFIXES)
    }
}

impl SuffixResolver for CompoundSuffixHeuristic {
    fn registrable_domain(&self, host: &str) -> Option<String> {
        Some(self.reduce(host))
    }
}

/// Public-suffix-list aware reduction backed by `tldextract`'s bundled snapshot.
pub struct PublicSuffixList {
    extractor: TldExtractor,
}

impl PublicSuffixList {
    pub fn new() -> Self {
        // private_domains 關閉：github.io 之類視為一般網域
        Self {
            extractor: TldExtractor::new(TldOption::default()),
        }
    }
}

impl Default for PublicSuffixList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PublicSuffixList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicSuffixList").finish_non_exhaustive()
    }
}

impl SuffixResolver for PublicSuffixList {
    fn registrable_domain(&self, host: &str) -> Option<String> {
        if host.is_empty() {
            return None;
        }
        if host.trim_matches(|c: char| c == '[' || c == ']').parse::<IpAddr>().is_ok() {
            return Some(host.to_string());
        }

        let result = match self.extractor.extract(&format!("https://{}", host)) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!("Public suffix lookup failed for '{}': {:?}", host, e);
                return None;
            }
        };

        // 不在清單上的 TLD（.local、.lan）沒有 suffix，交給 heuristic 處理
        let suffix = result.suffix.filter(|suffix| !suffix.is_empty())?;
        let registrable = match result.domain.filter(|domain| !domain.is_empty()) {
            Some(domain) => format!("{}.{}", domain, suffix),
            None => suffix,
        };

        Some(registrable)
    }
}
