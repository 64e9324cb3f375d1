use crate::config::schema::ResolvedColumns;
use crate::core::normalizer::DomainNormalizer;
use crate::domain::model::{Credential, DedupKey, MatchOn, Record};
use crate::domain::ports::SuffixResolver;
use std::collections::HashSet;

/// Result of examining one row during a dedup pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Emit,
    Duplicate,
    /// Too few fields to extract the key; dropped without error.
    Malformed,
}

/// Builds [`DedupKey`]s for one source: column layout, normalizer and match mode.
pub struct KeyBuilder<'n, R: SuffixResolver> {
    normalizer: &'n DomainNormalizer<R>,
    columns: ResolvedColumns,
    match_on: MatchOn,
}

impl<'n, R: SuffixResolver> KeyBuilder<'n, R> {
    pub fn new(
        normalizer: &'n DomainNormalizer<R>,
        columns: ResolvedColumns,
        match_on: MatchOn,
    ) -> Self {
        Self {
            normalizer,
            columns,
            match_on,
        }
    }

    pub fn credential<'r>(&self, record: &'r Record) -> Option<Credential<'r>> {
        Some(Credential {
            url: record.get(self.columns.url)?,
            username: record.get(self.columns.username)?,
            password: match self.match_on {
                MatchOn::DomainUser => self
                    .columns
                    .password
                    .and_then(|index| record.get(index))
                    .unwrap_or_default(),
                MatchOn::DomainUserPassword => record.get(self.columns.password?)?,
            },
        })
    }

    /// `None` when the record is too short to supply every field the key needs.
    pub fn key(&self, record: &Record) -> Option<DedupKey> {
        let credential = self.credential(record)?;
        let domain = self.normalizer.normalize(credential.url);

        Some(match self.match_on {
            MatchOn::DomainUser => DedupKey::pair(domain, credential.username),
            MatchOn::DomainUserPassword => {
                DedupKey::triple(domain, credential.username, credential.password)
            }
        })
    }
}

/// Keys already emitted during a keep-first pass.
#[derive(Debug, Default)]
pub struct SeenKeys {
    keys: HashSet<DedupKey>,
}

impl SeenKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time `key` is offered, false for every repeat.
    pub fn admit(&mut self, key: DedupKey) -> bool {
        self.keys.insert(key)
    }

    pub fn check<R: SuffixResolver>(
        &mut self,
        keys: &KeyBuilder<'_, R>,
        record: &Record,
    ) -> RowOutcome {
        match keys.key(record).map(|key| self.admit(key)) {
            None => RowOutcome::Malformed,
            Some(true) => RowOutcome::Emit,
            Some(false) => RowOutcome::Duplicate,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Keys of the reference source; frozen once built.
#[derive(Debug, Default)]
pub struct ReferenceSet {
    keys: HashSet<DedupKey>,
}

impl ReferenceSet {
    /// Short records are skipped, the rest contribute one key each.
    pub fn build<R, I>(keys: &KeyBuilder<'_, R>, records: I) -> (Self, usize)
    where
        R: SuffixResolver,
        I: IntoIterator<Item = Record>,
    {
        let mut set = HashSet::new();
        let mut skipped = 0;

        for record in records {
            match keys.key(&record) {
                Some(key) => {
                    set.insert(key);
                }
                None => {
                    skipped += 1;
                    tracing::debug!("Skipping short reference row ({} fields)", record.len());
                }
            }
        }

        (Self { keys: set }, skipped)
    }

    pub fn from_keys<I: IntoIterator<Item = DedupKey>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn contains(&self, key: &DedupKey) -> bool {
        self.keys.contains(key)
    }

    pub fn check<R: SuffixResolver>(
        &self,
        keys: &KeyBuilder<'_, R>,
        record: &Record,
    ) -> RowOutcome {
        match keys.key(record) {
            None => RowOutcome::Malformed,
            Some(key) if self.contains(&key) => RowOutcome::Duplicate,
            Some(_) => RowOutcome::Emit,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
