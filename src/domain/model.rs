use serde::{Deserialize, Serialize};

/// Number of fields in a password export row: name, url, username, password, note.
pub const RECORD_WIDTH: usize = 5;

/// One row of a password export, kept in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub fields: Vec<String>,
}

impl Record {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn from_csv(row: &csv::StringRecord) -> Self {
        Self {
            fields: row.iter().map(str::to_string).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Right-pads with empty fields up to `width`; longer rows are untouched.
    pub fn padded(mut self, width: usize) -> Self {
        if self.fields.len() < width {
            self.fields.resize(width, String::new());
        }
        self
    }
}

/// Which fields participate in a [`DedupKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MatchOn {
    DomainUser,
    DomainUserPassword,
}

/// Identity of a credential after domain normalization.
///
/// `password` is `None` when matching on `(domain, username)` only. Username and
/// password are kept verbatim: no trimming, no case folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub domain: String,
    pub username: String,
    pub password: Option<String>,
}

impl DedupKey {
    pub fn pair(domain: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            username: username.into(),
            password: None,
        }
    }

    pub fn triple(
        domain: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            username: username.into(),
            password: Some(password.into()),
        }
    }
}

/// Raw credential fields pulled out of a record, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credential<'a> {
    pub url: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStats {
    pub read: usize,
    pub emitted: usize,
    pub duplicates: usize,
    pub malformed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_keys: Option<usize>,
}
