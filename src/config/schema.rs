use crate::domain::model::{MatchOn, Record};
use crate::utils::error::{DedupError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_unique_values, Validate};
use serde::{Deserialize, Serialize};

/// Whether the first CSV row of a source is a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    Present,
    Absent,
    /// Header only if every role finds one of its names in the first row.
    Detect,
}

/// Where to find one field: by header name (first match wins), else by position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "ColumnSpecRepr")]
pub struct ColumnSpec {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

// `url = 1`, `url = "URL"`, `url = ["URL (memo)", "URL"]` or `url = { names = [...], index = 1 }`
#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnSpecRepr {
    Index(usize),
    Name(String),
    Names(Vec<String>),
    Full {
        #[serde(default)]
        names: Vec<String>,
        #[serde(default)]
        index: Option<usize>,
    },
}

impl From<ColumnSpecRepr> for ColumnSpec {
    fn from(repr: ColumnSpecRepr) -> Self {
        match repr {
            ColumnSpecRepr::Index(index) => ColumnSpec::at(index),
            ColumnSpecRepr::Name(name) => ColumnSpec::named([name]),
            ColumnSpecRepr::Names(names) => ColumnSpec::named(names),
            ColumnSpecRepr::Full { names, index } => ColumnSpec { names, index },
        }
    }
}

impl ColumnSpec {
    pub fn at(index: usize) -> Self {
        Self {
            names: Vec::new(),
            index: Some(index),
        }
    }

    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            index: None,
        }
    }

    pub fn or_at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    fn find_in(&self, header: &Record) -> Option<usize> {
        self.names
            .iter()
            .find_map(|name| header.fields.iter().position(|field| field == name))
    }

    pub fn locate(&self, header: Option<&Record>) -> Option<usize> {
        header.and_then(|h| self.find_in(h)).or(self.index)
    }
}

/// Column positions of the key fields in one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub url: usize,
    pub username: usize,
    /// `None` only when the password is not part of the key.
    pub password: Option<usize>,
}

/// How to pull url, username and password out of one source's rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSchema {
    pub headers: HeaderMode,
    pub url: ColumnSpec,
    pub username: ColumnSpec,
    pub password: ColumnSpec,
}

impl SourceSchema {
    /// Positional `name,url,username,password,note` rows with no header.
    pub fn positional() -> Self {
        Self {
            headers: HeaderMode::Absent,
            url: ColumnSpec::at(1),
            username: ColumnSpec::at(2),
            password: ColumnSpec::at(3),
        }
    }

    /// Export with a `Title,URL (memo),Username,Password,...` style header.
    pub fn reference_default() -> Self {
        Self {
            headers: HeaderMode::Present,
            url: ColumnSpec::named(["URL (memo)", "URL", "url"]),
            username: ColumnSpec::named(["Username", "username"]),
            password: ColumnSpec::named(["Password", "password"]),
        }
    }

    /// `name,url,username,password,note` rows, header optional.
    pub fn target_default() -> Self {
        Self {
            headers: HeaderMode::Detect,
            url: ColumnSpec::named(["url"]).or_at(1),
            username: ColumnSpec::named(["username"]).or_at(2),
            password: ColumnSpec::named(["password"]).or_at(3),
        }
    }

    fn roles(&self) -> [(&'static str, &ColumnSpec); 3] {
        [
            ("url", &self.url),
            ("username", &self.username),
            ("password", &self.password),
        ]
    }

    pub fn is_header(&self, first_row: &Record) -> bool {
        match self.headers {
            HeaderMode::Present => true,
            HeaderMode::Absent => false,
            HeaderMode::Detect => {
                let named: Vec<&ColumnSpec> = self
                    .roles()
                    .into_iter()
                    .map(|(_, spec)| spec)
                    .filter(|spec| !spec.names.is_empty())
                    .collect();
                !named.is_empty() && named.iter().all(|spec| spec.find_in(first_row).is_some())
            }
        }
    }

    /// Resolves column positions against `header` (the first row, when it is one).
    pub fn resolve(
        &self,
        source_name: &str,
        header: Option<&Record>,
        match_on: MatchOn,
    ) -> Result<ResolvedColumns> {
        let missing = |role: &str| DedupError::MissingColumnError {
            source_name: source_name.to_string(),
            role: role.to_string(),
        };

        let url = self.url.locate(header).ok_or_else(|| missing("url"))?;
        let username = self.username.locate(header).ok_or_else(|| missing("username"))?;
        let password = match match_on {
            MatchOn::DomainUser => self.password.locate(header),
            MatchOn::DomainUserPassword => {
                Some(self.password.locate(header).ok_or_else(|| missing("password"))?)
            }
        };

        tracing::debug!(
            "{} columns: url={}, username={}, password={:?}",
            source_name,
            url,
            username,
            password
        );

        Ok(ResolvedColumns {
            url,
            username,
            password,
        })
    }
}

impl Validate for SourceSchema {
    fn validate(&self) -> Result<()> {
        for (role, spec) in self.roles() {
            for name in &spec.names {
                validate_non_empty_string(role, name)?;
            }
            if spec.names.is_empty() && spec.index.is_none() {
                return Err(DedupError::InvalidConfigValueError {
                    field: role.to_string(),
                    value: String::new(),
                    reason: "Column needs at least one header name or an index".to_string(),
                });
            }
            if self.headers == HeaderMode::Absent && spec.index.is_none() {
                return Err(DedupError::InvalidConfigValueError {
                    field: role.to_string(),
                    value: spec.names.join(", "),
                    reason: "Header names cannot be used when the source has no header".to_string(),
                });
            }
        }

        let indexes: Vec<usize> = self.roles().iter().filter_map(|(_, spec)| spec.index).collect();
        validate_unique_values("index", &indexes)
    }
}
