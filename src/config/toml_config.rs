use crate::config::schema::SourceSchema;
use crate::core::suffix::{CompoundSuffixHeuristic, SuffixStrategy, DEFAULT_COMPOUND_SUFFIXES};
use crate::domain::model::MatchOn;
use crate::utils::error::{DedupError, Result};
use crate::utils::validation::{validate_compound_suffix, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file; every section falls back to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub normalizer: NormalizerConfig,
    pub unique: UniqueConfig,
    pub subtract: SubtractConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub strategy: SuffixStrategy,
    /// Replaces the built-in compound suffix set of the heuristic.
    pub compound_suffixes: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            strategy: SuffixStrategy::default(),
            compound_suffixes: DEFAULT_COMPOUND_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl NormalizerConfig {
    pub fn heuristic(&self) -> CompoundSuffixHeuristic {
        CompoundSuffixHeuristic::new(&self.compound_suffixes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniqueConfig {
    pub match_on: MatchOn,
    pub schema: SourceSchema,
}

impl Default for UniqueConfig {
    fn default() -> Self {
        Self {
            match_on: MatchOn::DomainUser,
            schema: SourceSchema::positional(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtractConfig {
    pub match_on: MatchOn,
    pub target: SourceSchema,
    pub reference: SourceSchema,
}

impl Default for SubtractConfig {
    fn default() -> Self {
        Self {
            match_on: MatchOn::DomainUserPassword,
            target: SourceSchema::target_default(),
            reference: SourceSchema::reference_default(),
        }
    }
}

impl DedupConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DedupError::unreadable(path.display().to_string(), e))?;

        Self::from_toml_str(&content).map_err(|e| match e {
            DedupError::ConfigParseError { message, .. } => DedupError::ConfigParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DedupError::ConfigParseError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// 命令列參數優先於設定檔
    pub fn apply_overrides(&mut self, strategy: Option<SuffixStrategy>, match_on: Option<MatchOn>) {
        if let Some(strategy) = strategy {
            tracing::debug!("Suffix strategy overridden to {:?}", strategy);
            self.normalizer.strategy = strategy;
        }
        if let Some(match_on) = match_on {
            tracing::debug!("Match mode overridden to {:?}", match_on);
            self.unique.match_on = match_on;
            self.subtract.match_on = match_on;
        }
    }
}

impl Validate for DedupConfig {
    fn validate(&self) -> Result<()> {
        for suffix in &self.normalizer.compound_suffixes {
            validate_compound_suffix("normalizer.compound_suffixes", suffix)?;
        }

        self.unique.schema.validate()?;
        self.subtract.target.validate()?;
        self.subtract.reference.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ColumnSpec, HeaderMode};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DedupConfig::from_toml_str("").unwrap();
        assert_eq!(config, DedupConfig::default());
        assert_eq!(config.normalizer.strategy, SuffixStrategy::Public);
        assert_eq!(config.unique.match_on, MatchOn::DomainUser);
        assert_eq!(config.subtract.match_on, MatchOn::DomainUserPassword);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[normalizer]
strategy = "heuristic"
compound_suffixes = ["co.uk", "com.br"]

[subtract]
match_on = "domain-user"

[subtract.reference]
headers = "present"
url = ["Website", "URL"]
username = "Login"
password = "Secret"

[subtract.target]
headers = "absent"
url = 0
username = 1
password = 2
"#;

        let config = DedupConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.normalizer.strategy, SuffixStrategy::Heuristic);
        assert!(config.normalizer.heuristic().is_compound("com.br"));
        assert!(!config.normalizer.heuristic().is_compound("co.jp"));
        assert_eq!(config.subtract.match_on, MatchOn::DomainUser);
        assert_eq!(config.subtract.reference.url, ColumnSpec::named(["Website", "URL"]));
        assert_eq!(config.subtract.target.headers, HeaderMode::Absent);
        assert_eq!(config.subtract.target.password, ColumnSpec::at(2));
        // untouched section keeps its defaults
        assert_eq!(config.unique, UniqueConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_compound_suffix_fails_validation() {
        let config = DedupConfig::from_toml_str(
            r#"
[normalizer]
compound_suffixes = ["uk"]
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_strategy_is_a_parse_error() {
        let err = DedupConfig::from_toml_str(
            r#"
[normalizer]
strategy = "magic"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, DedupError::ConfigParseError { .. }));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = DedupConfig::default();
        config.apply_overrides(Some(SuffixStrategy::Heuristic), Some(MatchOn::DomainUser));
        assert_eq!(config.normalizer.strategy, SuffixStrategy::Heuristic);
        assert_eq!(config.subtract.match_on, MatchOn::DomainUser);

        config.apply_overrides(None, None);
        assert_eq!(config.normalizer.strategy, SuffixStrategy::Heuristic);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[unique]\nmatch_on = \"domain-user-password\"\n")
            .unwrap();

        let config = DedupConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.unique.match_on, MatchOn::DomainUserPassword);
    }

    #[test]
    fn test_missing_config_file_is_unreadable() {
        let err = DedupConfig::from_file("/nonexistent/pwdedup.toml").unwrap_err();
        assert!(matches!(err, DedupError::UnreadableFile { .. }));
    }

    #[test]
    fn test_malformed_config_file_reports_its_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[unique\nmatch_on = 3\n").unwrap();

        let err = DedupConfig::from_file(temp_file.path()).unwrap_err();
        match err {
            DedupError::ConfigParseError { path, .. } => {
                assert_eq!(path, temp_file.path().display().to_string());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
