pub mod schema;
pub mod toml_config;

#[cfg(feature = "cli")]
mod cli_args {
    use super::toml_config::DedupConfig;
    use crate::core::suffix::SuffixStrategy;
    use crate::domain::model::MatchOn;
    use crate::utils::error::Result;
    use crate::utils::logger::LogFormat;
    use crate::utils::validation::{validate_path, Validate};
    use clap::{Args, Parser};
    use std::path::PathBuf;

    /// Flags shared by both tools.
    #[derive(Debug, Clone, Args)]
    pub struct CommonArgs {
        /// TOML file with column mappings and normalizer settings
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Suffix data used to find the registrable domain
        #[arg(long, value_enum)]
        pub suffixes: Option<SuffixStrategy>,

        /// Fields that make two records the same credential
        #[arg(long, value_enum)]
        pub match_on: Option<MatchOn>,

        /// Print run statistics as JSON on stderr
        #[arg(long)]
        pub summary: bool,

        /// Enable verbose output
        #[arg(short, long)]
        pub verbose: bool,

        #[arg(long, value_enum, default_value = "text")]
        pub log_format: LogFormat,
    }

    impl CommonArgs {
        /// 載入設定檔（若有）並套用命令列覆蓋設定
        pub fn load_config(&self) -> Result<DedupConfig> {
            let mut config = match &self.config {
                Some(path) => {
                    tracing::info!("📁 Loading configuration from: {}", path.display());
                    DedupConfig::from_file(path)?
                }
                None => DedupConfig::default(),
            };

            config.apply_overrides(self.suffixes, self.match_on);
            config.validate()?;
            Ok(config)
        }
    }

    /// Keep the first record per (domain, username), reading stdin and writing stdout.
    #[derive(Debug, Clone, Parser)]
    #[command(name = "pwdedup-unique")]
    #[command(about = "Deduplicate a password export CSV read from stdin")]
    pub struct UniqueArgs {
        #[command(flatten)]
        pub common: CommonArgs,
    }

    /// Remove target rows whose credential already exists in the reference export.
    #[derive(Debug, Clone, Parser)]
    #[command(name = "pwdedup")]
    #[command(about = "Remove rows from TARGET that are already present in REFERENCE")]
    pub struct SubtractArgs {
        /// Target CSV (name,url,username,password,note)
        pub target: PathBuf,

        /// Reference CSV (Title,URL (memo),Username,Password,...)
        pub reference: PathBuf,

        #[command(flatten)]
        pub common: CommonArgs,
    }

    impl Validate for SubtractArgs {
        fn validate(&self) -> Result<()> {
            validate_path("target", &self.target.to_string_lossy())?;
            validate_path("reference", &self.reference.to_string_lossy())
        }
    }

}

#[cfg(feature = "cli")]
pub use cli_args::{CommonArgs, SubtractArgs, UniqueArgs};
