use crate::types::EnumStrategy;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser, Debug, Clone)]
#[command(name = "column-resolver")]
#[command(about = "Resolve the value converter used for each column of an entity mapping", long_about = None)]
pub struct Config {
    #[arg(long, default_value = "info", env = "COLUMN_RESOLVER_LOG_LEVEL")]
    pub log_level: String,

    // Resolution defaults
    #[arg(long, value_enum, default_value = "name", env = "COLUMN_RESOLVER_ENUM_STRATEGY", help = "How enum properties are stored when no converter is registered for them")]
    pub enum_strategy: EnumStrategy,

    #[arg(long, default_value = "*", env = "COLUMN_RESOLVER_MASK_CHAR", help = "Character used by the built-in mask processors")]
    pub mask_char: char,

    // Report
    #[arg(short, long, env = "COLUMN_RESOLVER_MAPPING", help = "JSON table mapping to resolve")]
    pub mapping: Option<PathBuf>,

    #[arg(long, env = "COLUMN_RESOLVER_SHOW_IGNORED", help = "Include ignored columns in the report")]
    pub show_ignored: bool,
}

impl Config {
    /// Get a configuration instance with all values resolved from CLI args and environment variables
    pub fn load() -> Self {
        Config::parse()
    }

    /// Resolve values from environment variables only, ignoring process arguments.
    ///
    /// Invalid values fall back to the defaults instead of exiting the process.
    pub fn from_env() -> Self {
        Self::parse_or_default(["column-resolver"])
    }

    pub(crate) fn parse_or_default<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Config::try_parse_from(args) {
            Ok(config) => config,
            Err(e) => {
                warn!("Invalid column-resolver settings, using defaults: {}", e);
                Config::default()
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enum_strategy: EnumStrategy::Name,
            mask_char: crate::mask::DEFAULT_MASK_CHAR,
            mapping: None,
            show_ignored: false,
        }
    }
}

// Global configuration instance
lazy_static::lazy_static! {
    pub static ref CONFIG: Config = Config::from_env();
}
