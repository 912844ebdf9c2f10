//! CLI argument parsing using clap

use crate::config::{CacheConfig, DEFAULT_CACHE_DIR, DEFAULT_MAX_AGE_DAYS, DEFAULT_RETENTION_DAYS};
use crate::error::{CacheError, Result};
use clap::Parser;
use std::path::PathBuf;

/// Cache maintenance tool
#[derive(Parser, Debug)]
#[command(name = "papercache")]
#[command(version)]
#[command(about = "Inspect and maintain a content-addressed analysis cache", long_about = None)]
pub struct Cli {
    /// Cache directory
    #[arg(value_name = "CACHE_DIR", default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Remove unreadable, quarantined, outdated-version, and expired entries
    #[arg(long = "sweep")]
    pub sweep: bool,

    /// Remove every entry
    #[arg(long = "clear")]
    pub clear: bool,

    /// Print the content fingerprint of a file and exit
    #[arg(long = "fingerprint", value_name = "FILE")]
    pub fingerprint: Option<PathBuf>,

    /// Maximum entry age in days accepted by lookup
    #[arg(long = "max-age", value_name = "DAYS", default_value_t = DEFAULT_MAX_AGE_DAYS)]
    pub max_age: i64,

    /// Retention limit in days enforced by sweep
    #[arg(long = "retention", value_name = "DAYS", default_value_t = DEFAULT_RETENTION_DAYS)]
    pub retention: i64,
}

/// What the binary has been asked to do
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Print an entry breakdown (default)
    Stats,
    /// Run the sweep
    Sweep,
    /// Delete all entries
    Clear,
    /// Print the content fingerprint of a file
    Fingerprint(PathBuf),
}

impl Cli {
    /// Parse command line arguments into a config and an action
    pub fn into_parts(self) -> Result<(CacheConfig, Action)> {
        // Actions are mutually exclusive
        let requested =
            usize::from(self.sweep) + usize::from(self.clear) + usize::from(self.fingerprint.is_some());
        if requested > 1 {
            return Err(CacheError::ActionConflict);
        }

        if self.max_age < 0 || self.retention < 0 {
            return Err(CacheError::InvalidConfig(
                "age limits must be non-negative".to_string(),
            ));
        }

        let action = if self.sweep {
            Action::Sweep
        } else if self.clear {
            Action::Clear
        } else if let Some(path) = self.fingerprint {
            Action::Fingerprint(path)
        } else {
            Action::Stats
        };

        let config = CacheConfig {
            cache_dir: self.cache_dir,
            max_age_days: self.max_age,
            retention_days: self.retention,
            ..CacheConfig::default()
        };

        Ok((config, action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["papercache"]);
        let (config, action) = cli.into_parts().unwrap();

        assert_eq!(config.cache_dir, PathBuf::from(DEFAULT_CACHE_DIR));
        assert_eq!(config.max_age_days, 7);
        assert_eq!(config.retention_days, 30);
        assert_eq!(action, Action::Stats);
    }

    #[test]
    fn test_cli_sweep_action() {
        let cli = Cli::parse_from(["papercache", "--sweep", "/tmp/cache"]);
        let (config, action) = cli.into_parts().unwrap();

        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(action, Action::Sweep);
    }

    #[test]
    fn test_cli_clear_action() {
        let cli = Cli::parse_from(["papercache", "--clear"]);
        let (_, action) = cli.into_parts().unwrap();

        assert_eq!(action, Action::Clear);
    }

    #[test]
    fn test_cli_fingerprint_action() {
        let cli = Cli::parse_from(["papercache", "--fingerprint", "paper.pdf"]);
        let (_, action) = cli.into_parts().unwrap();

        assert_eq!(action, Action::Fingerprint(PathBuf::from("paper.pdf")));
    }

    #[test]
    fn test_cli_conflicting_actions() {
        let cli = Cli::parse_from(["papercache", "--sweep", "--clear"]);
        let result = cli.into_parts();

        assert!(matches!(result, Err(CacheError::ActionConflict)));
    }

    #[test]
    fn test_cli_age_overrides() {
        let cli = Cli::parse_from([
            "papercache",
            "--max-age",
            "14",
            "--retention",
            "60",
            "/tmp/cache",
        ]);
        let (config, _) = cli.into_parts().unwrap();

        assert_eq!(config.max_age_days, 14);
        assert_eq!(config.retention_days, 60);
    }

    #[test]
    fn test_cli_rejects_negative_age() {
        let cli = Cli::parse_from(["papercache", "--max-age=-1"]);
        let result = cli.into_parts();

        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }
}
