//! Resolver configuration
//!
//! Settings come from environment variables with defaults, and command-line
//! arguments override them field by field.
//!
//! # Environment Variables
//!
//! - `DOTNET_DEPLOY_BUILD_DIR`: application directory - default: current directory
//! - `DOTNET_DEPLOY_DEPS_DIR`: buildpack dependency root - default: system temp dir + "deps"
//! - `DOTNET_DEPLOY_DEPS_IDX`: index of this buildpack under the deps root - default: "0"
//! - `DOTNET_DEPLOY_MANIFEST`: buildpack `manifest.yml` listing installable versions
//! - `DOTNET_DEPLOY_LOG_LEVEL`: trace|debug|info|warn|error - default: "info"

use crate::util::logging::VALID_LEVELS;
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const BUILD_DIR_ENV: &str = "DOTNET_DEPLOY_BUILD_DIR";
pub const DEPS_DIR_ENV: &str = "DOTNET_DEPLOY_DEPS_DIR";
pub const DEPS_IDX_ENV: &str = "DOTNET_DEPLOY_DEPS_IDX";
pub const MANIFEST_ENV: &str = "DOTNET_DEPLOY_MANIFEST";
pub const LOG_LEVEL_ENV: &str = "DOTNET_DEPLOY_LOG_LEVEL";

const DEFAULT_DEPS_IDX: &str = "0";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid deps index '{0}': expected a non-negative integer")]
    InvalidDepsIndex(String),

    #[error("Invalid log level: {0}. Valid options: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Application being staged
    pub build_dir: PathBuf,

    /// Root holding one dependency directory per buildpack
    pub deps_dir: PathBuf,

    /// This buildpack's directory name under `deps_dir`
    pub deps_idx: String,

    /// Catalog of installable versions; empty catalog when unset
    pub manifest_path: Option<PathBuf>,

    pub log_level: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        let build_dir = env::var(BUILD_DIR_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let deps_dir = env::var(DEPS_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir().join("deps"));

        let deps_idx = env::var(DEPS_IDX_ENV).unwrap_or_else(|_| DEFAULT_DEPS_IDX.to_string());

        let manifest_path = env::var(MANIFEST_ENV).ok().map(PathBuf::from);

        let log_level = env::var(LOG_LEVEL_ENV)
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            build_dir,
            deps_dir,
            deps_idx,
            manifest_path,
            log_level,
        }
    }
}

impl DeployConfig {
    /// `<deps_dir>/<deps_idx>`, where this buildpack installs frameworks
    pub fn dep_dir(&self) -> PathBuf {
        self.deps_dir.join(&self.deps_idx)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.build_dir.is_dir() {
            return Err(ConfigError::ValidationFailed(format!(
                "Build directory {} does not exist",
                self.build_dir.display()
            )));
        }

        if self.deps_idx.parse::<u32>().is_err() {
            return Err(ConfigError::InvalidDepsIndex(self.deps_idx.clone()));
        }

        if !VALID_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        if let Some(ref manifest) = self.manifest_path {
            if !manifest.is_file() {
                return Err(ConfigError::ValidationFailed(format!(
                    "Manifest {} does not exist",
                    manifest.display()
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for DeployConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Build Dir: {}", self.build_dir.display())?;
        writeln!(f, "Dep Dir: {}", self.dep_dir().display())?;
        match self.manifest_path {
            Some(ref path) => writeln!(f, "Manifest: {}", path.display())?,
            None => writeln!(f, "Manifest: none")?,
        }
        writeln!(f, "Log Level: {}", self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    struct EnvGuard {
        key: &'static str,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self { key, old_value }
        }

        fn unset(key: &'static str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self { key, old_value }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(self.key, v),
                None => env::remove_var(self.key),
            }
        }
    }

    fn valid_config(temp: &TempDir) -> DeployConfig {
        DeployConfig {
            build_dir: temp.path().to_path_buf(),
            deps_dir: temp.path().join("deps"),
            deps_idx: "0".to_string(),
            manifest_path: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = [
            EnvGuard::unset(BUILD_DIR_ENV),
            EnvGuard::unset(DEPS_DIR_ENV),
            EnvGuard::unset(DEPS_IDX_ENV),
            EnvGuard::unset(MANIFEST_ENV),
            EnvGuard::unset(LOG_LEVEL_ENV),
        ];

        let config = DeployConfig::default();

        assert_eq!(config.build_dir, env::current_dir().unwrap());
        assert_eq!(config.deps_dir, env::temp_dir().join("deps"));
        assert_eq!(config.deps_idx, DEFAULT_DEPS_IDX);
        assert!(config.manifest_path.is_none());
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = [
            EnvGuard::set(BUILD_DIR_ENV, "/tmp/app"),
            EnvGuard::set(DEPS_DIR_ENV, "/tmp/deps"),
            EnvGuard::set(DEPS_IDX_ENV, "2"),
            EnvGuard::set(MANIFEST_ENV, "/buildpack/manifest.yml"),
            EnvGuard::set(LOG_LEVEL_ENV, "DEBUG"),
        ];

        let config = DeployConfig::default();

        assert_eq!(config.build_dir, PathBuf::from("/tmp/app"));
        assert_eq!(config.dep_dir(), PathBuf::from("/tmp/deps/2"));
        assert_eq!(
            config.manifest_path,
            Some(PathBuf::from("/buildpack/manifest.yml"))
        );
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_validation_valid() {
        let temp = TempDir::new().unwrap();
        assert!(valid_config(&temp).validate().is_ok());
    }

    #[test]
    fn test_validation_missing_build_dir() {
        let temp = TempDir::new().unwrap();
        let mut config = valid_config(&temp);
        config.build_dir = temp.path().join("missing");

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_validation_invalid_deps_idx() {
        let temp = TempDir::new().unwrap();
        let mut config = valid_config(&temp);
        config.deps_idx = "-1".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDepsIndex(_))
        ));
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let temp = TempDir::new().unwrap();
        let mut config = valid_config(&temp);
        config.log_level = "chatty".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_validation_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let mut config = valid_config(&temp);
        config.manifest_path = Some(temp.path().join("manifest.yml"));
        assert!(config.validate().is_err());

        std::fs::write(temp.path().join("manifest.yml"), "dependencies: []\n").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_display() {
        let temp = TempDir::new().unwrap();
        let display = valid_config(&temp).to_string();
        assert!(display.contains("Dep Dir:"));
        assert!(display.contains("Manifest: none"));
    }
}
