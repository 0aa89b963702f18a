//! Error types for deployment classification and version resolution

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while classifying a build or resolving framework versions
#[derive(Debug, Error)]
pub enum ResolveError {
    /// More than one `*.runtimeconfig.json` in the build root
    #[error("Multiple .runtimeconfig.json files present: {paths:?}")]
    MultipleRuntimeConfigs { paths: Vec<PathBuf> },

    /// Several project files and no `.deployment` file to pick one
    #[error("Multiple paths: {paths:?} contain a project file, but no .deployment file was used")]
    MultipleProjectFiles { paths: Vec<PathBuf> },

    /// Zero or several `*.deps.json` files where exactly one is required
    #[error("Multiple or no .deps.json files present (found {count})")]
    DepsJsonNotUnique { count: usize },

    /// The deps manifest has no `Microsoft.AspNetCore.App/<version>` library
    #[error("Deps.json file {path:?} didn't contain Microsoft.AspNetCore.App key")]
    MissingAspNetCoreLibrary { path: PathBuf },

    /// The installed ASP.NET Core framework carries no runtime config to read the runtime from
    #[error("ASP.NET Core runtime config {path:?} not found, cannot determine the base runtime version")]
    MissingFrameworkRuntimeConfig { path: PathBuf },

    #[error("Failed to parse JSON file {path:?}: {source}")]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse project file {path:?}: {source}")]
    MalformedXml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Invalid .deployment file {path:?}: {reason}")]
    MalformedDeploymentFile { path: PathBuf, reason: String },

    /// The catalog has no version matching the requested pattern
    #[error("no match found for {pattern} in {name} versions")]
    NoMatchingVersion { name: String, pattern: String },

    #[error("invalid version '{version}': expected major.minor.patch")]
    InvalidVersion { version: String },

    /// The runtime config names a framework that is neither ASP.NET Core nor the base runtime
    #[error("invalid framework '{name}' specified in application runtime config file")]
    UnknownFramework { name: String },

    #[error("failed to install {name} {version}: {source}")]
    Install {
        name: String,
        version: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    FileSystem(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
