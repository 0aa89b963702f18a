//! Resolution events and the handler that receives them

use std::fmt;
use std::path::PathBuf;

/// Where a required framework version was looked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    RuntimeConfig,
    ProjectFile,
    RestoredPackages,
    DepsJson,
    InstalledFramework,
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionSource::RuntimeConfig => "runtime config",
            VersionSource::ProjectFile => "project file",
            VersionSource::RestoredPackages => "nuget packages",
            VersionSource::DepsJson => "deps.json",
            VersionSource::InstalledFramework => "installed framework",
        };
        f.write_str(name)
    }
}

/// Events emitted while classifying a build and resolving its frameworks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Deployment model decided for the build
    Classified { kind: &'static str },

    /// Started looking for versions in a given source
    SearchingVersions { source: VersionSource },

    /// Versions a framework needs, after patch matching
    VersionsRequired {
        dependency: String,
        versions: Vec<String>,
    },

    /// A project file declares no version for a dependency
    VersionNotDeclared { dependency: String, path: PathBuf },

    /// A framework version is already present and will not be installed again
    AlreadyInstalled {
        dependency: String,
        version: String,
        path: PathBuf,
    },

    /// Installation requested from the installer
    Installing { dependency: String, version: String },

    /// Launch target found (empty when there is none)
    StartCommandResolved { command: String },
}

/// Explicit sink for what the resolvers are doing
pub trait ProgressHandler: Send + Sync {
    /// Receives every event in emission order
    fn on_progress(&self, event: &ProgressEvent);
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
