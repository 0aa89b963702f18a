//! ASP.NET Core shared framework requirements
//!
//! Before an app is published the buildpack still has to know which
//! ASP.NET Core frameworks to put next to the SDK. The first source that
//! yields anything wins:
//!
//! 1. the runtime config, when the app was already published,
//! 2. the `Microsoft.AspNetCore.App`/`.All` package reference of the main project,
//! 3. metapackage versions restored into the NuGet cache.
//!
//! Versions whose shared framework directory already exists are skipped.

use crate::deployment::{
    sdk_dir, shared_aspnetcore_dir, RuntimeConfig, ASPNETCORE_ALL, ASPNETCORE_APP,
    DOTNET_ASPNETCORE,
};
use crate::error::{ResolveError, Result};
use crate::installer::{Dependency, Installer};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler, VersionSource};
use crate::project::extract::ASPNETCORE_PACKAGE_REFERENCE;
use crate::project::Project;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// NuGet cache directory names of the ASP.NET Core metapackages, in lookup order
pub const METAPACKAGES: [&str; 2] = ["microsoft.aspnetcore.app", "microsoft.aspnetcore.all"];

pub struct AspNetCoreResolver {
    project: Arc<Project>,
    installer: Arc<dyn Installer>,
    progress: Arc<dyn ProgressHandler>,
}

impl AspNetCoreResolver {
    pub fn new(
        project: Arc<Project>,
        installer: Arc<dyn Installer>,
        progress: Option<Arc<dyn ProgressHandler>>,
    ) -> Self {
        Self {
            project,
            installer,
            progress: progress.unwrap_or_else(|| Arc::new(NoOpHandler)),
        }
    }

    /// Install every required ASP.NET Core version that is not present yet.
    ///
    /// Returns the versions handed to the installer.
    pub fn install(&self) -> Result<Vec<String>> {
        let versions = self.required_versions()?;
        if versions.is_empty() {
            debug!("No ASP.NET Core version required");
            return Ok(Vec::new());
        }

        self.progress.on_progress(&ProgressEvent::VersionsRequired {
            dependency: DOTNET_ASPNETCORE.to_string(),
            versions: versions.clone(),
        });

        let mut installed = Vec::new();
        for version in versions {
            if self.is_installed(&version) {
                continue;
            }

            self.progress.on_progress(&ProgressEvent::Installing {
                dependency: DOTNET_ASPNETCORE.to_string(),
                version: version.clone(),
            });
            self.installer
                .install_dependency(
                    &Dependency::new(DOTNET_ASPNETCORE, version.as_str()),
                    &sdk_dir(self.project.dep_dir()),
                )
                .map_err(|source| ResolveError::Install {
                    name: DOTNET_ASPNETCORE.to_string(),
                    version: version.clone(),
                    source,
                })?;
            installed.push(version);
        }

        info!(count = installed.len(), "ASP.NET Core frameworks requested");
        Ok(installed)
    }

    /// Versions the app needs, already matched against the catalog and sorted
    pub fn required_versions(&self) -> Result<Vec<String>> {
        self.progress.on_progress(&ProgressEvent::SearchingVersions {
            source: VersionSource::RuntimeConfig,
        });
        if let Some(path) = self.project.runtime_config_file()? {
            // A published app is described entirely by its runtime config
            return self.versions_from_runtime_config(&path);
        }

        self.progress.on_progress(&ProgressEvent::SearchingVersions {
            source: VersionSource::ProjectFile,
        });
        if let Some(main_path) = self.project.main_path()? {
            if let Some(version) = self.project.version_from_proj_file(
                &main_path,
                &ASPNETCORE_PACKAGE_REFERENCE,
                DOTNET_ASPNETCORE,
            )? {
                return Ok(vec![version]);
            }
        }

        self.progress.on_progress(&ProgressEvent::SearchingVersions {
            source: VersionSource::RestoredPackages,
        });
        self.versions_from_restored_packages()
    }

    pub fn is_installed(&self, version: &str) -> bool {
        let path = shared_aspnetcore_dir(self.project.dep_dir(), version);
        if !self.project.fs().exists(&path) {
            return false;
        }

        self.progress.on_progress(&ProgressEvent::AlreadyInstalled {
            dependency: DOTNET_ASPNETCORE.to_string(),
            version: version.to_string(),
            path,
        });
        true
    }

    fn versions_from_runtime_config(&self, path: &Path) -> Result<Vec<String>> {
        let config = RuntimeConfig::load(self.project.fs(), path)?;
        let framework = config.framework();

        let is_aspnetcore = framework.name == ASPNETCORE_APP || framework.name == ASPNETCORE_ALL;
        if !is_aspnetcore || framework.version.is_empty() {
            return Ok(Vec::new());
        }

        let version = self.project.find_matching_framework_version(
            DOTNET_ASPNETCORE,
            &framework.version,
            config.apply_patches(),
        )?;
        Ok(vec![version])
    }

    fn versions_from_restored_packages(&self) -> Result<Vec<String>> {
        let [app, all] = METAPACKAGES;

        match self.project.restored_package_versions(app, DOTNET_ASPNETCORE) {
            Ok(versions) if !versions.is_empty() => return Ok(versions),
            Ok(_) => {}
            Err(e) => debug!(package = app, error = %e, "Ignoring restored package versions"),
        }

        // Last source: a version the catalog cannot match comes back empty
        self.project.restored_package_versions(all, DOTNET_ASPNETCORE)
    }
}
