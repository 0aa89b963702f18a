//! Deployment model classification and framework installation
//!
//! A build is classified once from its runtime config:
//!
//! - a framework name means the app runs on a shared framework that has to
//!   be installed ([`DeploymentModel::FrameworkDependent`]),
//! - a runtime config without one means the runtime ships with the app
//!   ([`DeploymentModel::SelfContained`]),
//! - no runtime config means the app is still source and versions come from
//!   its project file ([`DeploymentModel::SourcePublish`]).

mod runtime_config;

pub use runtime_config::{Framework, RuntimeConfig, RuntimeOptions};

use crate::error::{ResolveError, Result};
use crate::installer::{Dependency, Installer};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler, VersionSource};
use crate::project::extract::{ASPNETCORE_VERSION_ATTRIBUTE, RUNTIME_FRAMEWORK_VERSION};
use crate::project::Project;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const ASPNETCORE_APP: &str = "Microsoft.AspNetCore.App";
pub const ASPNETCORE_ALL: &str = "Microsoft.AspNetCore.All";
pub const NETCORE_APP: &str = "Microsoft.NETCore.App";

/// Catalog names of the installable shared frameworks
pub const DOTNET_ASPNETCORE: &str = "dotnet-aspnetcore";
pub const DOTNET_RUNTIME: &str = "dotnet-runtime";

/// Install root for shared frameworks, relative to the dep dir
pub const SDK_DIR: &str = "dotnet-sdk";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DeploymentModel {
    FrameworkDependent {
        framework_name: String,
        framework_version: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        apply_patches: Option<bool>,
    },
    SelfContained,
    SourcePublish,
}

impl DeploymentModel {
    pub fn kind(&self) -> &'static str {
        match self {
            DeploymentModel::FrameworkDependent { .. } => "framework-dependent",
            DeploymentModel::SelfContained => "self-contained",
            DeploymentModel::SourcePublish => "source-publish",
        }
    }
}

/// `<dep_dir>/dotnet-sdk`
pub fn sdk_dir(dep_dir: &Path) -> PathBuf {
    dep_dir.join(SDK_DIR)
}

/// Where a given ASP.NET Core shared framework version ends up once installed
pub fn shared_aspnetcore_dir(dep_dir: &Path, version: &str) -> PathBuf {
    sdk_dir(dep_dir)
        .join("shared")
        .join(ASPNETCORE_APP)
        .join(version)
}

pub fn classify(project: &Project) -> Result<DeploymentModel> {
    let Some(path) = project.runtime_config_file()? else {
        return Ok(DeploymentModel::SourcePublish);
    };

    let config = RuntimeConfig::load(project.fs(), &path)?;
    let framework = config.framework();
    if framework.name.is_empty() {
        return Ok(DeploymentModel::SelfContained);
    }

    Ok(DeploymentModel::FrameworkDependent {
        framework_name: framework.name.clone(),
        framework_version: framework.version.clone(),
        apply_patches: config.apply_patches(),
    })
}

/// Installs the shared frameworks a deployment model needs
pub struct DeploymentResolver {
    project: Arc<Project>,
    installer: Arc<dyn Installer>,
    progress: Arc<dyn ProgressHandler>,
}

impl DeploymentResolver {
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

    pub fn classify(&self) -> Result<DeploymentModel> {
        let model = classify(&self.project)?;
        self.progress
            .on_progress(&ProgressEvent::Classified { kind: model.kind() });
        Ok(model)
    }

    pub fn install_frameworks(&self, model: &DeploymentModel) -> Result<()> {
        match model {
            DeploymentModel::FrameworkDependent {
                framework_name,
                framework_version,
                apply_patches,
            } => self.install_framework_dependent(framework_name, framework_version, *apply_patches),
            DeploymentModel::SelfContained => {
                debug!("Self-contained deployment, no shared frameworks to install");
                Ok(())
            }
            DeploymentModel::SourcePublish => self.install_from_project_file(),
        }
    }

    /// Classify and install in one step
    pub fn resolve(&self) -> Result<DeploymentModel> {
        let model = self.classify()?;
        self.install_frameworks(&model)?;
        Ok(model)
    }

    fn install_framework_dependent(
        &self,
        name: &str,
        version: &str,
        apply_patches: Option<bool>,
    ) -> Result<()> {
        self.progress.on_progress(&ProgressEvent::SearchingVersions {
            source: VersionSource::RuntimeConfig,
        });

        let (aspnetcore, runtime) = match name {
            ASPNETCORE_APP | ASPNETCORE_ALL => {
                let aspnetcore = self.project.find_matching_framework_version(
                    DOTNET_ASPNETCORE,
                    version,
                    apply_patches,
                )?;
                let declared = self.installed_aspnetcore_runtime_version(&aspnetcore)?;
                let runtime = self.project.find_matching_framework_version(
                    DOTNET_RUNTIME,
                    &declared,
                    apply_patches,
                )?;
                (aspnetcore, runtime)
            }
            NETCORE_APP => {
                let runtime =
                    self.project
                        .find_matching_framework_version(DOTNET_RUNTIME, version, apply_patches)?;

                self.progress.on_progress(&ProgressEvent::SearchingVersions {
                    source: VersionSource::DepsJson,
                });
                let aspnetcore = self.project.version_from_deps_json()?;
                (aspnetcore, runtime)
            }
            other => {
                return Err(ResolveError::UnknownFramework {
                    name: other.to_string(),
                })
            }
        };

        // Both versions are settled before anything is installed
        self.install(DOTNET_ASPNETCORE, &aspnetcore)?;
        self.install(DOTNET_RUNTIME, &runtime)
    }

    /// Runtime version the installed ASP.NET Core framework was built against
    fn installed_aspnetcore_runtime_version(&self, aspnetcore: &str) -> Result<String> {
        self.progress.on_progress(&ProgressEvent::SearchingVersions {
            source: VersionSource::InstalledFramework,
        });

        let path = shared_aspnetcore_dir(self.project.dep_dir(), aspnetcore)
            .join(format!("{}.runtimeconfig.json", ASPNETCORE_APP));

        if !self.project.fs().is_file(&path) {
            return Err(ResolveError::MissingFrameworkRuntimeConfig { path });
        }

        let config = RuntimeConfig::load(self.project.fs(), &path)?;
        debug!(path = %path.display(), "Read runtime version from installed ASP.NET Core");
        Ok(config.framework().version.clone())
    }

    fn install_from_project_file(&self) -> Result<()> {
        let Some(main_path) = self.project.main_path()? else {
            info!("No project file found, nothing to install");
            return Ok(());
        };

        self.progress.on_progress(&ProgressEvent::SearchingVersions {
            source: VersionSource::ProjectFile,
        });

        let runtime = self.project.version_from_proj_file(
            &main_path,
            &RUNTIME_FRAMEWORK_VERSION,
            DOTNET_RUNTIME,
        )?;
        let aspnetcore = self.project.version_from_proj_file(
            &main_path,
            &ASPNETCORE_VERSION_ATTRIBUTE,
            DOTNET_ASPNETCORE,
        )?;

        for (name, version) in [(DOTNET_ASPNETCORE, aspnetcore), (DOTNET_RUNTIME, runtime)] {
            match version {
                Some(version) => self.install(name, &version)?,
                None => self.progress.on_progress(&ProgressEvent::VersionNotDeclared {
                    dependency: name.to_string(),
                    path: main_path.clone(),
                }),
            }
        }

        Ok(())
    }

    fn install(&self, name: &str, version: &str) -> Result<()> {
        self.progress.on_progress(&ProgressEvent::Installing {
            dependency: name.to_string(),
            version: version.to_string(),
        });

        self.installer
            .install_dependency(
                &Dependency::new(name, version),
                &sdk_dir(self.project.dep_dir()),
            )
            .map_err(|source| ResolveError::Install {
                name: name.to_string(),
                version: version.to_string(),
                source,
            })
    }
}
