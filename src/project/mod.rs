//! Build directory inspection
//!
//! [`Project`] answers questions about one application: which project or
//! runtime config is the entry point, whether it has been published, which
//! framework versions its files declare and how to start it.

pub mod extract;
pub mod scanner;
mod start;

pub use scanner::{ProjectDescriptor, ProjectKind, STAGING_DIR};
pub use start::PUBLISH_DIR;

use crate::error::{ResolveError, Result};
use crate::fs::FileSystem;
use crate::manifest::{find_matching_framework_version, Manifest};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Project {
    build_dir: PathBuf,
    dep_dir: PathBuf,
    deps_idx: String,
    fs: Arc<dyn FileSystem>,
    manifest: Arc<dyn Manifest>,
}

impl Project {
    pub fn new(
        build_dir: PathBuf,
        dep_dir: PathBuf,
        deps_idx: impl Into<String>,
        fs: Arc<dyn FileSystem>,
        manifest: Arc<dyn Manifest>,
    ) -> Self {
        Self {
            build_dir,
            dep_dir,
            deps_idx: deps_idx.into(),
            fs,
            manifest,
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn dep_dir(&self) -> &Path {
        &self.dep_dir
    }

    pub fn deps_idx(&self) -> &str {
        &self.deps_idx
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn manifest(&self) -> &dyn Manifest {
        self.manifest.as_ref()
    }

    pub fn project_descriptors(&self) -> Result<Vec<ProjectDescriptor>> {
        scanner::project_descriptors(self.fs(), &self.build_dir)
    }

    pub fn project_file_paths(&self) -> Result<Vec<PathBuf>> {
        scanner::project_file_paths(self.fs(), &self.build_dir)
    }

    pub fn runtime_config_file(&self) -> Result<Option<PathBuf>> {
        scanner::runtime_config_file(self.fs(), &self.build_dir)
    }

    pub fn deps_json_file(&self) -> Result<PathBuf> {
        scanner::deps_json_file(self.fs(), &self.build_dir)
    }

    /// A runtime config in the build root means `dotnet publish` already ran
    pub fn is_published(&self) -> Result<bool> {
        Ok(self.runtime_config_file()?.is_some())
    }

    pub fn is_fsharp(&self) -> Result<bool> {
        Ok(self
            .project_descriptors()?
            .iter()
            .any(|d| d.kind == ProjectKind::FSharp))
    }

    /// Entry point of the app.
    ///
    /// The runtime config wins. Otherwise the single project file, or the one
    /// named by `.deployment` when there are several.
    pub fn main_path(&self) -> Result<Option<PathBuf>> {
        if let Some(runtime_config) = self.runtime_config_file()? {
            return Ok(Some(runtime_config));
        }

        let mut paths = self.project_file_paths()?;
        match paths.len() {
            0 => Ok(None),
            1 => Ok(paths.pop()),
            _ => {
                let deployment_file = self.build_dir.join(scanner::DEPLOYMENT_FILE);
                if !self.fs.is_file(&deployment_file) {
                    return Err(ResolveError::MultipleProjectFiles { paths });
                }
                scanner::project_from_deployment_file(self.fs(), &self.build_dir, &deployment_file)
                    .map(Some)
            }
        }
    }

    pub fn version_from_proj_file(
        &self,
        path: &Path,
        pattern: &Regex,
        name: &str,
    ) -> Result<Option<String>> {
        extract::version_from_proj_file(self.fs(), self.manifest(), path, pattern, name)
    }

    /// ASP.NET Core version pinned in the build output's `*.deps.json`
    pub fn version_from_deps_json(&self) -> Result<String> {
        let path = self.deps_json_file()?;
        extract::version_from_deps_json(self.fs(), &path)
    }

    pub fn restored_package_versions(&self, package: &str, name: &str) -> Result<Vec<String>> {
        extract::versions_from_restored_packages(
            self.fs(),
            self.manifest(),
            &self.dep_dir,
            package,
            name,
        )
    }

    pub fn assembly_name(&self, path: &Path) -> Result<Option<String>> {
        extract::assembly_name(self.fs(), path)
    }

    pub fn find_matching_framework_version(
        &self,
        name: &str,
        version: &str,
        apply_patches: Option<bool>,
    ) -> Result<String> {
        find_matching_framework_version(self.manifest(), name, version, apply_patches)
    }
}
