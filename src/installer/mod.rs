//! Installer collaborator
//!
//! Downloading and unpacking dependencies belongs to the buildpack runtime.
//! Resolvers only talk to it through [`Installer`]. [`InstallPlan`] is an
//! installer that records what would be installed, used for dry runs.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A named, versioned dependency from the manifest catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

pub trait Installer: Send + Sync {
    /// Install `dep` into `out_dir`
    fn install_dependency(&self, dep: &Dependency, out_dir: &Path) -> anyhow::Result<()>;

    /// Download `dep` to `out_file` without unpacking it
    fn fetch_dependency(&self, dep: &Dependency, out_file: &Path) -> anyhow::Result<()>;

    /// Restrict the catalog entry `name` to a single `version`
    fn install_only_version(&self, name: &str, version: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanAction {
    Install,
    Fetch,
    OnlyVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedInstall {
    pub action: PlanAction,
    pub dependency: Dependency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
}

/// Installer that records requests in order instead of performing them
#[derive(Debug, Default)]
pub struct InstallPlan {
    entries: Mutex<Vec<PlannedInstall>>,
}

impl InstallPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<PlannedInstall> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Dependencies passed to `install_dependency`, in call order
    pub fn installed(&self) -> Vec<Dependency> {
        self.entries()
            .into_iter()
            .filter(|e| e.action == PlanAction::Install)
            .map(|e| e.dependency)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }

    fn record(&self, action: PlanAction, dependency: Dependency, target: Option<PathBuf>) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(PlannedInstall {
                action,
                dependency,
                target,
            });
    }
}

impl Installer for InstallPlan {
    fn install_dependency(&self, dep: &Dependency, out_dir: &Path) -> anyhow::Result<()> {
        self.record(PlanAction::Install, dep.clone(), Some(out_dir.to_path_buf()));
        Ok(())
    }

    fn fetch_dependency(&self, dep: &Dependency, out_file: &Path) -> anyhow::Result<()> {
        self.record(PlanAction::Fetch, dep.clone(), Some(out_file.to_path_buf()));
        Ok(())
    }

    fn install_only_version(&self, name: &str, version: &str) -> anyhow::Result<()> {
        self.record(PlanAction::OnlyVersion, Dependency::new(name, version), None);
        Ok(())
    }
}
