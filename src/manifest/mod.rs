//! Catalog of installable dependency versions
//!
//! The catalog is owned by the buildpack manifest. This module only needs the
//! list of concrete versions per dependency name, which it reads from a
//! `manifest.yml` or builds in memory.

pub mod matcher;

pub use matcher::{
    find_matching_framework_version, find_matching_version, latest_patch, VersionPattern,
};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Source of available dependency versions
pub trait Manifest: Send + Sync {
    /// All concrete versions known for `name`, in no particular order
    fn all_dependency_versions(&self, name: &str) -> Vec<String>;
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    dependencies: Vec<ManifestDependency>,
}

#[derive(Debug, Deserialize)]
struct ManifestDependency {
    name: String,
    version: String,
}

/// In-memory catalog, optionally loaded from a buildpack `manifest.yml`
#[derive(Debug, Default, Clone)]
pub struct StaticManifest {
    versions: BTreeMap<String, Vec<String>>,
}

impl StaticManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions<S: AsRef<str>>(mut self, name: &str, versions: &[S]) -> Self {
        for version in versions {
            self.add_version(name, version.as_ref());
        }
        self
    }

    pub fn add_version(&mut self, name: &str, version: &str) {
        let entry = self.versions.entry(name.to_string()).or_default();
        if !entry.iter().any(|v| v == version) {
            entry.push(version.to_string());
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ManifestFile =
            serde_yaml::from_str(content).context("Failed to parse manifest YAML")?;

        let mut manifest = Self::new();
        for dep in file.dependencies {
            manifest.add_version(&dep.name, &dep.version);
        }
        Ok(manifest)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read manifest {:?}", path))?;
        Self::from_yaml_str(&content).context(format!("Invalid manifest {:?}", path))
    }

    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }
}

impl Manifest for StaticManifest {
    fn all_dependency_versions(&self, name: &str) -> Vec<String> {
        self.versions.get(name).cloned().unwrap_or_default()
    }
}
