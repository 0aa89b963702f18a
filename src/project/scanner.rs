//! Locating project descriptors and build outputs in a build directory

use crate::error::{ResolveError, Result};
use crate::fs::{Entry, FileSystem};
use std::path::{Path, PathBuf};

/// Staging directory the platform keeps inside the build root; never scanned
pub const STAGING_DIR: &str = ".cloudfoundry";

pub const RUNTIME_CONFIG_SUFFIX: &str = ".runtimeconfig.json";
pub const DEPS_JSON_SUFFIX: &str = ".deps.json";
pub const DEPLOYMENT_FILE: &str = ".deployment";

/// Language of a project descriptor, derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    CSharp,
    VisualBasic,
    FSharp,
}

impl ProjectKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "csproj" => Some(Self::CSharp),
            "vbproj" => Some(Self::VisualBasic),
            "fsproj" => Some(Self::FSharp),
            _ => None,
        }
    }
}

/// A project descriptor found in the build tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub path: PathBuf,
    pub kind: ProjectKind,
}

fn is_staging_dir(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == STAGING_DIR)
}

/// All project descriptors under `root`, skipping the staging subtree
pub fn project_descriptors(fs: &dyn FileSystem, root: &Path) -> Result<Vec<ProjectDescriptor>> {
    let files = fs.walk_files(root, &is_staging_dir)?;

    Ok(files
        .into_iter()
        .filter_map(|path| ProjectKind::from_path(&path).map(|kind| ProjectDescriptor { path, kind }))
        .collect())
}

pub fn project_file_paths(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    Ok(project_descriptors(fs, root)?
        .into_iter()
        .map(|d| d.path)
        .collect())
}

/// Files directly inside `dir` whose name ends with `suffix`, sorted
pub fn files_with_suffix(fs: &dyn FileSystem, dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    if !fs.is_dir(dir) {
        return Ok(Vec::new());
    }

    let mut matches: Vec<PathBuf> = fs
        .list_dir(dir)?
        .into_iter()
        .filter(|e| !e.is_dir() && e.name().ends_with(suffix))
        .map(Entry::into_path)
        .collect();
    matches.sort();
    Ok(matches)
}

/// The single `*.runtimeconfig.json` in `build_dir`.
///
/// `None` before publish; more than one is an error.
pub fn runtime_config_file(fs: &dyn FileSystem, build_dir: &Path) -> Result<Option<PathBuf>> {
    let mut paths = files_with_suffix(fs, build_dir, RUNTIME_CONFIG_SUFFIX)?;
    match paths.len() {
        0 => Ok(None),
        1 => Ok(paths.pop()),
        _ => Err(ResolveError::MultipleRuntimeConfigs { paths }),
    }
}

/// The `*.deps.json` in `build_dir`, which must be unique
pub fn deps_json_file(fs: &dyn FileSystem, build_dir: &Path) -> Result<PathBuf> {
    let mut paths = files_with_suffix(fs, build_dir, DEPS_JSON_SUFFIX)?;
    match paths.len() {
        1 => Ok(paths.remove(0)),
        count => Err(ResolveError::DepsJsonNotUnique { count }),
    }
}

/// Project named by `[config] project = ...` in a `.deployment` file
pub fn project_from_deployment_file(
    fs: &dyn FileSystem,
    build_dir: &Path,
    path: &Path,
) -> Result<PathBuf> {
    let content = fs.read_to_string(path)?;
    let malformed = |reason: String| ResolveError::MalformedDeploymentFile {
        path: path.to_path_buf(),
        reason,
    };

    let project = ini_value(&content, "config", "project").map_err(malformed)?;

    // "./src/app.csproj" and "src/app.csproj" both resolve under the build dir
    let relative = project
        .trim_matches('.')
        .trim_start_matches(['/', '\\']);
    if relative.is_empty() {
        return Err(malformed(format!("project '{}' is not a path", project)));
    }

    Ok(build_dir.join(relative))
}

fn ini_value(content: &str, section: &str, key: &str) -> std::result::Result<String, String> {
    let mut current: Option<&str> = None;
    let mut section_found = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim();
            section_found |= name == section;
            current = Some(name);
            continue;
        }

        if current != Some(section) {
            continue;
        }

        if let Some((k, v)) = line.split_once(['=', ':']) {
            if k.trim() == key {
                return Ok(v.trim().trim_matches(['"', '\'']).to_string());
            }
        }
    }

    if section_found {
        Err(format!("key '{}' not found in section '{}'", key, section))
    } else {
        Err(format!("section '{}' does not exist", section))
    }
}
