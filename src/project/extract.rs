//! Version and metadata extraction from project files and build outputs

use crate::error::{ResolveError, Result};
use crate::fs::FileSystem;
use crate::manifest::{latest_patch, Manifest};
use regex::Regex;
use roxmltree::Document;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// `<RuntimeFrameworkVersion>2.1.*</RuntimeFrameworkVersion>`
pub static RUNTIME_FRAMEWORK_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<RuntimeFrameworkVersion>\s*(.*?)\s*</RuntimeFrameworkVersion>").unwrap()
});

/// `"Microsoft.AspNetCore.App" Version="2.1.7"`, either metapackage
pub static ASPNETCORE_VERSION_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""Microsoft\.AspNetCore\.(?:App|All)"\s+Version="([^"]*)""#).unwrap()
});

/// A full `<PackageReference Include="Microsoft.AspNetCore.App" Version="..." />` element
pub static ASPNETCORE_PACKAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<PackageReference\s+Include="Microsoft\.AspNetCore\.(?:App|All)"\s+Version="([^"]*)"\s*/>"#,
    )
    .unwrap()
});

static ASPNETCORE_LIBRARY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Microsoft\.AspNetCore\.App/(\d+\.\d+\.\d+)$").unwrap());

/// Version declared in a project file.
///
/// `None` when `pattern` does not match, so the caller can try the next
/// source. A trailing `*` floats the version to the newest catalog patch.
pub fn version_from_proj_file(
    fs: &dyn FileSystem,
    manifest: &dyn Manifest,
    path: &Path,
    pattern: &Regex,
    name: &str,
) -> Result<Option<String>> {
    let content = fs.read_to_string(path)?;

    let Some(version) = pattern
        .captures(&content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
    else {
        return Ok(None);
    };

    if version.ends_with('*') {
        return latest_patch(manifest, name, version).map(Some);
    }

    Ok(Some(version.to_string()))
}

#[derive(Debug, Deserialize)]
struct DepsManifest {
    #[serde(default)]
    libraries: BTreeMap<String, IgnoredAny>,
}

/// Pinned `Microsoft.AspNetCore.App` version from a `*.deps.json` file
pub fn version_from_deps_json(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let content = fs.read_to_string(path)?;
    let deps: DepsManifest =
        serde_json::from_str(&content).map_err(|source| ResolveError::MalformedJson {
            path: path.to_path_buf(),
            source,
        })?;

    deps.libraries
        .keys()
        .find_map(|key| ASPNETCORE_LIBRARY_KEY.captures(key))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ResolveError::MissingAspNetCoreLibrary {
            path: path.to_path_buf(),
        })
}

/// Versions restored under `<dep_dir>/.nuget/packages/<package>/`.
///
/// Each version directory is floated to the newest catalog patch of `name`;
/// the result is sorted and free of duplicates. A directory the catalog
/// cannot match means nothing usable was restored, so the whole result is
/// empty rather than an error.
pub fn versions_from_restored_packages(
    fs: &dyn FileSystem,
    manifest: &dyn Manifest,
    dep_dir: &Path,
    package: &str,
    name: &str,
) -> Result<Vec<String>> {
    let dir = dep_dir.join(".nuget").join("packages").join(package);
    if !fs.is_dir(&dir) {
        return Ok(Vec::new());
    }

    let mut versions = BTreeSet::new();
    for entry in fs.list_dir(&dir)? {
        if !entry.is_dir() {
            continue;
        }
        match latest_patch(manifest, name, &entry.name()) {
            Ok(version) => {
                versions.insert(version);
            }
            Err(e @ (ResolveError::NoMatchingVersion { .. } | ResolveError::InvalidVersion { .. })) => {
                debug!(package, error = %e, "Restored package version has no catalog match");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(versions.into_iter().collect())
}

/// `<PropertyGroup><AssemblyName>` of a project file, if declared
pub fn assembly_name(fs: &dyn FileSystem, path: &Path) -> Result<Option<String>> {
    let content = fs.read_to_string(path)?;
    let doc = Document::parse(content.trim_start_matches('\u{feff}')).map_err(|source| {
        ResolveError::MalformedXml {
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(doc
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("PropertyGroup"))
        .flat_map(|group| group.children())
        .find(|node| node.has_tag_name("AssemblyName"))
        .and_then(|node| node.text())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string))
}
