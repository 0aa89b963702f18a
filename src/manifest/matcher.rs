//! Floating-version matching against a catalog of concrete versions.
//!
//! A pattern is `major.minor.patch` where the patch component may be a
//! wildcard (`x`, `X` or `*`). Matching picks the highest released
//! (non pre-release) catalog version with the same major and minor, and
//! the same patch when the pattern pins one.

use super::Manifest;
use crate::error::{ResolveError, Result};
use semver::Version;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionPattern {
    pub major: u64,
    pub minor: u64,
    pub patch: Option<u64>,
}

impl VersionPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = || ResolveError::InvalidVersion {
            version: pattern.to_string(),
        };

        let parts: Vec<&str> = pattern.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let (major, minor) = major_minor(pattern, parts[0], parts[1])?;
        let patch = match parts[2] {
            "x" | "X" | "*" => None,
            p => Some(p.parse::<u64>().map_err(|_| invalid())?),
        };

        Ok(Self {
            major,
            minor,
            patch,
        })
    }

    /// `major.minor.*` of any three-part version.
    ///
    /// Whatever sits after the second dot is discarded, so pre-release
    /// suffixes such as `2.1.0-rc1-final` float like `2.1.0`.
    pub fn floating_from(version: &str) -> Result<Self> {
        let mut parts = version.trim().splitn(3, '.');
        let (Some(major), Some(minor), Some(_)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ResolveError::InvalidVersion {
                version: version.to_string(),
            });
        };

        let (major, minor) = major_minor(version, major, minor)?;
        Ok(Self {
            major,
            minor,
            patch: None,
        })
    }

    pub fn is_floating(&self) -> bool {
        self.patch.is_none()
    }

    pub fn matches(&self, version: &Version) -> bool {
        version.pre.is_empty()
            && version.major == self.major
            && version.minor == self.minor
            && self.patch.map_or(true, |p| version.patch == p)
    }
}

fn major_minor(version: &str, major: &str, minor: &str) -> Result<(u64, u64)> {
    match (major.parse::<u64>(), minor.parse::<u64>()) {
        (Ok(major), Ok(minor)) => Ok((major, minor)),
        _ => Err(ResolveError::InvalidVersion {
            version: version.to_string(),
        }),
    }
}

impl fmt::Display for VersionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}.x", self.major, self.minor),
        }
    }
}

/// Highest catalog version matching `pattern`.
///
/// `name` only feeds the error message.
pub fn find_matching_version<S: AsRef<str>>(
    name: &str,
    pattern: &VersionPattern,
    versions: &[S],
) -> Result<String> {
    versions
        .iter()
        .filter_map(|raw| {
            let raw = raw.as_ref();
            Version::parse(raw).ok().map(|parsed| (parsed, raw))
        })
        .filter(|(parsed, _)| pattern.matches(parsed))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, raw)| raw.to_string())
        .ok_or_else(|| ResolveError::NoMatchingVersion {
            name: name.to_string(),
            pattern: pattern.to_string(),
        })
}

/// Float the patch of `version` and pick the newest catalog entry for `name`.
///
/// Only major and minor have to be numeric; the third component is replaced
/// whatever it holds (`X.Y.Z`, `X.Y.*`, `X.Y.Z-rc1`).
pub fn latest_patch(manifest: &dyn Manifest, name: &str, version: &str) -> Result<String> {
    let pattern = VersionPattern::floating_from(version)?;
    let versions = manifest.all_dependency_versions(name);
    find_matching_version(name, &pattern, &versions)
}

/// Resolve a declared framework version, honouring `applyPatches`.
///
/// An absent flag means patches are applied. Turning patches off only pins a
/// concrete `X.Y.Z`; a floating `X.Y.*` still has to be matched.
pub fn find_matching_framework_version(
    manifest: &dyn Manifest,
    name: &str,
    version: &str,
    apply_patches: Option<bool>,
) -> Result<String> {
    // TODO: roll-forward-on-no-candidate-fx (0, 1, 2) would widen the search to later minors
    let floating = VersionPattern::parse(version).is_ok_and(|p| p.is_floating());
    if apply_patches.unwrap_or(true) || floating {
        latest_patch(manifest, name, version)
    } else {
        Ok(version.to_string())
    }
}
