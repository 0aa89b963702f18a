//! `*.runtimeconfig.json` model

use crate::error::{ResolveError, Result};
use crate::fs::FileSystem;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    #[serde(default)]
    pub runtime_options: RuntimeOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeOptions {
    #[serde(default)]
    pub framework: Framework,
    /// Absent means patches are applied
    #[serde(default)]
    pub apply_patches: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Framework {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

impl RuntimeConfig {
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content.trim_start_matches('\u{feff}'))
    }

    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs.read_to_string(path)?;
        Self::parse(&content).map_err(|source| ResolveError::MalformedJson {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn framework(&self) -> &Framework {
        &self.runtime_options.framework
    }

    pub fn apply_patches(&self) -> Option<bool> {
        self.runtime_options.apply_patches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use yare::parameterized;

    #[test]
    fn test_parse_framework_dependent() {
        let config = RuntimeConfig::parse(
            r#"{
              "runtimeOptions": {
                "tfm": "netcoreapp2.1",
                "framework": { "name": "Microsoft.AspNetCore.App", "version": "2.1.1" },
                "applyPatches": false,
                "configProperties": { "System.GC.Server": true }
              }
            }"#,
        )
        .unwrap();

        assert_eq!(config.framework().name, "Microsoft.AspNetCore.App");
        assert_eq!(config.framework().version, "2.1.1");
        assert_eq!(config.apply_patches(), Some(false));
    }

    #[parameterized(
        absent = { r#"{"runtimeOptions": {}}"#, None },
        null = { r#"{"runtimeOptions": {"applyPatches": null}}"#, None },
        explicit_true = { r#"{"runtimeOptions": {"applyPatches": true}}"#, Some(true) },
    )]
    fn test_apply_patches_tri_state(content: &str, expected: Option<bool>) {
        assert_eq!(RuntimeConfig::parse(content).unwrap().apply_patches(), expected);
    }

    #[test]
    fn test_parse_self_contained() {
        let config =
            RuntimeConfig::parse(r#"{"runtimeOptions": {"configProperties": {}}}"#).unwrap();
        assert!(config.framework().name.is_empty());

        let config = RuntimeConfig::parse("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_load_malformed() {
        let fs = MockFileSystem::new();
        fs.add_file("app.runtimeconfig.json", "{ not json");

        let err = RuntimeConfig::load(&fs, Path::new("/mock/app.runtimeconfig.json")).unwrap_err();
        assert!(matches!(err, ResolveError::MalformedJson { .. }));
        assert!(err.to_string().contains("app.runtimeconfig.json"));
    }
}
