use dotnet_deploy::{InstallPlan, Project, RealFileSystem, StaticManifest};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const DEPS_IDX: &str = "0";

/// Build dir and deps dir laid out in a temporary directory:
/// `<tmp>/build` and `<tmp>/deps/0`
#[allow(dead_code)]
pub struct Fixture {
    temp: TempDir,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(temp.path().join("build")).expect("Failed to create build dir");
        fs::create_dir_all(temp.path().join("deps").join(DEPS_IDX))
            .expect("Failed to create dep dir");
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn build_dir(&self) -> PathBuf {
        self.temp.path().join("build")
    }

    pub fn deps_dir(&self) -> PathBuf {
        self.temp.path().join("deps")
    }

    pub fn dep_dir(&self) -> PathBuf {
        self.deps_dir().join(DEPS_IDX)
    }

    /// Write a file relative to the build dir
    pub fn build_file(&self, relative: &str, content: &str) -> PathBuf {
        write(&self.build_dir().join(relative), content)
    }

    /// Write a file relative to the dep dir
    pub fn dep_file(&self, relative: &str, content: &str) -> PathBuf {
        write(&self.dep_dir().join(relative), content)
    }

    pub fn dep_subdir(&self, relative: &str) -> PathBuf {
        let path = self.dep_dir().join(relative);
        fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    pub fn project(&self, manifest: StaticManifest) -> Arc<Project> {
        Arc::new(Project::new(
            self.build_dir(),
            self.dep_dir(),
            DEPS_IDX,
            Arc::new(RealFileSystem),
            Arc::new(manifest),
        ))
    }
}

fn write(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, content).expect("Failed to write file");
    path.to_path_buf()
}

#[allow(dead_code)]
pub fn installed(plan: &InstallPlan) -> Vec<(String, String)> {
    plan.installed()
        .into_iter()
        .map(|d| (d.name, d.version))
        .collect()
}

#[allow(dead_code)]
pub fn pair(name: &str, version: &str) -> (String, String) {
    (name.to_string(), version.to_string())
}

#[allow(dead_code)]
pub fn runtime_config(name: &str, version: &str, apply_patches: Option<bool>) -> String {
    let apply_patches = match apply_patches {
        Some(value) => format!(", \"applyPatches\": {}", value),
        None => String::new(),
    };
    format!(
        r#"{{"runtimeOptions": {{"framework": {{"name": "{}", "version": "{}"}}{}}}}}"#,
        name, version, apply_patches
    )
}
