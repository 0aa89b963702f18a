//! Start command resolution

use super::scanner::RUNTIME_CONFIG_SUFFIX;
use super::Project;
use crate::error::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static PROJECT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[a-z]+proj$").unwrap());

/// Directory under the dep dir that `dotnet publish` writes to before release
pub const PUBLISH_DIR: &str = "dotnet_publish";

impl Project {
    /// Launch command for the app, or an empty string when nothing runnable exists.
    ///
    /// A native executable wins over `<name>.dll` and is made executable.
    pub fn start_command(&self) -> Result<String> {
        self.resolve_start_command(true)
    }

    /// Same lookup as [`Project::start_command`] without touching file permissions
    pub fn peek_start_command(&self) -> Result<String> {
        self.resolve_start_command(false)
    }

    fn resolve_start_command(&self, make_runnable: bool) -> Result<String> {
        let Some(main_path) = self.main_path()? else {
            return Ok(String::new());
        };

        let name = self.app_name(&main_path)?;
        self.published_start_command(&name, make_runnable)
    }

    fn app_name(&self, main_path: &Path) -> Result<String> {
        let file_name = main_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(stem) = file_name.strip_suffix(RUNTIME_CONFIG_SUFFIX) {
            return Ok(stem.to_string());
        }

        if PROJECT_SUFFIX.is_match(&file_name) {
            let name = self
                .assembly_name(main_path)?
                .unwrap_or_else(|| file_name.clone());
            return Ok(PROJECT_SUFFIX.replace(&name, "").into_owned());
        }

        Ok(file_name)
    }

    fn published_start_command(&self, name: &str, make_runnable: bool) -> Result<String> {
        let (publish_dir, prefix) = if self.is_published()? {
            (self.build_dir().to_path_buf(), "${HOME}".to_string())
        } else {
            (
                self.dep_dir().join(PUBLISH_DIR),
                format!("${{DEPS_DIR}}/{}/{}", self.deps_idx(), PUBLISH_DIR),
            )
        };

        let executable = publish_dir.join(name);
        if self.fs().is_file(&executable) {
            if make_runnable {
                self.fs().set_executable(&executable)?;
            }
            return Ok(format!("{}/{}", prefix, name));
        }

        let assembly = format!("{}.dll", name);
        if self.fs().is_file(&publish_dir.join(&assembly)) {
            return Ok(format!("{}/{}", prefix, assembly));
        }

        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::manifest::StaticManifest;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn project(fs: &Arc<MockFileSystem>) -> Project {
        Project::new(
            PathBuf::from("/mock/build"),
            PathBuf::from("/mock/deps/3"),
            "3",
            fs.clone(),
            Arc::new(StaticManifest::new()),
        )
    }

    #[test]
    fn test_published_executable_is_made_runnable() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file("build/fred.runtimeconfig.json", "");
        fs.add_file("build/fred", "");
        fs.add_file("build/fred.dll", "");

        assert_eq!(project(&fs).start_command().unwrap(), "${HOME}/fred");
        assert_eq!(fs.mode("build/fred"), Some(0o755));
    }

    #[test]
    fn test_peek_leaves_executable_untouched() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file("build/fred.runtimeconfig.json", "");
        fs.add_file("build/fred", "");

        assert_eq!(project(&fs).peek_start_command().unwrap(), "${HOME}/fred");
        assert_eq!(fs.mode("build/fred"), Some(0o644));
    }

    #[test]
    fn test_published_dll() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file("build/fred.runtimeconfig.json", "");
        fs.add_file("build/fred.dll", "");

        assert_eq!(project(&fs).start_command().unwrap(), "${HOME}/fred.dll");
    }

    #[test]
    fn test_published_nothing_runnable() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file("build/fred.runtimeconfig.json", "");

        assert_eq!(project(&fs).start_command().unwrap(), "");
    }

    #[test]
    fn test_unpublished_uses_publish_dir() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file("build/src/fred/fred.csproj", "<Project />");
        fs.add_file("deps/3/dotnet_publish/fred.dll", "");

        assert_eq!(
            project(&fs).start_command().unwrap(),
            "${DEPS_DIR}/3/dotnet_publish/fred.dll"
        );
    }

    #[test]
    fn test_unpublished_assembly_name_wins() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file(
            "build/app.fsproj",
            "<Project><PropertyGroup><AssemblyName>f.red.fsproj</AssemblyName></PropertyGroup></Project>",
        );
        fs.add_file("deps/3/dotnet_publish/f.red", "");

        assert_eq!(
            project(&fs).start_command().unwrap(),
            "${DEPS_DIR}/3/dotnet_publish/f.red"
        );
        assert_eq!(fs.mode("deps/3/dotnet_publish/f.red"), Some(0o755));
    }

    #[test]
    fn test_unpublished_nothing_runnable() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file("build/fred.csproj", "<Project />");
        fs.add_dir("deps/3/dotnet_publish");

        assert_eq!(project(&fs).start_command().unwrap(), "");
    }

    #[test]
    fn test_no_project_at_all() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_dir("build");

        assert_eq!(project(&fs).start_command().unwrap(), "");
    }
}
