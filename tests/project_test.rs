//! Project inspection against a real directory tree

mod support;

use dotnet_deploy::project::extract::{ASPNETCORE_PACKAGE_REFERENCE, RUNTIME_FRAMEWORK_VERSION};
use dotnet_deploy::{ResolveError, StaticManifest};
use support::Fixture;

#[test]
fn test_project_files_skip_staging_dir_at_any_depth() {
    let fixture = Fixture::new();
    fixture.build_file("first.csproj", "");
    fixture.build_file("dir/second.csproj", "");
    fixture.build_file("a/b/first.vbproj", "");
    fixture.build_file("b/c/first.fsproj", "");
    fixture.build_file("other.txt", "");
    fixture.build_file(".cloudfoundry/other.csproj", "");
    fixture.build_file("dir/.cloudfoundry/nested.fsproj", "");

    let project = fixture.project(StaticManifest::new());
    let paths = project.project_file_paths().unwrap();

    let build_dir = fixture.build_dir();
    assert_eq!(
        paths,
        vec![
            build_dir.join("a/b/first.vbproj"),
            build_dir.join("b/c/first.fsproj"),
            build_dir.join("dir/second.csproj"),
            build_dir.join("first.csproj"),
        ]
    );
    assert!(project.is_fsharp().unwrap());
}

#[test]
fn test_main_path_uses_deployment_file_with_multiple_projects() {
    let fixture = Fixture::new();
    fixture.build_file("first.csproj", "");
    fixture.build_file("a/b/first.vbproj", "");
    let project = fixture.project(StaticManifest::new());

    let err = project.main_path().unwrap_err();
    assert!(matches!(err, ResolveError::MultipleProjectFiles { .. }));
    assert!(err.to_string().contains("no .deployment file was used"));

    fixture.build_file(".deployment", "[config]\nproject = ./a/b/first.vbproj\n");
    assert_eq!(
        project.main_path().unwrap(),
        Some(fixture.build_dir().join("a/b/first.vbproj"))
    );
}

#[test]
fn test_main_path_prefers_runtime_config() {
    let fixture = Fixture::new();
    fixture.build_file("first.csproj", "");
    fixture.build_file("second.csproj", "");
    let runtime_config = fixture.build_file("app.runtimeconfig.json", "{}");

    let project = fixture.project(StaticManifest::new());
    assert_eq!(project.main_path().unwrap(), Some(runtime_config));
    assert!(project.is_published().unwrap());
}

#[test]
fn test_multiple_runtime_configs_are_ambiguous() {
    let fixture = Fixture::new();
    fixture.build_file("a.runtimeconfig.json", "{}");
    fixture.build_file("b.runtimeconfig.json", "{}");

    let project = fixture.project(StaticManifest::new());
    assert!(matches!(
        project.runtime_config_file(),
        Err(ResolveError::MultipleRuntimeConfigs { .. })
    ));
    assert!(project.main_path().is_err());
}

#[test]
fn test_version_from_deps_json() {
    let fixture = Fixture::new();
    fixture.build_file(
        "app.deps.json",
        r#"{
          "runtimeTarget": { "name": ".NETCoreApp,Version=v2.1" },
          "libraries": {
            "app/1.0.0": { "type": "project" },
            "Microsoft.AspNetCore.App/2.1.1": { "type": "package", "sha512": "sha512-abc" }
          }
        }"#,
    );

    let project = fixture.project(StaticManifest::new());
    assert_eq!(project.version_from_deps_json().unwrap(), "2.1.1");
}

#[test]
fn test_version_from_deps_json_without_aspnetcore_key() {
    let fixture = Fixture::new();
    fixture.build_file(
        "app.deps.json",
        r#"{"libraries": {"Newtonsoft.Json/11.0.2": {"type": "package"}}}"#,
    );

    let project = fixture.project(StaticManifest::new());
    assert!(matches!(
        project.version_from_deps_json(),
        Err(ResolveError::MissingAspNetCoreLibrary { .. })
    ));
}

#[test]
fn test_version_from_deps_json_needs_exactly_one_file() {
    let fixture = Fixture::new();
    let project = fixture.project(StaticManifest::new());
    assert!(matches!(
        project.version_from_deps_json(),
        Err(ResolveError::DepsJsonNotUnique { count: 0 })
    ));

    fixture.build_file("a.deps.json", "{}");
    fixture.build_file("b.deps.json", "{}");
    assert!(matches!(
        project.version_from_deps_json(),
        Err(ResolveError::DepsJsonNotUnique { count: 2 })
    ));
}

#[test]
fn test_version_from_proj_file() {
    let fixture = Fixture::new();
    let path = fixture.build_file(
        "foo.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk.Web">
  <PropertyGroup>
    <TargetFramework>netcoreapp2.1</TargetFramework>
    <RuntimeFrameworkVersion>2.1.*</RuntimeFrameworkVersion>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Microsoft.AspNetCore.App" Version="6.7.8" />
  </ItemGroup>
</Project>"#,
    );

    let manifest = StaticManifest::new().with_versions("dotnet-runtime", &["2.1.2", "2.1.6"]);
    let project = fixture.project(manifest);

    assert_eq!(
        project
            .version_from_proj_file(&path, &ASPNETCORE_PACKAGE_REFERENCE, "dotnet-aspnetcore")
            .unwrap()
            .as_deref(),
        Some("6.7.8")
    );
    assert_eq!(
        project
            .version_from_proj_file(&path, &RUNTIME_FRAMEWORK_VERSION, "dotnet-runtime")
            .unwrap()
            .as_deref(),
        Some("2.1.6")
    );
}

#[test]
fn test_start_command_published_executable() {
    let fixture = Fixture::new();
    fixture.build_file("fred.runtimeconfig.json", "");
    let executable = fixture.build_file("fred", "");
    fixture.build_file("fred.dll", "");

    let project = fixture.project(StaticManifest::new());
    assert_eq!(project.start_command().unwrap(), "${HOME}/fred");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&executable).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[test]
fn test_start_command_unpublished_dll() {
    let fixture = Fixture::new();
    fixture.build_file("fred.csproj", "<Project Sdk=\"Microsoft.NET.Sdk\" />");
    fixture.dep_file("dotnet_publish/fred.dll", "");

    let project = fixture.project(StaticManifest::new());
    assert_eq!(
        project.start_command().unwrap(),
        "${DEPS_DIR}/0/dotnet_publish/fred.dll"
    );
}

#[test]
fn test_start_command_uses_assembly_name() {
    let fixture = Fixture::new();
    fixture.build_file(
        "src/web/web.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk.Web">
  <PropertyGroup>
    <AssemblyName>f.red.csproj</AssemblyName>
  </PropertyGroup>
</Project>"#,
    );
    fixture.dep_file("dotnet_publish/f.red.dll", "");

    let project = fixture.project(StaticManifest::new());
    assert_eq!(
        project.start_command().unwrap(),
        "${DEPS_DIR}/0/dotnet_publish/f.red.dll"
    );
}

#[test]
fn test_start_command_empty_when_nothing_runnable() {
    let fixture = Fixture::new();
    fixture.build_file("fred.runtimeconfig.json", "");
    let project = fixture.project(StaticManifest::new());
    assert_eq!(project.start_command().unwrap(), "");

    let fixture = Fixture::new();
    fixture.build_file("fred.csproj", "<Project />");
    fixture.dep_subdir("dotnet_publish");
    let project = fixture.project(StaticManifest::new());
    assert_eq!(project.start_command().unwrap(), "");
}
