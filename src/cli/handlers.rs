//! Subcommand handlers. Each returns the process exit code.

use super::commands::ProjectArgs;
use super::output::{DetectReport, OutputFormatter, PlanReport};
use crate::aspnetcore::AspNetCoreResolver;
use crate::config::DeployConfig;
use crate::deployment::{classify, DeploymentResolver};
use crate::fs::RealFileSystem;
use crate::installer::{InstallPlan, PlannedInstall};
use crate::manifest::StaticManifest;
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use crate::project::Project;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Environment defaults overridden by whatever was given on the command line
pub fn resolve_config(args: &ProjectArgs) -> DeployConfig {
    let defaults = DeployConfig::default();

    DeployConfig {
        build_dir: args.build_dir.clone().unwrap_or(defaults.build_dir),
        deps_dir: args.deps_dir.clone().unwrap_or(defaults.deps_dir),
        deps_idx: args.deps_idx.clone().unwrap_or(defaults.deps_idx),
        manifest_path: args.manifest.clone().or(defaults.manifest_path),
        ..defaults
    }
}

fn load_project(config: &DeployConfig) -> Result<Arc<Project>> {
    config.validate().context("Invalid configuration")?;
    debug!("Configuration:\n{}", config);

    let manifest = match config.manifest_path {
        Some(ref path) => StaticManifest::from_file(path)?,
        None => {
            warn!("No manifest given, no framework versions are available for patch matching");
            StaticManifest::new()
        }
    };

    Ok(Arc::new(Project::new(
        config.build_dir.clone(),
        config.dep_dir(),
        config.deps_idx.clone(),
        Arc::new(RealFileSystem),
        Arc::new(manifest),
    )))
}

fn finish(result: Result<String>) -> i32 {
    match result {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

pub fn handle_detect(args: &ProjectArgs) -> i32 {
    info!("Classifying .NET deployment");
    finish(run_detect(args))
}

fn run_detect(args: &ProjectArgs) -> Result<String> {
    let config = resolve_config(args);
    let project = load_project(&config)?;

    let report = DetectReport {
        build_dir: config.build_dir.clone(),
        deployment: classify(&project)?,
        main_path: project.main_path()?,
        published: project.is_published()?,
        fsharp: project.is_fsharp()?,
        start_command: project.peek_start_command()?,
    };

    OutputFormatter::new(args.format.into()).format_detect(&report)
}

pub fn handle_plan(args: &ProjectArgs) -> i32 {
    info!("Planning framework installs");
    finish(run_plan(args))
}

fn run_plan(args: &ProjectArgs) -> Result<String> {
    let config = resolve_config(args);
    let project = load_project(&config)?;
    let plan = Arc::new(InstallPlan::new());
    let progress: Arc<dyn ProgressHandler> = Arc::new(LoggingHandler);

    let aspnetcore = AspNetCoreResolver::new(project.clone(), plan.clone(), Some(progress.clone()));
    let aspnetcore_versions = aspnetcore.required_versions()?;
    aspnetcore.install()?;

    let deployment = DeploymentResolver::new(project, plan.clone(), Some(progress)).resolve()?;

    let report = PlanReport {
        deployment,
        aspnetcore_versions,
        installs: dedup_installs(plan.entries()),
    };

    OutputFormatter::new(args.format.into()).format_plan(&report)
}

/// Both resolvers may request the same framework; keep the first request
fn dedup_installs(entries: Vec<PlannedInstall>) -> Vec<PlannedInstall> {
    let mut unique: Vec<PlannedInstall> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !unique.contains(&entry) {
            unique.push(entry);
        }
    }
    unique
}

pub fn handle_start_command(args: &ProjectArgs) -> i32 {
    finish(run_start_command(args))
}

fn run_start_command(args: &ProjectArgs) -> Result<String> {
    let config = resolve_config(args);
    let project = load_project(&config)?;

    let command = project.start_command()?;
    LoggingHandler.on_progress(&ProgressEvent::StartCommandResolved {
        command: command.clone(),
    });

    OutputFormatter::new(args.format.into()).format_start_command(&command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormatArg;
    use crate::installer::{Dependency, PlanAction};
    use serial_test::serial;
    use std::path::PathBuf;

    #[test]
    #[serial]
    fn test_resolve_config_prefers_arguments() {
        let args = ProjectArgs {
            build_dir: Some(PathBuf::from("/tmp/app")),
            deps_dir: Some(PathBuf::from("/tmp/deps")),
            deps_idx: Some("4".to_string()),
            manifest: None,
            format: OutputFormatArg::Human,
        };

        let config = resolve_config(&args);
        assert_eq!(config.build_dir, PathBuf::from("/tmp/app"));
        assert_eq!(config.dep_dir(), PathBuf::from("/tmp/deps/4"));
    }

    #[test]
    fn test_dedup_installs_keeps_order() {
        let entry = |version: &str| PlannedInstall {
            action: PlanAction::Install,
            dependency: Dependency::new("dotnet-aspnetcore", version),
            target: Some(PathBuf::from("/deps/0/dotnet-sdk")),
        };

        let unique = dedup_installs(vec![entry("2.1.7"), entry("2.2.3"), entry("2.1.7")]);
        assert_eq!(unique, vec![entry("2.1.7"), entry("2.2.3")]);
    }
}
