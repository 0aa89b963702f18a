//! Output formatting for reports
//!
//! Every report can be rendered as JSON, YAML or human-readable text. Logs go
//! to stderr, so JSON and YAML output can be piped as is.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::deployment::DeploymentModel;
use crate::installer::PlannedInstall;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

/// Result of `detect`
#[derive(Debug, Clone, Serialize)]
pub struct DetectReport {
    pub build_dir: PathBuf,
    pub deployment: DeploymentModel,
    pub main_path: Option<PathBuf>,
    pub published: bool,
    pub fsharp: bool,
    pub start_command: String,
}

/// Result of `plan`
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub deployment: DeploymentModel,
    pub aspnetcore_versions: Vec<String>,
    pub installs: Vec<PlannedInstall>,
}

#[derive(Debug, Clone, Serialize)]
struct StartCommandReport<'a> {
    start_command: &'a str,
}

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_detect(&self, report: &DetectReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Yaml => to_yaml(report),
            OutputFormat::Human => Ok(detect_human(report)),
        }
    }

    pub fn format_plan(&self, report: &PlanReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Yaml => to_yaml(report),
            OutputFormat::Human => Ok(plan_human(report)),
        }
    }

    pub fn format_start_command(&self, command: &str) -> Result<String> {
        let report = StartCommandReport {
            start_command: command,
        };
        match self.format {
            OutputFormat::Json => to_json(&report),
            OutputFormat::Yaml => to_yaml(&report),
            OutputFormat::Human => Ok(command.to_string()),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize report to JSON")
}

fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).context("Failed to serialize report to YAML")
}

fn deployment_line(model: &DeploymentModel) -> String {
    match model {
        DeploymentModel::FrameworkDependent {
            framework_name,
            framework_version,
            apply_patches,
        } => {
            let patches = match apply_patches {
                Some(false) => ", patches pinned",
                _ => "",
            };
            format!(
                "{} ({} {}{})",
                model.kind(),
                framework_name,
                framework_version,
                patches
            )
        }
        _ => model.kind().to_string(),
    }
}

fn or_none(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}

fn detect_human(report: &DetectReport) -> String {
    let mut output = String::new();

    output.push_str("\u{2713} .NET Deployment\n");
    output.push_str(RULE);
    output.push_str("\n\n");

    output.push_str(&format!("Build Dir:   {}\n", report.build_dir.display()));
    output.push_str(&format!("Deployment:  {}\n\n", deployment_line(&report.deployment)));

    let main_path = report
        .main_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    output.push_str("Application:\n");
    output.push_str(&format!("\u{251C}\u{2500} Main Path:  {}\n", or_none(&main_path)));
    output.push_str(&format!("\u{251C}\u{2500} Published:  {}\n", report.published));
    output.push_str(&format!("\u{251C}\u{2500} F#:         {}\n", report.fsharp));
    output.push_str(&format!(
        "\u{2514}\u{2500} Start:      {}\n",
        or_none(&report.start_command)
    ));

    output
}

fn plan_human(report: &PlanReport) -> String {
    let mut output = String::new();

    output.push_str("\u{2713} Framework Install Plan\n");
    output.push_str(RULE);
    output.push_str("\n\n");

    output.push_str(&format!("Deployment:  {}\n", deployment_line(&report.deployment)));
    let aspnetcore = report.aspnetcore_versions.join(", ");
    output.push_str(&format!("ASP.NET Core required: {}\n\n", or_none(&aspnetcore)));

    if report.installs.is_empty() {
        output.push_str("Nothing to install\n");
        return output;
    }

    output.push_str("Installs:\n");
    for (i, entry) in report.installs.iter().enumerate() {
        let connector = if i == report.installs.len() - 1 {
            "\u{2514}"
        } else {
            "\u{251C}"
        };
        let target = entry
            .target
            .as_ref()
            .map(|t| format!(" -> {}", t.display()))
            .unwrap_or_default();
        output.push_str(&format!(
            "{}\u{2500} {} {}{}\n",
            connector, entry.dependency.name, entry.dependency.version, target
        ));
    }

    output
}
