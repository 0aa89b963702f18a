use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Deployment classification and framework resolution for .NET apps
#[derive(Parser, Debug)]
#[command(
    name = "dotnet-deploy",
    about = "Deployment classification and framework resolution for .NET apps",
    version,
    author,
    long_about = "dotnet-deploy inspects a .NET application directory, decides whether it is \
                  framework-dependent, self-contained or still source, and works out which \
                  ASP.NET Core and runtime versions it needs and how to start it."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Classify the deployment and report the app entry point",
        long_about = "Reports the deployment model, main project path, publish state, \
                      F# flag and start command of an application.\n\n\
                      Examples:\n  \
                      dotnet-deploy detect --build-dir /tmp/app\n  \
                      dotnet-deploy detect --format json"
    )]
    Detect(ProjectArgs),

    #[command(
        about = "List the shared frameworks that would be installed",
        long_about = "Runs the ASP.NET Core and deployment-model resolvers against a dry-run \
                      installer and prints every install request.\n\n\
                      Examples:\n  \
                      dotnet-deploy plan --build-dir /tmp/app --manifest manifest.yml\n  \
                      dotnet-deploy plan --deps-dir /tmp/deps --deps-idx 1 --format yaml"
    )]
    Plan(ProjectArgs),

    #[command(about = "Print the command that starts the app")]
    StartCommand(ProjectArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ProjectArgs {
    #[arg(
        long,
        value_name = "DIR",
        help = "Application directory (defaults to DOTNET_DEPLOY_BUILD_DIR or the current directory)"
    )]
    pub build_dir: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Root of the buildpack dependency directories")]
    pub deps_dir: Option<PathBuf>,

    #[arg(long, value_name = "INDEX", help = "Index of this buildpack under the deps root")]
    pub deps_idx: Option<String>,

    #[arg(
        short = 'm',
        long,
        value_name = "FILE",
        help = "Buildpack manifest.yml listing the installable versions"
    )]
    pub manifest: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
