use dotnet_deploy::cli::commands::{CliArgs, Commands};
use dotnet_deploy::cli::handlers::{handle_detect, handle_plan, handle_start_command};
use dotnet_deploy::util::logging::{self, parse_level, LoggingConfig};
use dotnet_deploy::VERSION;

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("dotnet-deploy v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Detect(project_args) => handle_detect(project_args),
        Commands::Plan(project_args) => handle_plan(project_args),
        Commands::StartCommand(project_args) => handle_start_command(project_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let from_env = logging::config_from_env();

    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        from_env.level
    };

    logging::init_logging(LoggingConfig { level, ..from_env });
}
