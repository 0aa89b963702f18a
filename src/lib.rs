//! dotnet-deploy - .NET deployment classification and framework resolution
//!
//! Given an application directory, this crate works out how the app is
//! deployed, which shared frameworks it needs and how to start it:
//!
//! - a published app with a framework in its `*.runtimeconfig.json` is
//!   framework-dependent and gets the ASP.NET Core and base runtime versions
//!   it was built against, patched to the newest available release,
//! - a published app without one is self-contained and needs nothing,
//! - an unpublished app is read from its project file, `*.deps.json` or the
//!   restored NuGet packages.
//!
//! Installing, downloading and the version catalog stay behind the
//! [`Installer`] and [`Manifest`] traits so that the resolvers can run
//! against a real buildpack or a dry-run [`InstallPlan`].
//!
//! # Example
//!
//! ```no_run
//! use dotnet_deploy::{DeploymentResolver, InstallPlan, Project, RealFileSystem, StaticManifest};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = StaticManifest::from_file(&PathBuf::from("manifest.yml"))?;
//! let project = Arc::new(Project::new(
//!     PathBuf::from("/tmp/app"),
//!     PathBuf::from("/tmp/deps/0"),
//!     "0",
//!     Arc::new(RealFileSystem),
//!     Arc::new(manifest),
//! ));
//!
//! let plan = Arc::new(InstallPlan::new());
//! let model = DeploymentResolver::new(project.clone(), plan.clone(), None).resolve()?;
//! println!("{} -> {:?}", model.kind(), plan.installed());
//! println!("start: {}", project.start_command()?);
//! # Ok(())
//! # }
//! ```

pub mod aspnetcore;
pub mod cli;
pub mod config;
pub mod deployment;
pub mod error;
pub mod fs;
pub mod installer;
pub mod manifest;
pub mod progress;
pub mod project;
pub mod util;

pub use aspnetcore::AspNetCoreResolver;
pub use config::{ConfigError, DeployConfig};
pub use deployment::{classify, DeploymentModel, DeploymentResolver, RuntimeConfig};
pub use error::{ResolveError, Result};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use installer::{Dependency, InstallPlan, Installer};
pub use manifest::{Manifest, StaticManifest};
pub use progress::{LoggingHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use project::Project;
pub use util::{init_from_env, init_logging, LoggingConfig};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");
