//! Forward resolution events to `tracing`

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Logs each event at info or debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Classified { kind } => {
                info!(deployment = %kind, "Deployment model classified");
            }
            ProgressEvent::SearchingVersions { source } => {
                debug!(source = %source, "Looking for versions");
            }
            ProgressEvent::VersionsRequired {
                dependency,
                versions,
            } => {
                info!(dependency = %dependency, ?versions, "Required versions");
            }
            ProgressEvent::VersionNotDeclared { dependency, path } => {
                debug!(
                    dependency = %dependency,
                    path = %path.display(),
                    "No version declared in project file"
                );
            }
            ProgressEvent::AlreadyInstalled {
                dependency,
                version,
                path,
            } => {
                info!(
                    dependency = %dependency,
                    version = %version,
                    path = %path.display(),
                    "Using installed framework"
                );
            }
            ProgressEvent::Installing {
                dependency,
                version,
            } => {
                info!(dependency = %dependency, version = %version, "Installing");
            }
            ProgressEvent::StartCommandResolved { command } => {
                if command.is_empty() {
                    warn!("No executable or assembly found to start the app");
                } else {
                    debug!(command = %command, "Start command resolved");
                }
            }
        }
    }
}
