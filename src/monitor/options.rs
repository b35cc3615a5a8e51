//! Monitor construction options.

use crate::config::Config;

/// Monitor configuration options.
pub struct MonitorOptions {
    /// Application configuration.
    pub app_config: Config,
    /// Application version.
    pub version: String,
}
