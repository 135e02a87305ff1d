//! Command-line interface configuration.

use argh::FromArgs;
use std::path::PathBuf;

/// A diagnostic HTTP server for probing routing, restarts and per-replica state.
///
/// Every option falls back to its environment variable, then to a built-in default.
#[derive(Debug, Default, FromArgs)]
pub struct Cli {
    /// listening port (env PORT, default: 8080)
    #[argh(option)]
    pub port: Option<u16>,

    /// path prefix all routes live under (env PREFIX, default: '/')
    #[argh(option)]
    pub prefix: Option<String>,

    /// directory holding templates (env TEMPLATEDIR, default: 'data')
    #[argh(option, long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// directory holding the counter file (env STATEDIR, default: 'state')
    #[argh(option, long = "state-dir")]
    pub state_dir: Option<PathBuf>,

    /// log level, only the first character counts (env LOGLEVEL, default: 'info')
    #[argh(option, long = "log-level")]
    pub log_level: Option<String>,
}
