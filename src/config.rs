//! Runtime configuration resolved once at startup.

use std::path::PathBuf;

use crate::cli::Cli;

/// Address every listener binds to; only the port is configurable.
pub const LISTENING_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: &str = "8080";
pub const DEFAULT_PREFIX: &str = "";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_SECRET: &str = "secret";
pub const DEFAULT_SENSITIVE_INFO: &str = "sensitive information";
pub const DEFAULT_TEMPLATE_DIR: &str = "data";
pub const DEFAULT_STATE_DIR: &str = "state";

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reads `name` from the process environment, falling back to `default`
/// when the variable is unset or empty.
pub fn get_env_default(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// URL path prefix under which every route is served.
///
/// Always starts and ends with a single `/` and never contains `//`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePath(String);

impl BasePath {
    /// Normalizes a raw, possibly sloppy prefix such as `demo/`, `/demo//` or `""`.
    pub fn new(raw: &str) -> Self {
        let inner = raw.trim_matches('/');
        if inner.is_empty() {
            return Self("/".to_string());
        }
        let mut path = String::with_capacity(inner.len() + 2);
        path.push('/');
        for segment in inner.split('/').filter(|s| !s.is_empty()) {
            path.push_str(segment);
            path.push('/');
        }
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BasePath {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl std::fmt::Display for BasePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully resolved settings: command-line flag, then environment, then default.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub base_path: BasePath,
    pub log_level: String,
    pub secret: String,
    pub sensitive_info: String,
    pub template_dir: PathBuf,
    pub state_dir: PathBuf,
}

/// Error for a `PORT`/`--port` value that is not a TCP port.
#[derive(Debug, thiserror::Error)]
#[error("invalid port \"{0}\"")]
pub struct InvalidPort(pub String);

impl Config {
    pub fn resolve(cli: &Cli) -> Result<Self, InvalidPort> {
        let port = match cli.port {
            Some(port) => port,
            None => {
                let raw = get_env_default("PORT", DEFAULT_PORT);
                raw.parse().map_err(|_| InvalidPort(raw))?
            }
        };

        let prefix = cli
            .prefix
            .clone()
            .unwrap_or_else(|| get_env_default("PREFIX", DEFAULT_PREFIX));

        Ok(Self {
            port,
            base_path: BasePath::new(&prefix),
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| get_env_default("LOGLEVEL", DEFAULT_LOG_LEVEL)),
            secret: get_env_default("SECRETPASSWD", DEFAULT_SECRET),
            sensitive_info: get_env_default("SENSITIVEINFO", DEFAULT_SENSITIVE_INFO),
            template_dir: cli
                .template_dir
                .clone()
                .unwrap_or_else(|| get_env_default("TEMPLATEDIR", DEFAULT_TEMPLATE_DIR).into()),
            state_dir: cli
                .state_dir
                .clone()
                .unwrap_or_else(|| get_env_default("STATEDIR", DEFAULT_STATE_DIR).into()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", LISTENING_HOST, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            base_path: BasePath::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            secret: DEFAULT_SECRET.to_string(),
            sensitive_info: DEFAULT_SENSITIVE_INFO.to_string(),
            template_dir: DEFAULT_TEMPLATE_DIR.into(),
            state_dir: DEFAULT_STATE_DIR.into(),
        }
    }
}
