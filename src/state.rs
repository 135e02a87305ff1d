//! Shared server context handed to every request.

use crate::config::{BasePath, Config};
use crate::counter::CounterStore;
use crate::env::EnvSnapshot;
use crate::lifecycle::Lifecycle;
use crate::secret::SecretGate;
use crate::template::TemplateRenderer;

/// Everything a request may touch. Built once at startup; only the counter
/// mutates, behind its own lock.
#[derive(Debug)]
pub struct AppState {
    /// Prefix every route lives under (e.g. "/demo/")
    pub base_path: BasePath,
    /// Port shown in generated example URLs
    pub port: u16,
    pub counter: CounterStore,
    pub secret: SecretGate,
    pub templates: TemplateRenderer,
    pub lifecycle: Lifecycle,
}

impl AppState {
    pub fn new(config: &Config, env: EnvSnapshot, lifecycle: Lifecycle) -> Self {
        Self {
            base_path: config.base_path.clone(),
            port: config.port,
            counter: CounterStore::new(&config.state_dir),
            secret: SecretGate::new(config.secret.clone(), config.sensitive_info.clone()),
            templates: TemplateRenderer::new(config.template_dir.clone(), env),
            lifecycle,
        }
    }
}
