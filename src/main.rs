//! Diagnostic HTTP server for container orchestration environments.
//!
//! Startup order:
//! - Resolve configuration (flags, then environment, then defaults)
//! - Initialize logging at the configured level
//! - Snapshot the environment for templates
//! - Bind and serve every route under the configured prefix

use k8s_demo_rs::{
    cli::Cli,
    config::{APP_NAME, APP_VERSION, Config},
    env::EnvSnapshot,
    handlers::router,
    lifecycle::Lifecycle,
    logging,
    state::AppState,
};
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Cli = argh::from_env();
    let config = Config::resolve(&args)?;

    logging::init(&config.log_level);
    info!("\"{}\" version {} starting...", APP_NAME, APP_VERSION);
    debug!("SECRETPASSWD: \"{}\" (do not tell anyone!)", config.secret);
    debug!("SENSITIVEINFO: \"{}\" (do not tell anyone!)", config.sensitive_info);
    debug!("TEMPLATEDIR: \"{}\"", config.template_dir.display());
    debug!("STATEDIR: \"{}\"", config.state_dir.display());

    let env = EnvSnapshot::capture();
    let state = Arc::new(AppState::new(&config, env, Lifecycle::new()));
    let app = router(state);

    let bind = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(
        "Listening on {} with prefix \"{}\" (Base URL: http://*:{}{})",
        bind, config.base_path, config.port, config.base_path
    );

    axum::serve(listener, app).await?;
    Ok(())
}
