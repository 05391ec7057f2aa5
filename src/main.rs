mod config;
mod report;
mod script;
mod session;

use std::time::Duration;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use worker::kernel::EscapeTime;

use crate::config::ExplorerConfig;
use crate::report::JsonLines;
use crate::session::Session;

const INPUT_QUEUE_CAPACITY: usize = 64;
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

fn main() {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }

    let config = match ExplorerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "failed to start async runtime");
            std::process::exit(1);
        }
    };
    runtime.block_on(explore(config));
    // A pending stdin read sits on the blocking pool and would hold up a plain drop.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
}

async fn explore(config: ExplorerConfig) {
    tracing::info!(
        width = config.viewport.width,
        height = config.viewport.height,
        scale = config.view.scale,
        max_iterations = config.max_iterations,
        "mandelview starting"
    );

    let (tx, rx) = mpsc::channel(INPUT_QUEUE_CAPACITY);
    let reader = tokio::spawn(script::read_events(tokio::io::stdin(), tx));

    let session = Session::start(
        config.coordinator(),
        config.viewport,
        EscapeTime::new(config.max_iterations),
        config.worker(),
        JsonLines::new(std::io::stdout()),
    );
    session.run(rx).await;
    reader.abort();
}
