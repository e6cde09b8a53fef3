use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pushgate::application::usecases::{DispatchUseCase, PauseUseCase, PushUseCase};
use pushgate::application::{Notifier, TokenRegistry};
use pushgate::infrastructure::{
    bark_notifier::BarkNotifier, console_notifier::ConsoleNotifier, multi_notifier::MultiNotifier,
};
use pushgate::interfaces::config::Config;
use pushgate::interfaces::http_api::{ApiState, build_router};

#[derive(Parser, Debug)]
#[command(name = "pushgate")]
struct Args {
    /// Path to config.yaml
    #[arg(long, default_value = "config.yaml")]
    config: String,

    /// Listen address, overrides `listen` from the config file
    #[arg(long)]
    listen: Option<String>,

    /// Do not push to the provider (console only)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pushgate=info")),
        )
        .init();
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // 1) load config
    let cfg = match Config::load_from_file(&args.config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config {}: {}", args.config, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = cfg.validate() {
        tracing::error!("Invalid config: {e}");
        std::process::exit(1);
    }

    // 2) notifiers fanout
    let mut notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(ConsoleNotifier::new())];
    if !args.dry_run {
        match BarkNotifier::new(&cfg.provider.base_url, cfg.provider_timeout()) {
            Ok(bark) => notifiers.push(Box::new(bark)),
            Err(e) => {
                tracing::error!("Invalid provider: {e}");
                std::process::exit(1);
            }
        }
    } else {
        tracing::warn!("--dry-run enabled: only console output");
    }
    let notifier: Arc<dyn Notifier> = Arc::new(MultiNotifier::new(notifiers));

    // 3) usecases
    let registry = Arc::new(TokenRegistry::new());
    let dispatch = Arc::new(DispatchUseCase::new(notifier, cfg.provider.max_body_chars));
    let push = PushUseCase::new(
        Arc::clone(&registry),
        dispatch,
        cfg.defaults.clone(),
        cfg.debounce(),
    );
    let pause = PauseUseCase::new(Arc::clone(&registry), cfg.cooldown(), cfg.cooldown_poll());

    let app = build_router(ApiState {
        registry,
        push: Arc::new(push),
        pause: Arc::new(pause),
    });

    // 4) serve
    let listen = args.listen.unwrap_or(cfg.listen);
    let listener = match tokio::net::TcpListener::bind(&listen).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {listen}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(listen = %listen, debounce_secs = cfg.debounce_seconds, cooldown_secs = cfg.cooldown_seconds, "pushgate started");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server failed: {e}");
        std::process::exit(1);
    }
    tracing::info!("pushgate stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {e}");
    }
}
