use router_registry::bootstrap::{self, Bootstrapped};
use router_registry::{metrics, Config};

fn main() -> eyre::Result<()> {
    // Install color-eyre for better error reporting
    color_eyre::install()?;

    init_logging();

    tracing::info!("Starting router registry");

    let config = Config::load()?;
    tracing::info!(
        bootstrap_path = %config.bootstrap_path.display(),
        identity_inferred_routing = config.identity_inferred_routing,
        "Configuration loaded"
    );

    let Bootstrapped { registry, policy } = bootstrap::load(&config)?;
    tracing::debug!(?policy, "Swap policy loaded");

    let paused: Vec<String> = registry
        .paused_chain_ids()
        .iter()
        .map(|id| id.canonical())
        .collect();
    tracing::info!(paused = ?paused, "Paused chains");

    // Diagnostic dump of everything indexed
    registry.multichain_tokens().log_all();
    println!(
        "{}",
        serde_json::to_string_pretty(&registry.multichain_tokens().dump())?
    );

    tracing::debug!(metrics = %metrics::encode_text()?, "Registry metrics");
    tracing::info!("Router registry inspection complete");
    Ok(())
}

/// Initialize tracing/logging with structured output
///
/// `LOG_FORMAT=json` switches to JSON lines for log shippers.
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,router_registry=debug"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let (text_layer, json_layer) = if json {
        (None, Some(fmt::layer().json()))
    } else {
        (
            Some(fmt::layer().with_target(true).with_thread_ids(true)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(text_layer)
        .with(json_layer)
        .with(filter)
        .init();
}
