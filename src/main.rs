//! Application entry point.

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use ed25519_dalek::SigningKey;
use secrecy::SecretString;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use stellarpay_gateway::api::{CorsConfig, create_router_with_cors};
use stellarpay_gateway::app::AppState;
use stellarpay_gateway::domain::StellarNetwork;
use stellarpay_gateway::infra::{HorizonLedgerClient, signing_key_from_seed};

/// Application configuration, read once at startup
struct Config {
    horizon_url: String,
    network: StellarNetwork,
    signing_key: SigningKey,
    api_key: Option<String>,
    cors: CorsConfig,
    host: String,
    port: u16,
}

impl Config {
    fn from_env() -> Result<Self> {
        let network = env::var("STELLAR_NETWORK")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|v| v.parse::<StellarNetwork>())
            .transpose()
            .map_err(|e| anyhow::anyhow!(e))?
            .unwrap_or_default();
        let horizon_url = env::var("HORIZON_URL")
            .unwrap_or_else(|_| network.default_horizon_url().to_string());
        let signing_key = Self::load_signing_key()?;
        let api_key = env::var("API_KEY").ok().filter(|k| !k.is_empty());
        let cors = env::var("ALLOWED_ORIGINS")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|v| CorsConfig::from_list(&v))
            .unwrap_or_default();
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Ok(Self {
            horizon_url,
            network,
            signing_key,
            api_key,
            cors,
            host,
            port,
        })
    }

    fn load_signing_key() -> Result<SigningKey> {
        let seed = env::var("STELLAR_SOURCE_SECRET").map_err(|_| {
            anyhow::anyhow!(
                "STELLAR_SOURCE_SECRET environment variable is not set.\n\
                 This is a REQUIRED configuration.\n\
                 Set it to the S... seed of the account payments are sent from."
            )
        })?;

        if seed.is_empty() {
            anyhow::bail!(
                "STELLAR_SOURCE_SECRET environment variable is empty.\n\
                 Please provide a valid Stellar secret seed."
            );
        }

        info!("Loading signing key from environment");
        let secret = SecretString::from(seed);
        signing_key_from_seed(&secret)
            .context("Failed to parse STELLAR_SOURCE_SECRET as a Stellar seed")
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    info!("🌐 StellarPay Gateway v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let ledger = HorizonLedgerClient::new(&config.horizon_url, config.network, config.signing_key);
    info!("🔑 Source account: {}", ledger.source_account_id());
    info!(
        network = %config.network,
        horizon = %config.horizon_url,
        "Ledger client created"
    );

    if config.api_key.is_some() {
        info!("   ✓ API key gate enabled for /api/send");
    } else {
        info!("   ○ API key not configured (send endpoint is open)");
    }
    info!(
        "   ✓ Allowed origins: {}",
        config.cors.allowed_origins.join(", ")
    );

    let state = Arc::new(
        AppState::new(Arc::new(ledger), config.network).with_api_key(config.api_key.clone()),
    );
    let router = create_router_with_cors(state, config.cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🚀 Server starting on http://{}", addr);
    info!("📖 Swagger UI available at http://{}/swagger-ui", addr);
    info!("📄 OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
