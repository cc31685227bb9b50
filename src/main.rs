use anyhow::Context;
use axum::routing::get;
use axum::{http::Method, Router};
use dotenv::dotenv;
use solana_sdk::signature::Signer;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod context;
mod modules;
mod raydium;
mod utils;

use context::AppContext;
use utils::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_ansi(config.environment == "LOCAL")
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let socket_address = SocketAddr::from(([0, 0, 0, 0], config.port));
    let context = Arc::new(AppContext::new(config)?);

    info!(
        "Owner {} on {} via {}",
        context.owner().pubkey(),
        context.config().cluster(),
        context.connection().endpoint()
    );
    if context.config().grpc.is_configured() {
        info!("gRPC endpoint configured: {}", context.config().grpc.url);
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(|| async { "Raydium bootstrap is Healthy!" }))
        .merge(modules::owner::routes())
        .merge(modules::sdk::routes())
        .merge(modules::token_accounts::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(context);

    info!("Raydium bootstrap running on {}", socket_address);

    axum::Server::bind(&socket_address)
        .serve(app.into_make_service())
        .await
        .context("server error")?;

    Ok(())
}
