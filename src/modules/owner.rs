use crate::modules::AppState;
use crate::utils::config::{Cluster, TxVersion};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use solana_sdk::signature::Signer;
use tracing::info;

#[derive(Serialize)]
pub struct OwnerResponse {
    pub pubkey: String, // Base58 encoded
    pub cluster: Cluster,
    pub rpc_endpoint: String,
    pub tx_version: TxVersion,
    pub grpc_configured: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/owner", get(get_owner))
}

async fn get_owner(State(context): State<AppState>) -> Json<serde_json::Value> {
    info!("GET /owner");

    let config = context.config();
    let response = OwnerResponse {
        pubkey: context.owner().pubkey().to_string(),
        cluster: config.cluster(),
        rpc_endpoint: context.connection().endpoint(),
        tx_version: context.tx_version(),
        grpc_configured: config.grpc.is_configured(),
    };

    Json(serde_json::json!({
        "success": true,
        "data": response
    }))
}
