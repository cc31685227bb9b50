use crate::context::InitParams;
use crate::modules::AppState;
use crate::utils::errors::{json_rejection_message, SolanaError};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use solana_sdk::signature::Signer;
use tracing::info;

#[derive(Deserialize, Serialize, Default)]
pub struct InitSdkRequest {
    #[serde(rename = "loadToken", default)]
    pub load_token: bool,
}

#[derive(Serialize)]
pub struct InitSdkResponse {
    pub owner: String,
    pub cluster: String,
    pub blockhash: String,
    pub last_valid_block_height: u64,
    pub token_count: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/sdk/init", post(init_sdk))
}

async fn init_sdk(
    State(context): State<AppState>,
    payload: Result<Json<InitSdkRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, SolanaError> {
    // A bare POST without a JSON body keeps the defaults.
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => InitSdkRequest::default(),
        Err(rejection) => {
            return Err(SolanaError::InvalidRequest(
                json_rejection_message(&rejection).to_string(),
            ))
        }
    };

    info!(
        "POST /sdk/init - Request: {}",
        serde_json::to_string(&request).unwrap_or_default()
    );

    let raydium = context
        .init_sdk(InitParams {
            load_token: request.load_token,
        })
        .await?;

    let response = InitSdkResponse {
        owner: raydium.owner().pubkey().to_string(),
        cluster: raydium.cluster().to_string(),
        blockhash: raydium.blockhash().to_string(),
        last_valid_block_height: raydium.last_valid_block_height(),
        token_count: raydium.token_list().len(),
    };

    info!("Response: 200");

    Ok(Json(serde_json::json!({
        "success": true,
        "data": response
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AppContext;
    use crate::utils::{
        config::{Config, GrpcConfig, TxVersion},
        solana_client::MockAccountSource,
    };
    use axum::{
        body::Body,
        extract::FromRequest,
        http::{header, Request, StatusCode},
        response::IntoResponse,
    };
    use solana_sdk::{hash::Hash, signature::Keypair};
    use std::sync::Arc;

    fn test_context(source: MockAccountSource) -> AppState {
        let config = Config {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            owner_secret: None,
            grpc: GrpcConfig::default(),
            tx_version: TxVersion::V0,
            environment: "TEST".to_string(),
            port: 3000,
        };
        Arc::new(AppContext::with_connection(
            config,
            Keypair::new(),
            Arc::new(source),
        ))
    }

    async fn extract(request: Request<Body>) -> Result<Json<InitSdkRequest>, JsonRejection> {
        Json::<InitSdkRequest>::from_request(request, &()).await
    }

    #[tokio::test]
    async fn initializes_sdk_once_across_requests() {
        let blockhash = Hash::new_unique();
        let mut source = MockAccountSource::new();
        source
            .expect_endpoint()
            .return_const("https://api.devnet.solana.com".to_string());
        source
            .expect_latest_blockhash()
            .times(1)
            .returning(move |_| Ok((blockhash, 77)));

        let context = test_context(source);

        for _ in 0..2 {
            let Json(body) = init_sdk(State(context.clone()), Ok(Json(InitSdkRequest::default())))
                .await
                .unwrap();

            assert_eq!(body["success"], true);
            assert_eq!(body["data"]["cluster"], "devnet");
            assert_eq!(body["data"]["blockhash"], blockhash.to_string());
            assert_eq!(body["data"]["token_count"], 0);
        }
    }

    #[tokio::test]
    async fn bare_post_falls_back_to_defaults() {
        let mut source = MockAccountSource::new();
        source
            .expect_endpoint()
            .return_const("https://api.devnet.solana.com".to_string());
        source
            .expect_latest_blockhash()
            .times(1)
            .returning(|_| Ok((Hash::new_unique(), 9)));

        let payload = extract(
            Request::post("/sdk/init").body(Body::empty()).unwrap(),
        )
        .await;
        assert!(matches!(
            payload,
            Err(JsonRejection::MissingJsonContentType(_))
        ));

        let Json(body) = init_sdk(State(test_context(source)), payload).await.unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["last_valid_block_height"], 9);
        assert_eq!(body["data"]["token_count"], 0);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_before_init() {
        let mut source = MockAccountSource::new();
        source.expect_latest_blockhash().never();
        let context = test_context(source);

        let payload = extract(
            Request::post("/sdk/init")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{"))
                .unwrap(),
        )
        .await;

        let err = init_sdk(State(context.clone()), payload).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid request: JSON syntax error");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert!(context.sdk().is_none());
    }
}
