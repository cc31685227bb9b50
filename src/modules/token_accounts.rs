use crate::modules::AppState;
use crate::raydium::{
    token_account::{TokenAccountData, TokenAccountRaw},
    Raydium,
};
use crate::utils::errors::SolanaError;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInfoResponse {
    pub pubkey: String,
    pub program_id: String,
    pub state: String,
    pub delegate: Option<String>,
    pub delegated_amount: String,
    pub close_authority: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTokenAccountsResponse<'a> {
    #[serde(flatten)]
    pub data: &'a TokenAccountData,
    pub raw_infos: Vec<RawInfoResponse>,
    pub symbols: BTreeMap<String, String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/token-accounts", get(get_token_accounts))
}

async fn get_token_accounts(
    State(context): State<AppState>,
) -> Result<Json<serde_json::Value>, SolanaError> {
    info!("GET /token-accounts");

    let data = context.fetch_token_account_data().await?;

    let response = WalletTokenAccountsResponse {
        data: &data,
        raw_infos: data.token_account_raw_infos.iter().map(raw_info).collect(),
        symbols: context
            .sdk()
            .map(|raydium| token_symbols(&raydium, &data))
            .unwrap_or_default(),
    };

    info!(
        "Response: 200 - {} token accounts at slot {}",
        data.token_accounts.len(),
        data.slot
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "data": response
    })))
}

fn raw_info(raw: &TokenAccountRaw) -> RawInfoResponse {
    let info = &raw.account_info;
    RawInfoResponse {
        pubkey: raw.pubkey.to_string(),
        program_id: raw.program_id.to_string(),
        state: format!("{:?}", info.state),
        delegate: Option::<Pubkey>::from(info.delegate).map(|d| d.to_string()),
        delegated_amount: info.delegated_amount.to_string(),
        close_authority: Option::<Pubkey>::from(info.close_authority).map(|c| c.to_string()),
    }
}

// Symbols are only known once the SDK has loaded its token list.
fn token_symbols(raydium: &Raydium, data: &TokenAccountData) -> BTreeMap<String, String> {
    data.token_accounts
        .iter()
        .filter_map(|account| {
            raydium
                .token_info(&account.mint)
                .map(|token| (account.mint.to_string(), token.symbol.clone()))
        })
        .collect()
}
