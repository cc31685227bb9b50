use crate::utils::errors::SolanaError;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiToken {
    #[serde(default)]
    pub chain_id: u64,
    pub address: String,
    pub program_id: String,
    #[serde(default, rename = "logoURI")]
    pub logo_uri: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub extensions: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintList {
    pub mint_list: Vec<ApiToken>,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

pub async fn fetch_mint_list(http: &reqwest::Client, base_url: &str) -> Result<MintList, SolanaError> {
    let url = format!("{}/mint/list", base_url.trim_end_matches('/'));
    info!("GET {}", url);

    let response: ApiResponse<MintList> = http
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    into_data(response)
}

fn into_data<T>(response: ApiResponse<T>) -> Result<T, SolanaError> {
    if !response.success {
        return Err(SolanaError::ApiResponse(
            response.msg.unwrap_or_else(|| format!("request {} failed", response.id)),
        ));
    }

    response
        .data
        .ok_or_else(|| SolanaError::ApiResponse(format!("request {} returned no data", response.id)))
}

/// Drops blacklisted and unparsable mints, keeping list order for the survivors.
pub fn index_tokens(mint_list: MintList) -> (Vec<ApiToken>, HashMap<Pubkey, ApiToken>) {
    let blacklist: HashSet<String> = mint_list.blacklist.into_iter().collect();
    let mut tokens = Vec::with_capacity(mint_list.mint_list.len());
    let mut by_mint = HashMap::with_capacity(mint_list.mint_list.len());

    for token in mint_list.mint_list {
        if blacklist.contains(&token.address) {
            continue;
        }
        match token.address.parse::<Pubkey>() {
            Ok(mint) => {
                by_mint.insert(mint, token.clone());
                tokens.push(token);
            }
            Err(_) => debug!("skipping token with invalid mint {}", token.address),
        }
    }

    (tokens, by_mint)
}
