//! Client handle for the Raydium program suite.

pub mod api;
pub mod token_account;

use crate::utils::{config::Cluster, errors::SolanaError, solana_client::AccountSource};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::{collections::HashMap, sync::Arc};
use tracing::info;

use api::ApiToken;

pub struct LoadOptions {
    pub owner: Arc<Keypair>,
    pub connection: Arc<dyn AccountSource>,
    pub cluster: Cluster,
    pub disable_load_token: bool,
    pub blockhash_commitment: CommitmentConfig,
    pub api_url: String,
}

pub struct Raydium {
    owner: Arc<Keypair>,
    cluster: Cluster,
    blockhash: Hash,
    last_valid_block_height: u64,
    token_list: Vec<ApiToken>,
    token_map: HashMap<Pubkey, ApiToken>,
}

impl Raydium {
    pub async fn load(options: LoadOptions) -> Result<Self, SolanaError> {
        let (blockhash, last_valid_block_height) = options
            .connection
            .latest_blockhash(options.blockhash_commitment)
            .await?;

        let (token_list, token_map) = if options.disable_load_token {
            (Vec::new(), HashMap::new())
        } else {
            let http = reqwest::Client::new();
            api::index_tokens(api::fetch_mint_list(&http, &options.api_url).await?)
        };

        info!(
            "raydium sdk loaded for {} on {} (blockhash {}, {} tokens)",
            options.owner.pubkey(),
            options.cluster,
            blockhash,
            token_list.len()
        );

        Ok(Raydium {
            owner: options.owner,
            cluster: options.cluster,
            blockhash,
            last_valid_block_height,
            token_list,
            token_map,
        })
    }

    pub fn owner(&self) -> &Keypair {
        &self.owner
    }

    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    pub fn last_valid_block_height(&self) -> u64 {
        self.last_valid_block_height
    }

    pub fn token_list(&self) -> &[ApiToken] {
        &self.token_list
    }

    pub fn token_info(&self, mint: &Pubkey) -> Option<&ApiToken> {
        self.token_map.get(mint)
    }

    #[cfg(test)]
    pub(crate) fn with_mint_list(owner: Arc<Keypair>, cluster: Cluster, mint_list: api::MintList) -> Self {
        let (token_list, token_map) = api::index_tokens(mint_list);
        Raydium {
            owner,
            cluster,
            blockhash: Hash::default(),
            last_valid_block_height: 0,
            token_list,
            token_map,
        }
    }
}
