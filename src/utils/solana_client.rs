use crate::utils::{config::Config, errors::SolanaError};
use async_trait::async_trait;
use serde_json::json;
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::RpcAccountInfoConfig,
    rpc_request::RpcRequest,
    rpc_response::{Response, RpcKeyedAccount},
};
use solana_sdk::{account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct KeyedAccount {
    pub pubkey: Pubkey,
    pub account: Account,
}

/// A `getTokenAccountsByOwner` result with its context slot.
#[derive(Debug, Clone, Default)]
pub struct TokenAccountsResponse {
    pub slot: u64,
    pub value: Vec<KeyedAccount>,
}

/// The remote reads the bootstrap performs against a Solana node.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountSource: Send + Sync {
    fn endpoint(&self) -> String;

    async fn account(&self, pubkey: &Pubkey) -> Result<Option<Account>, SolanaError>;

    async fn token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<TokenAccountsResponse, SolanaError>;

    async fn latest_blockhash(&self, commitment: CommitmentConfig)
        -> Result<(Hash, u64), SolanaError>;
}

pub fn get_rpc_client(config: &Config) -> RpcClient {
    RpcClient::new_with_commitment(config.rpc_url.clone(), CommitmentConfig::confirmed())
}

pub fn connect(config: &Config) -> Arc<dyn AccountSource> {
    Arc::new(get_rpc_client(config))
}

#[async_trait]
impl AccountSource for RpcClient {
    fn endpoint(&self) -> String {
        self.url()
    }

    async fn account(&self, pubkey: &Pubkey) -> Result<Option<Account>, SolanaError> {
        let response = self
            .get_account_with_commitment(pubkey, self.commitment())
            .await
            .map_err(SolanaError::ClientError)?;

        Ok(response.value)
    }

    async fn token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<TokenAccountsResponse, SolanaError> {
        // The client's typed helper asks for jsonParsed; raw base64 keeps the account bytes.
        let config = RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::Base64),
            data_slice: None,
            commitment: Some(self.commitment()),
            min_context_slot: None,
        };

        let response: Response<Vec<RpcKeyedAccount>> = self
            .send(
                RpcRequest::GetTokenAccountsByOwner,
                json!([
                    owner.to_string(),
                    { "programId": program_id.to_string() },
                    config
                ]),
            )
            .await
            .map_err(SolanaError::ClientError)?;

        let value = response
            .value
            .into_iter()
            .map(|keyed| {
                let pubkey = keyed.pubkey.parse::<Pubkey>().map_err(|_| {
                    SolanaError::TokenError(format!("Invalid token account address {}", keyed.pubkey))
                })?;
                let account = keyed.account.decode::<Account>().ok_or_else(|| {
                    SolanaError::TokenError(format!("Undecodable account data for {}", pubkey))
                })?;
                Ok(KeyedAccount { pubkey, account })
            })
            .collect::<Result<Vec<_>, SolanaError>>()?;

        Ok(TokenAccountsResponse {
            slot: response.context.slot,
            value,
        })
    }

    async fn latest_blockhash(
        &self,
        commitment: CommitmentConfig,
    ) -> Result<(Hash, u64), SolanaError> {
        self.get_latest_blockhash_with_commitment(commitment)
            .await
            .map_err(SolanaError::ClientError)
    }
}
