use crate::{
    raydium::{
        token_account::{self, TokenAccountData},
        LoadOptions, Raydium,
    },
    utils::{
        config::{Config, TxVersion},
        errors::SolanaError,
        solana_client::{self, AccountSource},
    },
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{Keypair, Signer},
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct InitParams {
    pub load_token: bool,
}

/// Owner wallet, connection and the lazily loaded SDK handle. Built once at
/// start-up and shared with every consumer.
pub struct AppContext {
    config: Config,
    owner: Arc<Keypair>,
    connection: Arc<dyn AccountSource>,
    raydium: OnceCell<Arc<Raydium>>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self, SolanaError> {
        let owner = config.owner_keypair()?;
        if config.owner_secret.is_none() {
            warn!(
                "OWNER_SECRET_B58 not set, using ephemeral wallet {}",
                owner.pubkey()
            );
        }
        let connection = solana_client::connect(&config);

        Ok(Self::with_connection(config, owner, connection))
    }

    pub fn with_connection(
        config: Config,
        owner: Keypair,
        connection: Arc<dyn AccountSource>,
    ) -> Self {
        AppContext {
            config,
            owner: Arc::new(owner),
            connection,
            raydium: OnceCell::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_loaded_sdk(self, raydium: Raydium) -> Self {
        AppContext {
            raydium: OnceCell::new_with(Some(Arc::new(raydium))),
            ..self
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn owner(&self) -> &Keypair {
        &self.owner
    }

    pub fn connection(&self) -> &dyn AccountSource {
        self.connection.as_ref()
    }

    pub fn tx_version(&self) -> TxVersion {
        self.config.tx_version
    }

    /// The SDK handle if some caller already loaded it.
    pub fn sdk(&self) -> Option<Arc<Raydium>> {
        self.raydium.get().cloned()
    }

    /// Returns the SDK handle, loading it on first use. Later calls return the
    /// same instance and ignore `params`. A failed load leaves the cell empty.
    pub async fn init_sdk(&self, params: InitParams) -> Result<Arc<Raydium>, SolanaError> {
        let raydium = self
            .raydium
            .get_or_try_init(|| async {
                let endpoint = self.connection.endpoint();
                let cluster = self.config.cluster();

                if self.config.uses_public_mainnet() {
                    warn!("using free rpc node might cause unexpected error, strongly suggest uses paid rpc node");
                }
                info!("connect to rpc {} in {}", endpoint, cluster);

                let raydium = Raydium::load(LoadOptions {
                    owner: self.owner.clone(),
                    connection: self.connection.clone(),
                    cluster,
                    disable_load_token: !params.load_token,
                    blockhash_commitment: CommitmentConfig::finalized(),
                    api_url: cluster.raydium_api_url().to_string(),
                })
                .await?;

                Ok::<_, SolanaError>(Arc::new(raydium))
            })
            .await?;

        Ok(raydium.clone())
    }

    pub async fn fetch_token_account_data(&self) -> Result<TokenAccountData, SolanaError> {
        token_account::fetch_token_account_data(self.connection(), &self.owner.pubkey()).await
    }
}
