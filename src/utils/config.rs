use crate::utils::errors::SolanaError;
use serde::Serialize;
use solana_sdk::signature::Keypair;
use std::{env, fmt, str::FromStr};

pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";
pub const MAINNET_BETA_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

const RAYDIUM_API_MAINNET: &str = "https://api-v3.raydium.io";
const RAYDIUM_API_DEVNET: &str = "https://api-v3-devnet.raydium.io";

const KEYPAIR_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    Devnet,
    Mainnet,
}

impl Cluster {
    /// Any endpoint mentioning `devnet` is treated as devnet, everything else as mainnet.
    pub fn from_rpc_url(rpc_url: &str) -> Self {
        if rpc_url.contains("devnet") {
            Cluster::Devnet
        } else {
            Cluster::Mainnet
        }
    }

    pub fn raydium_api_url(&self) -> &'static str {
        match self {
            Cluster::Devnet => RAYDIUM_API_DEVNET,
            Cluster::Mainnet => RAYDIUM_API_MAINNET,
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Devnet => write!(f, "devnet"),
            Cluster::Mainnet => write!(f, "mainnet"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TxVersion {
    Legacy,
    V0,
}

impl FromStr for TxVersion {
    type Err = SolanaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(TxVersion::Legacy),
            "v0" | "0" => Ok(TxVersion::V0),
            other => Err(SolanaError::ConfigError(format!(
                "TX_VERSION must be `legacy` or `v0`, got `{}`",
                other
            ))),
        }
    }
}

#[derive(Clone, Default)]
pub struct GrpcConfig {
    pub url: String,
    pub token: String,
}

impl GrpcConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }
}

impl fmt::Debug for GrpcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrpcConfig")
            .field("url", &self.url)
            .field("token", &redacted(&self.token))
            .finish()
    }
}

#[derive(Clone)]
pub struct Config {
    pub rpc_url: String,
    pub owner_secret: Option<String>,
    pub grpc: GrpcConfig,
    pub tx_version: TxVersion,
    pub environment: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, SolanaError> {
        let rpc_url = non_blank_var("RPC_URL").unwrap_or_else(|| DEVNET_RPC_URL.to_string());
        let owner_secret = non_blank_var("OWNER_SECRET_B58");

        let grpc = GrpcConfig {
            url: env::var("GRPC_URL").unwrap_or_default(),
            token: env::var("GRPC_TOKEN").unwrap_or_default(),
        };

        let tx_version = match non_blank_var("TX_VERSION") {
            Some(value) => value.parse::<TxVersion>()?,
            None => TxVersion::V0,
        };

        let environment = env::var("ENV").unwrap_or_else(|_| "LOCAL".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| SolanaError::ConfigError(format!("PORT must be a port number: {}", e)))?;

        Ok(Config {
            rpc_url,
            owner_secret,
            grpc,
            tx_version,
            environment,
            port,
        })
    }

    pub fn cluster(&self) -> Cluster {
        Cluster::from_rpc_url(&self.rpc_url)
    }

    pub fn uses_public_mainnet(&self) -> bool {
        self.rpc_url == MAINNET_BETA_RPC_URL
    }

    /// Resolves the owner wallet. Without a configured secret a new keypair is
    /// generated on every call.
    pub fn owner_keypair(&self) -> Result<Keypair, SolanaError> {
        match &self.owner_secret {
            Some(secret) => keypair_from_base58(secret),
            None => Ok(Keypair::new()),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("owner_secret", &self.owner_secret.as_deref().map(redacted))
            .field("grpc", &self.grpc)
            .field("tx_version", &self.tx_version)
            .field("environment", &self.environment)
            .field("port", &self.port)
            .finish()
    }
}

pub fn keypair_from_base58(secret: &str) -> Result<Keypair, SolanaError> {
    let secret_bytes = bs58::decode(secret)
        .into_vec()
        .map_err(|e| SolanaError::InvalidSecret(format!("not base58: {}", e)))?;

    if secret_bytes.len() != KEYPAIR_LENGTH {
        return Err(SolanaError::InvalidSecret(format!(
            "expected {} bytes, got {}",
            KEYPAIR_LENGTH,
            secret_bytes.len()
        )));
    }

    Keypair::from_bytes(&secret_bytes).map_err(|e| SolanaError::InvalidSecret(e.to_string()))
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "<redacted>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::Signer;

    const ALL_VARS: [&str; 7] = [
        "RPC_URL",
        "OWNER_SECRET_B58",
        "GRPC_URL",
        "GRPC_TOKEN",
        "TX_VERSION",
        "ENV",
        "PORT",
    ];

    fn with_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let kvs: Vec<(&str, Option<&str>)> = ALL_VARS
            .iter()
            .map(|key| {
                let value = vars.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
                (*key, value)
            })
            .collect();
        temp_env::with_vars(kvs, f)
    }

    #[test]
    fn defaults_to_public_devnet() {
        let config = with_env(&[], || Config::from_env().unwrap());

        assert_eq!(config.rpc_url, DEVNET_RPC_URL);
        assert_eq!(config.cluster(), Cluster::Devnet);
        assert!(config.owner_secret.is_none());
        assert_eq!(config.grpc.url, "");
        assert_eq!(config.grpc.token, "");
        assert!(!config.grpc.is_configured());
        assert_eq!(config.tx_version, TxVersion::V0);
        assert_eq!(config.environment, "LOCAL");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn blank_rpc_url_falls_back_to_devnet() {
        let config = with_env(&[("RPC_URL", "   ")], || Config::from_env().unwrap());
        assert_eq!(config.rpc_url, DEVNET_RPC_URL);
    }

    #[test]
    fn rpc_url_is_trimmed() {
        let config = with_env(&[("RPC_URL", "  https://rpc.example.com  ")], || {
            Config::from_env().unwrap()
        });
        assert_eq!(config.rpc_url, "https://rpc.example.com");
        assert_eq!(config.cluster(), Cluster::Mainnet);
    }

    #[test]
    fn grpc_values_are_taken_verbatim() {
        let config = with_env(
            &[("GRPC_URL", "https://grpc.example.com:443"), ("GRPC_TOKEN", "abc123")],
            || Config::from_env().unwrap(),
        );
        assert_eq!(config.grpc.url, "https://grpc.example.com:443");
        assert_eq!(config.grpc.token, "abc123");
        assert!(config.grpc.is_configured());
    }

    #[test]
    fn rejects_malformed_port() {
        let result = with_env(&[("PORT", "http")], Config::from_env);
        assert!(matches!(result, Err(SolanaError::ConfigError(_))));
    }

    #[test]
    fn tx_version_can_be_overridden() {
        let config = with_env(&[("TX_VERSION", "Legacy")], || Config::from_env().unwrap());
        assert_eq!(config.tx_version, TxVersion::Legacy);

        let result = with_env(&[("TX_VERSION", "v2")], Config::from_env);
        assert!(matches!(result, Err(SolanaError::ConfigError(_))));
    }

    #[test]
    fn cluster_follows_rpc_url() {
        assert_eq!(Cluster::from_rpc_url(DEVNET_RPC_URL), Cluster::Devnet);
        assert_eq!(Cluster::from_rpc_url("https://my-devnet-node.io"), Cluster::Devnet);
        assert_eq!(Cluster::from_rpc_url(MAINNET_BETA_RPC_URL), Cluster::Mainnet);
        assert_eq!(Cluster::Devnet.raydium_api_url(), RAYDIUM_API_DEVNET);
        assert_eq!(Cluster::Mainnet.to_string(), "mainnet");
    }

    #[test]
    fn detects_public_mainnet_endpoint() {
        let config = with_env(&[("RPC_URL", MAINNET_BETA_RPC_URL)], || {
            Config::from_env().unwrap()
        });
        assert!(config.uses_public_mainnet());

        let config = with_env(&[], || Config::from_env().unwrap());
        assert!(!config.uses_public_mainnet());
    }

    #[test]
    fn missing_secret_generates_fresh_keypairs() {
        let config = with_env(&[], || Config::from_env().unwrap());

        let first = config.owner_keypair().unwrap();
        let second = config.owner_keypair().unwrap();
        assert_ne!(first.pubkey(), second.pubkey());
    }

    #[test]
    fn loads_owner_from_base58_secret() {
        let keypair = Keypair::new();
        let secret = bs58::encode(keypair.to_bytes()).into_string();

        let config = with_env(&[("OWNER_SECRET_B58", secret.as_str())], || {
            Config::from_env().unwrap()
        });

        assert_eq!(config.owner_keypair().unwrap().pubkey(), keypair.pubkey());
    }

    #[test]
    fn rejects_bad_secrets() {
        assert!(matches!(
            keypair_from_base58("not-base58-0OIl"),
            Err(SolanaError::InvalidSecret(_))
        ));

        let short = bs58::encode([7u8; 32]).into_string();
        let err = keypair_from_base58(&short).unwrap_err();
        assert_eq!(err.to_string(), "Invalid wallet secret: expected 64 bytes, got 32");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let secret = bs58::encode(Keypair::new().to_bytes()).into_string();
        let config = with_env(
            &[("OWNER_SECRET_B58", secret.as_str()), ("GRPC_TOKEN", "hunter2")],
            || Config::from_env().unwrap(),
        );

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(&secret));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
