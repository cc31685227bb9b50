pub mod config;
pub mod errors;
pub mod solana_client;
