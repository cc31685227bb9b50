use crate::utils::{
    errors::SolanaError,
    solana_client::{AccountSource, TokenAccountsResponse},
};
use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};
use solana_sdk::{account::Account, pubkey::Pubkey};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use spl_token_2022::{extension::StateWithExtensions, state::Account as SplAccount};

/// A balance held by the owner, either in a token account or as native SOL.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccount {
    /// `None` for the native SOL entry.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub public_key: Option<Pubkey>,
    #[serde_as(as = "DisplayFromStr")]
    pub mint: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: u64,
    pub is_associated: Option<bool>,
    pub is_native: bool,
    #[serde_as(as = "DisplayFromStr")]
    pub program_id: Pubkey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenAccountRaw {
    pub pubkey: Pubkey,
    pub program_id: Pubkey,
    pub account_info: SplAccount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountData {
    pub slot: u64,
    pub token_accounts: Vec<TokenAccount>,
    #[serde(skip)]
    pub token_account_raw_infos: Vec<TokenAccountRaw>,
}

/// Decodes every keyed token account and appends the owner's SOL balance, if the
/// owner's system account exists.
pub fn parse_token_account_resp(
    owner: &Pubkey,
    sol_account: Option<&Account>,
    token_account_resp: TokenAccountsResponse,
) -> Result<TokenAccountData, SolanaError> {
    let mut token_accounts = Vec::with_capacity(token_account_resp.value.len() + 1);
    let mut token_account_raw_infos = Vec::with_capacity(token_account_resp.value.len());

    for keyed in token_account_resp.value {
        let program_id = keyed.account.owner;
        let account_info = StateWithExtensions::<SplAccount>::unpack(&keyed.account.data)
            .map(|state| state.base)
            .map_err(|e| {
                SolanaError::TokenError(format!("Cannot decode token account {}: {}", keyed.pubkey, e))
            })?;

        let associated =
            get_associated_token_address_with_program_id(owner, &account_info.mint, &program_id);

        token_accounts.push(TokenAccount {
            public_key: Some(keyed.pubkey),
            mint: account_info.mint,
            amount: account_info.amount,
            is_associated: Some(associated == keyed.pubkey),
            // Only the appended SOL entry is native; wrapped SOL is an ordinary token account.
            is_native: account_info.mint == Pubkey::default(),
            program_id,
        });
        token_account_raw_infos.push(TokenAccountRaw {
            pubkey: keyed.pubkey,
            program_id,
            account_info,
        });
    }

    if let Some(sol_account) = sol_account {
        token_accounts.push(TokenAccount {
            public_key: None,
            mint: Pubkey::default(),
            amount: sol_account.lamports,
            is_associated: None,
            is_native: true,
            program_id: sol_account.owner,
        });
    }

    Ok(TokenAccountData {
        slot: token_account_resp.slot,
        token_accounts,
        token_account_raw_infos,
    })
}

/// Reads the owner's account and its token accounts under both token programs,
/// then parses the merged result. The legacy program's context slot is kept.
pub async fn fetch_token_account_data(
    connection: &dyn AccountSource,
    owner: &Pubkey,
) -> Result<TokenAccountData, SolanaError> {
    let sol_account = connection.account(owner).await?;
    let token_accounts = connection
        .token_accounts_by_owner(owner, &spl_token::id())
        .await?;
    let token_2022_accounts = connection
        .token_accounts_by_owner(owner, &spl_token_2022::id())
        .await?;

    let mut merged = token_accounts;
    merged.value.extend(token_2022_accounts.value);

    parse_token_account_resp(owner, sol_account.as_ref(), merged)
}
