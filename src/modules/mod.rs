pub mod owner;
pub mod sdk;
pub mod token_accounts;

use crate::context::AppContext;
use std::sync::Arc;

pub type AppState = Arc<AppContext>;
