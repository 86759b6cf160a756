mod basic;
mod genesis;
mod impls;


use fp_core::{
    context::Context,
    crypto::Address,
    module::{AppModule, RequestQuery, ResponseQuery},
    transaction::{ActionResult, Executable, ValidateUnsigned},
};
use fp_types::Dec;
use ruc::*;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

pub use genesis::GenesisState;

pub trait Config {}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartAccount {
    /// Number of transactions sent by this account.
    pub nonce: u64,
    pub balance: Dec,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Transfer((Address, Dec)),
}

pub mod storage {
    use super::SmartAccount;
    use fp_core::crypto::Address;
    use fp_storage::*;
    use fp_types::Dec;

    // Store account information under all account addresses
    generate_storage!(Account, AccountStore => Map<Address, SmartAccount>);
    // Sum of all balances
    generate_storage!(Account, TotalIssuance => Value<Dec>);
}

pub struct App<C> {
    name: String,
    phantom: PhantomData<C>,
}

impl<C: Config> App<C> {
    pub fn new() -> Self {
        App {
            name: "account".to_string(),
            phantom: Default::default(),
        }
    }
}

impl<C: Config> Default for App<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Config> AppModule for App<C> {
    fn query_route(
        &self,
        ctx: Context,
        path: Vec<&str>,
        _req: &RequestQuery,
    ) -> ResponseQuery {
        let mut resp = ResponseQuery::new();
        let result = match path.as_slice() {
            ["balance", who] => who
                .parse::<Address>()
                .map_err(|e| eg!(e))
                .and_then(|who| Self::account_of(&ctx, &who))
                .map(|sa| sa.map(|a| a.balance).unwrap_or_default())
                .and_then(|b| serde_json::to_vec(&b).c(d!())),
            ["total_issuance"] => storage::TotalIssuance::get_or_default(ctx.store.clone())
                .and_then(|b| serde_json::to_vec(&b).c(d!())),
            _ => Err(eg!(format!("invalid account query path: {:?}", path))),
        };
        match result {
            Ok(v) => resp.set_value(v),
            Err(e) => {
                resp.set_code(1);
                resp.set_log(e.to_string());
            }
        }
        resp
    }
}

impl<C: Config> Executable for App<C> {
    type Origin = Address;
    type Call = Action;

    fn execute(
        origin: Option<Self::Origin>,
        call: Self::Call,
        ctx: &Context,
    ) -> Result<ActionResult> {
        match call {
            Action::Transfer((dest, balance)) => {
                if let Some(sender) = origin {
                    Self::do_transfer(ctx, &sender, &dest, balance).c(d!())?;
                    log::debug!(target: "account", "transfer {} from {} to {}", balance, sender, dest);
                    Ok(ActionResult::default())
                } else {
                    Err(eg!("invalid transaction origin"))
                }
            }
        }
    }
}

impl<C: Config> ValidateUnsigned for App<C> {
    type Call = Action;

    fn validate_unsigned(_call: &Self::Call, _ctx: &Context) -> Result<()> {
        Err(eg!("invalid unsigned transaction"))
    }
}
