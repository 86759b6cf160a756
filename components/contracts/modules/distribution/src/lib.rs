//!
//! # Distribution Module
//!
//! Splits every block's fees among the bonded validators by voting power,
//! takes the commission of each validator operator, and leaves the rest to
//! the delegators of that validator. A share of the fees goes to the
//! community pool.
//!
//! Delegator rewards are lazy. Each validator keeps a ledger of periods,
//! every period recording the cumulative reward per unit of stake. A
//! delegation only remembers the period it was last settled at, so a
//! block costs O(validators) and a withdrawal O(slash events), whatever the
//! number of delegators.
//!

mod allocation;
mod basic;
mod delegation;
mod genesis;
mod hooks;
mod invariants;
mod migrations;
mod period;
mod pool;
mod query;
mod validator;

pub mod config;
pub mod errors;
pub mod types;

use fp_core::{
    context::Context,
    crypto::Address,
    macros::Get,
    module::{AppModule, RequestBeginBlock, RequestQuery, ResponseQuery},
    transaction::{ActionResult, Event, Executable, ValidateUnsigned},
};
use fp_traits::{account::AccountAsset, staking::StakingInfo};
use fp_types::Dec;
use ruc::*;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

pub use config::DistributionConfig;
pub use errors::{DistrError, DistrResult};
pub use genesis::*;
pub use migrations::{legacy, CONSENSUS_VERSION};
pub use types::*;

/// Log target of the module.
pub(crate) const LOG_TARGET: &str = "distribution";

pub trait Config {
    /// Balances of every account, the module account included.
    type AccountAsset: AccountAsset<Address>;
    /// Bonded validators and delegations.
    type Staking: StakingInfo<Address>;
    /// Module addresses and switches.
    type Settings: Get<DistributionConfig>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Withdraw the rewards of the sender's delegation to a validator.
    WithdrawDelegatorReward(Address),
    /// Withdraw the commission of a validator, sent by its operator.
    WithdrawValidatorCommission(Address),
    /// Redirect the sender's future rewards.
    SetWithdrawAddress(Address),
    /// Donate to the community pool.
    FundCommunityPool(Dec),
    /// Pay out of the community pool, sent by the authority.
    CommunityPoolSpend { recipient: Address, amount: Dec },
    /// Replace the module params, sent by the authority.
    UpdateParams(Params),
}

pub mod storage {
    use crate::types::*;
    use fp_core::crypto::Address;
    use fp_storage::*;
    use fp_types::Dec;

    // Module params.
    generate_storage!(Distribution, ParamsStore => Value<Params>);
    // Global pool of undistributed funds.
    generate_storage!(Distribution, FeePoolStore => Value<FeePool>);
    // Version of the stored layout.
    generate_storage!(Distribution, ConsensusVersion => Value<u64>);
    // delegator => address receiving its rewards
    generate_storage!(Distribution, DelegatorWithdrawAddr => Map<Address, Address>);
    // validator => delegator rewards not withdrawn yet
    generate_storage!(Distribution, ValidatorOutstandingRewards => Map<Address, Dec>);
    // validator => commission not withdrawn yet
    generate_storage!(Distribution, ValidatorAccumulatedCommission => Map<Address, Dec>);
    // validator, period => closed period
    generate_storage!(Distribution, ValidatorHistoricalRewardsStore => DoubleMap<Address, u64, ValidatorHistoricalRewards>);
    // validator => open period
    generate_storage!(Distribution, ValidatorCurrentRewardsStore => Map<Address, ValidatorCurrentRewards>);
    // validator, delegator => last settlement
    generate_storage!(Distribution, DelegatorStartingInfos => DoubleMap<Address, Address, DelegatorStartingInfo>);
    // validator, (height, period) => slash
    generate_storage!(Distribution, ValidatorSlashEvents => DoubleMap<Address, (u64, u64), ValidatorSlashEvent>);
}

/// The distribution module.
pub struct App<C> {
    name: String,
    phantom: PhantomData<C>,
}

impl<C: Config> App<C> {
    pub fn new() -> Self {
        App {
            name: "distribution".to_string(),
            phantom: Default::default(),
        }
    }

    #[inline(always)]
    pub(crate) fn settings() -> DistributionConfig {
        C::Settings::get()
    }

    fn ensure_authority(origin: &Address) -> Result<()> {
        fp_core::ensure!(
            *origin == Self::settings().authority,
            format!("{} is not the module authority", origin)
        );
        Ok(())
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
        match Self::route_query(&ctx, path) {
            Ok(v) => resp.set_value(v),
            Err(e) => {
                resp.set_code(1);
                resp.set_log(e.to_string());
            }
        }
        resp.height = ctx.block_height();
        resp
    }

    fn begin_block(&mut self, ctx: &mut Context, _req: &RequestBeginBlock) -> Result<()> {
        Self::allocate_block_fees(ctx).c(d!())?;

        if Self::settings().check_invariants {
            Self::assert_invariants(ctx).c(d!())?;
        }
        Ok(())
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
        let sender = origin.ok_or_else(|| eg!("invalid transaction origin"))?;

        let event = match call {
            Action::WithdrawDelegatorReward(validator) => {
                let outcome =
                    Self::withdraw_delegator_reward(ctx, &sender, &validator).c(d!())?;
                Event::new("withdraw_rewards")
                    .attr("delegator", sender)
                    .attr("validator", validator)
                    .attr("amount", outcome.amount())
            }
            Action::WithdrawValidatorCommission(validator) => {
                if sender != validator {
                    return Err(eg!("only the operator can withdraw the commission"));
                }
                let outcome = Self::withdraw_validator_commission(ctx, &validator).c(d!())?;
                Event::new("withdraw_commission")
                    .attr("validator", validator)
                    .attr("amount", outcome.amount())
            }
            Action::SetWithdrawAddress(addr) => {
                Self::set_withdraw_addr(ctx, &sender, &addr).c(d!())?;
                Event::new("set_withdraw_address")
                    .attr("delegator", sender)
                    .attr("withdraw_address", addr)
            }
            Action::FundCommunityPool(amount) => {
                Self::fund_community_pool(ctx, &sender, amount).c(d!())?;
                Event::new("fund_community_pool")
                    .attr("depositor", sender)
                    .attr("amount", amount)
            }
            Action::CommunityPoolSpend { recipient, amount } => {
                Self::ensure_authority(&sender).c(d!())?;
                Self::spend_community_pool(ctx, &recipient, amount).c(d!())?;
                Event::new("community_pool_spend")
                    .attr("recipient", recipient)
                    .attr("amount", amount)
            }
            Action::UpdateParams(params) => {
                Self::ensure_authority(&sender).c(d!())?;
                Self::set_params(ctx, &params).c(d!())?;
                Event::new("update_params")
                    .attr("community_tax", params.community_tax)
                    .attr("withdraw_addr_enabled", params.withdraw_addr_enabled)
            }
        };

        Ok(ActionResult {
            events: vec![event],
            ..Default::default()
        })
    }
}

impl<C: Config> ValidateUnsigned for App<C> {
    type Call = Action;

    fn validate_unsigned(_call: &Self::Call, _ctx: &Context) -> Result<()> {
        Err(eg!("invalid unsigned transaction"))
    }
}
