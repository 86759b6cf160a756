use crate::{errors::*, types::*, App, Config};
use fp_core::{context::Context, crypto::Address};
use fp_traits::staking::StakingInfo;
use fp_types::Dec;
use ruc::*;
use serde::Serialize;

impl<C: Config> App<C> {
    /// Rewards `delegator` would get by withdrawing from `validator` now.
    ///
    /// Runs on a fork of the store, nothing is written.
    pub fn query_delegation_rewards(
        ctx: &Context,
        delegator: &Address,
        validator: &Address,
    ) -> DistrResult<Dec> {
        let fork = ctx.fork();
        // fails early on unknown validators or delegations
        Self::current_rewards(&fork, validator)?;
        Self::starting_info(&fork, validator, delegator)?;

        let ending_period = Self::increment_validator_period(&fork, validator)?;
        Self::calculate_delegation_rewards(&fork, validator, delegator, ending_period)
    }

    /// Rewards of `delegator` on each of its validators, in address order.
    pub fn query_delegation_total_rewards(
        ctx: &Context,
        delegator: &Address,
    ) -> DistrResult<DelegationTotalRewards> {
        let mut resp = DelegationTotalRewards::default();
        for validator in C::Staking::delegator_validators(ctx, delegator)? {
            let reward = Self::query_delegation_rewards(ctx, delegator, &validator)?;
            resp.total = resp.total.checked_add(reward)?;
            resp.rewards.push(DelegationDelegatorReward {
                validator_address: validator,
                reward,
            });
        }
        Ok(resp)
    }

    pub(crate) fn route_query(ctx: &Context, path: Vec<&str>) -> Result<Vec<u8>> {
        fn addr(s: &str) -> Result<Address> {
            s.parse::<Address>().map_err(|e| eg!(e))
        }
        fn json<T: Serialize>(v: DistrResult<T>) -> Result<Vec<u8>> {
            v.c(d!()).and_then(|v| serde_json::to_vec(&v).c(d!()))
        }

        match path.as_slice() {
            ["params"] => json(Self::params(ctx)),
            ["community_pool"] => json(Self::fee_pool(ctx).map(|p| p.community_pool)),
            ["validator_outstanding_rewards", val] => {
                json(Self::outstanding_rewards(ctx, &addr(val)?))
            }
            ["validator_commission", val] => json(Self::accumulated_commission(ctx, &addr(val)?)),
            ["delegation_rewards", del, val] => {
                json(Self::query_delegation_rewards(ctx, &addr(del)?, &addr(val)?))
            }
            ["delegation_total_rewards", del] => {
                json(Self::query_delegation_total_rewards(ctx, &addr(del)?))
            }
            ["delegator_withdraw_address", del] => json(Self::withdraw_addr(ctx, &addr(del)?)),
            ["validator_slashes", val] => json(Self::slash_events(ctx, &addr(val)?)),
            _ => Err(eg!(format!("invalid distribution query path: {:?}", path))),
        }
    }
}
