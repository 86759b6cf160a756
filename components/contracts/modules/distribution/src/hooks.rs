use crate::{App, Config};
use fp_core::{context::Context, crypto::Address};
use fp_traits::staking::{StakingHooks, StakingInfo};
use fp_types::Dec;
use ruc::*;

impl<C: Config> StakingHooks<Address> for App<C> {
    fn after_validator_created(ctx: &Context, validator: &Address) -> Result<()> {
        Self::initialize_validator(ctx, validator).c(d!())
    }

    fn before_delegation_created(
        ctx: &Context,
        _delegator: &Address,
        validator: &Address,
    ) -> Result<()> {
        Self::increment_validator_period(ctx, validator)
            .map(|_| ())
            .c(d!())
    }

    fn before_delegation_shares_modified(
        ctx: &Context,
        delegator: &Address,
        validator: &Address,
    ) -> Result<()> {
        Self::withdraw_delegation_rewards(ctx, validator, delegator)
            .map(|_| ())
            .c(d!())
    }

    fn after_delegation_modified(
        ctx: &Context,
        delegator: &Address,
        validator: &Address,
    ) -> Result<()> {
        // fully undelegated, the reference was released before the change
        match C::Staking::delegation_stake(ctx, delegator, validator).c(d!())? {
            Some(stake) if !stake.is_zero() => {
                Self::initialize_delegation(ctx, validator, delegator).c(d!())
            }
            _ => Ok(()),
        }
    }

    fn before_validator_slashed(ctx: &Context, validator: &Address, fraction: Dec) -> Result<()> {
        Self::record_slash(ctx, validator, fraction).c(d!())
    }

    fn before_validator_removed(ctx: &Context, validator: &Address) -> Result<()> {
        Self::remove_validator(ctx, validator).c(d!())
    }
}
