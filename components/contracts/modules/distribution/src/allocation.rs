use crate::storage::*;
use crate::{errors::*, App, Config, LOG_TARGET};
use fp_core::{context::Context, crypto::Address};
use fp_traits::{account::AccountAsset, staking::StakingInfo};
use fp_types::Dec;

impl<C: Config> App<C> {
    /// Move the fees collected so far into the module account and split them.
    pub fn allocate_block_fees(ctx: &Context) -> DistrResult<()> {
        let settings = Self::settings();
        let fees = C::AccountAsset::balance(ctx, &settings.fee_collector)?;
        if !fees.is_zero() {
            C::AccountAsset::transfer(
                ctx,
                &settings.fee_collector,
                &settings.module_account,
                fees,
            )
            .map_err(DistrError::account)?;
        }

        let votes = C::Staking::bonded_validators(ctx)?;
        let total_power = C::Staking::total_voting_power(ctx)?;
        let community_tax = Self::params(ctx)?.community_tax;

        Self::allocate_tokens(ctx, fees, &votes, total_power, community_tax)
    }

    /// Split `total_fees` by voting power.
    ///
    /// Per-validator truncation dust goes to the community pool together
    /// with the community tax, so the credited parts always add up to
    /// exactly `total_fees`.
    pub fn allocate_tokens(
        ctx: &Context,
        total_fees: Dec,
        votes: &[(Address, u64)],
        total_power: u64,
        community_tax: Dec,
    ) -> DistrResult<()> {
        if total_fees.is_zero() {
            return Ok(());
        }

        let voted_power = votes
            .iter()
            .try_fold(0u64, |acc, (_, power)| acc.checked_add(*power));
        match voted_power {
            Some(p) if total_power > 0 && p <= total_power => {}
            _ => {
                log::error!(target: LOG_TARGET, "cannot allocate {}: voted power {:?} of total {}",
                    total_fees, voted_power, total_power);
                return Err(DistrError::InvalidPowerState {
                    fees: total_fees,
                    total_power,
                });
            }
        }

        let community_share = total_fees.checked_mul_trunc(community_tax)?;
        let remaining = total_fees.checked_sub(community_share)?;

        let mut distributed = Dec::zero();
        for (validator, power) in votes.iter() {
            let share = remaining.checked_mul_ratio_trunc(*power, total_power)?;
            Self::allocate_tokens_to_validator(ctx, validator, share)?;
            distributed = distributed.checked_add(share)?;
        }

        let dust = remaining.checked_sub(distributed)?;
        let mut fee_pool = Self::fee_pool(ctx)?;
        fee_pool.community_pool = fee_pool
            .community_pool
            .checked_add(community_share)?
            .checked_add(dust)?;
        FeePoolStore::put(ctx.store.clone(), &fee_pool)?;

        log::info!(target: LOG_TARGET, "height {}: allocated {} to {} validators, {} to the community pool",
            ctx.block_height(), distributed, votes.len(), community_share.checked_add(dust)?);
        Ok(())
    }

    /// Credit `tokens` to a validator: commission first, the rest raises the
    /// reward ratio of its open period.
    pub fn allocate_tokens_to_validator(
        ctx: &Context,
        validator: &Address,
        tokens: Dec,
    ) -> DistrResult<()> {
        let mut current = Self::current_rewards(ctx, validator)?;

        let rate = C::Staking::commission_rate(ctx, validator)?;
        let mut commission = tokens.checked_mul_trunc(rate)?;
        let mut shared = tokens.checked_sub(commission)?;

        let stake = C::Staking::validator_tokens(ctx, validator)?;
        if stake.is_zero() {
            // nobody to share with
            commission = tokens;
            shared = Dec::zero();
        } else {
            let increment = shared.checked_quo_trunc(stake)?;
            current.reward_ratio = current.reward_ratio.checked_add(increment)?;
            ValidatorCurrentRewardsStore::insert(ctx.store.clone(), validator, &current)?;
        }

        let accumulated = Self::accumulated_commission(ctx, validator)?.checked_add(commission)?;
        ValidatorAccumulatedCommission::insert(ctx.store.clone(), validator, &accumulated)?;

        let outstanding = Self::outstanding_rewards(ctx, validator)?.checked_add(shared)?;
        ValidatorOutstandingRewards::insert(ctx.store.clone(), validator, &outstanding)?;
        Ok(())
    }
}
