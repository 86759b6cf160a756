use crate::storage::*;
use crate::{errors::*, types::*, App, Config, LOG_TARGET};
use fp_core::{context::Context, crypto::Address};
use fp_traits::{account::AccountAsset, staking::StakingInfo};
use fp_types::Dec;

/// Stake may drift this far above the staking module's figure because of
/// truncation in repeated slashes.
const STAKE_MARGIN_ATTO: u64 = 3;

impl<C: Config> App<C> {
    /// Settle a delegation at the period just closed.
    pub fn initialize_delegation(
        ctx: &Context,
        validator: &Address,
        delegator: &Address,
    ) -> DistrResult<()> {
        let previous_period = Self::current_rewards(ctx, validator)?.period - 1;
        Self::increment_reference_count(ctx, validator, previous_period)?;

        let stake = C::Staking::delegation_stake(ctx, delegator, validator)?.ok_or(
            DistrError::NoDelegationDistInfo {
                delegator: *delegator,
                validator: *validator,
            },
        )?;

        DelegatorStartingInfos::insert(
            ctx.store.clone(),
            validator,
            delegator,
            &DelegatorStartingInfo {
                previous_period,
                stake,
                height: ctx.block_height(),
            },
        )?;
        Ok(())
    }

    pub fn starting_info(
        ctx: &Context,
        validator: &Address,
        delegator: &Address,
    ) -> DistrResult<DelegatorStartingInfo> {
        DelegatorStartingInfos::get(ctx.store.clone(), validator, delegator)?.ok_or(
            DistrError::NoDelegationDistInfo {
                delegator: *delegator,
                validator: *validator,
            },
        )
    }

    /// `(end - start) * stake` between two closed periods.
    fn rewards_between(
        ctx: &Context,
        validator: &Address,
        starting_period: u64,
        ending_period: u64,
        stake: Dec,
    ) -> DistrResult<Dec> {
        if starting_period > ending_period {
            return Err(DistrError::ReconciliationError(format!(
                "starting period {} after ending period {}",
                starting_period, ending_period
            )));
        }

        let start = Self::historical_rewards(ctx, validator, starting_period)?;
        let end = Self::historical_rewards(ctx, validator, ending_period)?;
        let diff = end
            .cumulative_reward_ratio
            .checked_sub(start.cumulative_reward_ratio)
            .map_err(|_| {
                log::error!(target: LOG_TARGET, "{}: ratio of period {} below period {}",
                    validator, ending_period, starting_period);
                DistrError::ReconciliationError(format!(
                    "negative rewards between periods {} and {} of {}",
                    starting_period, ending_period, validator
                ))
            })?;

        diff.checked_mul_trunc(stake).map_err(DistrError::from)
    }

    /// Rewards of a delegation up to the closed period `ending_period`.
    ///
    /// Every slash in between closed a period of its own, the stake is scaled
    /// down by `1 - fraction` from there on.
    pub fn calculate_delegation_rewards(
        ctx: &Context,
        validator: &Address,
        delegator: &Address,
        ending_period: u64,
    ) -> DistrResult<Dec> {
        let info = Self::starting_info(ctx, validator, delegator)?;

        let mut starting_period = info.previous_period;
        let mut stake = info.stake;
        let mut rewards = Dec::zero();

        for ((height, _), event) in ValidatorSlashEvents::iterate_prefix(ctx.store.clone(), validator)? {
            if height < info.height || height > ctx.block_height() {
                continue;
            }
            let ending = event.validator_period;
            if ending > starting_period && ending <= ending_period {
                rewards = rewards.checked_add(Self::rewards_between(
                    ctx,
                    validator,
                    starting_period,
                    ending,
                    stake,
                )?)?;
                stake = stake.checked_mul_trunc(Dec::one().checked_sub(event.fraction)?)?;
                starting_period = ending;
            }
        }

        // the staking module truncates on its own when slashing
        let current_stake = C::Staking::delegation_stake(ctx, delegator, validator)?
            .unwrap_or_default();
        if stake > current_stake {
            let margin = Dec::from_atto(STAKE_MARGIN_ATTO.into());
            if stake.checked_sub(current_stake)? > margin {
                log::error!(target: LOG_TARGET, "{} on {}: computed stake {} above actual {}",
                    delegator, validator, stake, current_stake);
                return Err(DistrError::ReconciliationError(format!(
                    "computed stake {} is greater than current stake {}",
                    stake, current_stake
                )));
            }
            stake = current_stake;
        }

        rewards.checked_add(Self::rewards_between(
            ctx,
            validator,
            starting_period,
            ending_period,
            stake,
        )?)
        .map_err(DistrError::from)
    }

    /// Pay out a delegation and release its reference.
    ///
    /// The starting info is deleted, callers re-initialize it if the
    /// delegation still exists.
    pub(crate) fn withdraw_delegation_rewards(
        ctx: &Context,
        validator: &Address,
        delegator: &Address,
    ) -> DistrResult<WithdrawOutcome> {
        let info = Self::starting_info(ctx, validator, delegator)?;

        let ending_period = Self::increment_validator_period(ctx, validator)?;
        let rewards = Self::calculate_delegation_rewards(ctx, validator, delegator, ending_period)?;

        let outstanding = Self::outstanding_rewards(ctx, validator)?;
        let left = outstanding.checked_sub(rewards).map_err(|_| {
            log::error!(target: LOG_TARGET, "{}: rewards {} of {} exceed outstanding {}",
                validator, rewards, delegator, outstanding);
            DistrError::ReconciliationError(format!(
                "rewards {} exceed outstanding {} of {}",
                rewards, outstanding, validator
            ))
        })?;
        ValidatorOutstandingRewards::insert(ctx.store.clone(), validator, &left)?;

        let outcome = if rewards.is_zero() {
            WithdrawOutcome::NoRewards
        } else {
            let to = Self::withdraw_addr(ctx, delegator)?;
            C::AccountAsset::transfer(ctx, &Self::settings().module_account, &to, rewards)
                .map_err(DistrError::account)?;
            log::info!(target: LOG_TARGET, "{} withdrew {} from {} to {}", delegator, rewards, validator, to);
            WithdrawOutcome::Withdrawn { amount: rewards, to }
        };

        Self::decrement_reference_count(ctx, validator, info.previous_period)?;
        DelegatorStartingInfos::remove(ctx.store.clone(), validator, delegator);

        Ok(outcome)
    }

    /// Withdraw all rewards of `delegator` on `validator` and settle the
    /// delegation at the current period.
    ///
    /// A second call in the same block returns `WithdrawOutcome::NoRewards`.
    pub fn withdraw_delegator_reward(
        ctx: &Context,
        delegator: &Address,
        validator: &Address,
    ) -> DistrResult<WithdrawOutcome> {
        if !ValidatorCurrentRewardsStore::contains_key(ctx.store.clone(), validator)? {
            return Err(DistrError::NoValidatorDistInfo(*validator));
        }
        match C::Staking::delegation_stake(ctx, delegator, validator)? {
            None => {
                return Err(DistrError::NoDelegationDistInfo {
                    delegator: *delegator,
                    validator: *validator,
                })
            }
            Some(stake) if stake.is_zero() => {
                return Err(DistrError::EmptyDelegationStake {
                    delegator: *delegator,
                    validator: *validator,
                })
            }
            Some(_) => {}
        }

        let outcome = Self::withdraw_delegation_rewards(ctx, validator, delegator)?;
        Self::initialize_delegation(ctx, validator, delegator)?;
        Ok(outcome)
    }
}
