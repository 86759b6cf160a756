//! Period ledger of a validator.
//!
//! Period `p` is closed by writing its cumulative reward ratio as
//! `historical[p]`; closed records are never rewritten. A record lives as
//! long as something references it: the next period, a delegation
//! starting there, or a slash event that closed it.

use crate::storage::*;
use crate::{errors::*, types::*, App, Config, LOG_TARGET};
use fp_core::{context::Context, crypto::Address};
use fp_types::Dec;

impl<C: Config> App<C> {
    /// Open the ledger of a new validator: period 0 closed at ratio zero,
    /// period 1 open.
    pub fn initialize_validator(ctx: &Context, validator: &Address) -> DistrResult<()> {
        ValidatorHistoricalRewardsStore::insert(
            ctx.store.clone(),
            validator,
            &0,
            &ValidatorHistoricalRewards {
                cumulative_reward_ratio: Dec::zero(),
                reference_count: 1,
            },
        )?;
        ValidatorCurrentRewardsStore::insert(
            ctx.store.clone(),
            validator,
            &ValidatorCurrentRewards {
                reward_ratio: Dec::zero(),
                period: 1,
            },
        )?;
        ValidatorAccumulatedCommission::insert(ctx.store.clone(), validator, &Dec::zero())?;
        ValidatorOutstandingRewards::insert(ctx.store.clone(), validator, &Dec::zero())?;
        Ok(())
    }

    pub fn current_rewards(
        ctx: &Context,
        validator: &Address,
    ) -> DistrResult<ValidatorCurrentRewards> {
        ValidatorCurrentRewardsStore::get(ctx.store.clone(), validator)?
            .ok_or(DistrError::NoValidatorDistInfo(*validator))
    }

    pub fn historical_rewards(
        ctx: &Context,
        validator: &Address,
        period: u64,
    ) -> DistrResult<ValidatorHistoricalRewards> {
        ValidatorHistoricalRewardsStore::get(ctx.store.clone(), validator, &period)?.ok_or_else(
            || {
                DistrError::ReconciliationError(format!(
                    "missing historical rewards of {} at period {}",
                    validator, period
                ))
            },
        )
    }

    /// Close the open period of `validator` and return its number.
    pub fn increment_validator_period(ctx: &Context, validator: &Address) -> DistrResult<u64> {
        let current = Self::current_rewards(ctx, validator)?;
        let closed = current.period;
        let previous = Self::historical_rewards(ctx, validator, closed - 1)?;

        let cumulative = previous
            .cumulative_reward_ratio
            .checked_add(current.reward_ratio)?;

        Self::decrement_reference_count(ctx, validator, closed - 1)?;
        ValidatorHistoricalRewardsStore::insert(
            ctx.store.clone(),
            validator,
            &closed,
            &ValidatorHistoricalRewards {
                cumulative_reward_ratio: cumulative,
                reference_count: 1,
            },
        )?;
        ValidatorCurrentRewardsStore::insert(
            ctx.store.clone(),
            validator,
            &ValidatorCurrentRewards {
                reward_ratio: Dec::zero(),
                period: closed + 1,
            },
        )?;

        log::debug!(target: LOG_TARGET, "{}: closed period {} at ratio {}", validator, closed, cumulative);
        Ok(closed)
    }

    pub(crate) fn increment_reference_count(
        ctx: &Context,
        validator: &Address,
        period: u64,
    ) -> DistrResult<()> {
        let mut record = Self::historical_rewards(ctx, validator, period)?;
        record.reference_count = record.reference_count.checked_add(1).ok_or_else(|| {
            DistrError::ReconciliationError("reference count overflow".to_owned())
        })?;
        ValidatorHistoricalRewardsStore::insert(ctx.store.clone(), validator, &period, &record)?;
        Ok(())
    }

    /// Release one reference, pruning the record once nothing points at it.
    pub(crate) fn decrement_reference_count(
        ctx: &Context,
        validator: &Address,
        period: u64,
    ) -> DistrResult<()> {
        let mut record = Self::historical_rewards(ctx, validator, period)?;
        if record.reference_count == 0 {
            log::error!(target: LOG_TARGET, "{}: reference count of period {} underflows", validator, period);
            return Err(DistrError::ReconciliationError(format!(
                "reference count of {} at period {} is already zero",
                validator, period
            )));
        }

        record.reference_count -= 1;
        if record.reference_count == 0 {
            log::debug!(target: LOG_TARGET, "{}: pruned period {}", validator, period);
            ValidatorHistoricalRewardsStore::remove(ctx.store.clone(), validator, &period);
        } else {
            ValidatorHistoricalRewardsStore::insert(ctx.store.clone(), validator, &period, &record)?;
        }
        Ok(())
    }
}
