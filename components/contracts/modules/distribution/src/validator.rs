use crate::storage::*;
use crate::{errors::*, types::*, App, Config, LOG_TARGET};
use fp_core::{context::Context, crypto::Address};
use fp_traits::account::AccountAsset;
use fp_types::Dec;

impl<C: Config> App<C> {
    pub fn outstanding_rewards(ctx: &Context, validator: &Address) -> DistrResult<Dec> {
        ValidatorOutstandingRewards::get(ctx.store.clone(), validator)?
            .ok_or(DistrError::NoValidatorDistInfo(*validator))
    }

    pub fn accumulated_commission(ctx: &Context, validator: &Address) -> DistrResult<Dec> {
        ValidatorAccumulatedCommission::get(ctx.store.clone(), validator)?
            .ok_or(DistrError::NoValidatorDistInfo(*validator))
    }

    /// Pay the whole accumulated commission to the operator's withdraw address.
    pub fn withdraw_validator_commission(
        ctx: &Context,
        validator: &Address,
    ) -> DistrResult<WithdrawOutcome> {
        let commission = Self::accumulated_commission(ctx, validator)?;
        if commission.is_zero() {
            return Ok(WithdrawOutcome::NoRewards);
        }

        ValidatorAccumulatedCommission::insert(ctx.store.clone(), validator, &Dec::zero())?;
        let to = Self::withdraw_addr(ctx, validator)?;
        C::AccountAsset::transfer(ctx, &Self::settings().module_account, &to, commission)
            .map_err(DistrError::account)?;

        log::info!(target: LOG_TARGET, "{} withdrew commission {} to {}", validator, commission, to);
        Ok(WithdrawOutcome::Withdrawn {
            amount: commission,
            to,
        })
    }

    /// Record a slash: close the open period and keep it referenced by the
    /// slash event.
    ///
    /// Rewards up to the slash are untouched; from the closed period on,
    /// delegator stakes count for `1 - fraction` of their former size.
    pub fn record_slash(ctx: &Context, validator: &Address, fraction: Dec) -> DistrResult<()> {
        if fraction > Dec::one() {
            return Err(DistrError::InvalidParams(format!(
                "slash fraction {} above one",
                fraction
            )));
        }

        let period = Self::increment_validator_period(ctx, validator)?;
        Self::increment_reference_count(ctx, validator, period)?;
        ValidatorSlashEvents::insert(
            ctx.store.clone(),
            validator,
            &(ctx.block_height(), period),
            &ValidatorSlashEvent {
                validator_period: period,
                fraction,
            },
        )?;

        log::info!(target: LOG_TARGET, "{} slashed by {} at period {}", validator, fraction, period);
        Ok(())
    }

    pub fn slash_events(
        ctx: &Context,
        validator: &Address,
    ) -> DistrResult<Vec<(u64, ValidatorSlashEvent)>> {
        ValidatorSlashEvents::iterate_prefix(ctx.store.clone(), validator)
            .map(|events| events.into_iter().map(|((h, _), e)| (h, e)).collect())
            .map_err(DistrError::from)
    }

    /// Drop every record of a validator that has no delegation left.
    ///
    /// Commission goes to the operator, leftover truncation dust of the
    /// delegator rewards to the community pool.
    pub fn remove_validator(ctx: &Context, validator: &Address) -> DistrResult<()> {
        Self::withdraw_validator_commission(ctx, validator)?;

        let dust = Self::outstanding_rewards(ctx, validator)?;
        if !dust.is_zero() {
            let mut fee_pool = Self::fee_pool(ctx)?;
            fee_pool.community_pool = fee_pool.community_pool.checked_add(dust)?;
            FeePoolStore::put(ctx.store.clone(), &fee_pool)?;
        }

        ValidatorOutstandingRewards::remove(ctx.store.clone(), validator);
        ValidatorAccumulatedCommission::remove(ctx.store.clone(), validator);
        ValidatorSlashEvents::remove_prefix(ctx.store.clone(), validator)?;
        DelegatorStartingInfos::remove_prefix(ctx.store.clone(), validator)?;
        ValidatorHistoricalRewardsStore::remove_prefix(ctx.store.clone(), validator)?;
        ValidatorCurrentRewardsStore::remove(ctx.store.clone(), validator);

        log::info!(target: LOG_TARGET, "{} removed, {} moved to the community pool", validator, dust);
        Ok(())
    }
}
