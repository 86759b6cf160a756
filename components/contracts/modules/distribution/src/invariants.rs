//! Crisis checks over the whole module state.
//!
//! Each check returns `InvariantBroken` with a description of the first
//! violation it finds.

use crate::storage::*;
use crate::{errors::*, App, Config, LOG_TARGET};
use fp_core::context::Context;
use fp_traits::{account::AccountAsset, staking::StakingInfo};
use std::collections::BTreeMap;

impl<C: Config> App<C> {
    /// Run every check, stopping at the first broken one.
    pub fn assert_invariants(ctx: &Context) -> DistrResult<()> {
        Self::nonnegative_outstanding_invariant(ctx)?;
        Self::reference_count_invariant(ctx)?;
        Self::module_account_invariant(ctx)?;
        Self::can_withdraw_invariant(ctx)?;
        Ok(())
    }

    /// Every stored amount decodes to a non-negative decimal.
    pub fn nonnegative_outstanding_invariant(ctx: &Context) -> DistrResult<()> {
        let broken = |e: Box<dyn ruc::RucError>| {
            DistrError::InvariantBroken(format!("undecodable outstanding amount: {}", e))
        };
        ValidatorOutstandingRewards::iterate(ctx.store.clone()).map_err(broken)?;
        ValidatorAccumulatedCommission::iterate(ctx.store.clone()).map_err(broken)?;
        Ok(())
    }

    /// Historical records are referenced exactly by the open period, the
    /// delegations and the slash events of their validator.
    pub fn reference_count_invariant(ctx: &Context) -> DistrResult<()> {
        let mut expected: BTreeMap<_, u64> = BTreeMap::new();
        for (validator, _) in ValidatorCurrentRewardsStore::iterate(ctx.store.clone())? {
            *expected.entry(validator).or_default() += 1;
        }
        for (validator, _, _) in DelegatorStartingInfos::iterate(ctx.store.clone())? {
            *expected.entry(validator).or_default() += 1;
        }
        for (validator, _, _) in ValidatorSlashEvents::iterate(ctx.store.clone())? {
            *expected.entry(validator).or_default() += 1;
        }

        let mut actual: BTreeMap<_, u64> = BTreeMap::new();
        for (validator, _, record) in ValidatorHistoricalRewardsStore::iterate(ctx.store.clone())? {
            *actual.entry(validator).or_default() += record.reference_count as u64;
        }

        if expected != actual {
            return Err(DistrError::InvariantBroken(format!(
                "reference counts {:?} differ from references {:?}",
                actual, expected
            )));
        }
        Ok(())
    }

    /// The module account holds exactly the pool and everything owed.
    pub fn module_account_invariant(ctx: &Context) -> DistrResult<()> {
        let mut expected = Self::fee_pool(ctx)?.community_pool;
        for (_, amount) in ValidatorOutstandingRewards::iterate(ctx.store.clone())? {
            expected = expected.checked_add(amount)?;
        }
        for (_, amount) in ValidatorAccumulatedCommission::iterate(ctx.store.clone())? {
            expected = expected.checked_add(amount)?;
        }

        let balance = C::AccountAsset::balance(ctx, &Self::settings().module_account)?;
        if balance != expected {
            return Err(DistrError::InvariantBroken(format!(
                "module account holds {}, expected {}",
                balance, expected
            )));
        }
        Ok(())
    }

    /// Withdrawing everything, on a fork, never overdraws a validator.
    ///
    /// An overdraft surfaces as a `ReconciliationError` of the withdrawal.
    pub fn can_withdraw_invariant(ctx: &Context) -> DistrResult<()> {
        let fork = ctx.fork();
        let validators = ValidatorCurrentRewardsStore::iterate(fork.store.clone())?;

        for (validator, _) in validators.iter() {
            Self::withdraw_validator_commission(&fork, validator)
                .map_err(|e| DistrError::InvariantBroken(e.to_string()))?;

            for (delegator, _) in C::Staking::validator_delegations(&fork, validator)? {
                Self::withdraw_delegation_rewards(&fork, validator, &delegator)
                    .map_err(|e| DistrError::InvariantBroken(e.to_string()))?;
            }

            let left = Self::outstanding_rewards(&fork, validator)?;
            log::debug!(target: LOG_TARGET, "{}: {} left after withdrawing everything", validator, left);
        }
        Ok(())
    }
}
