//! In-place upgrades of the stored layout.
//!
//! | version | layout |
//! |---|---|
//! | 1 | historical ratio stored bare, reference counts in a separate item, params inside the fee pool |
//! | 2 | historical ratio and reference count in one record |
//! | 3 | params in their own item, proposer rewards dropped |
//!
//! No migration changes the rewards anybody can withdraw.

use super::*;
use crate::storage::*;
use fp_core::module::AppModuleMigration;
use std::collections::BTreeSet;

pub const CONSENSUS_VERSION: u64 = 3;

/// Items of older layouts, under the keys they used to occupy.
pub mod legacy {
    use fp_core::crypto::Address;
    use fp_storage::*;
    use fp_types::Dec;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LegacyFeePool {
        pub community_pool: Dec,
        pub community_tax: Dec,
        pub base_proposer_reward: Dec,
        pub bonus_proposer_reward: Dec,
        pub withdraw_addr_enabled: bool,
    }

    // v1: validator, period => cumulative ratio
    generate_storage!(Distribution, ValidatorHistoricalRewardsStore => DoubleMap<Address, u64, Dec>);
    // v1: validator, period => reference count
    generate_storage!(Distribution, HistoricalReferenceCount => DoubleMap<Address, u64, u32>);
    // v1, v2
    generate_storage!(Distribution, FeePoolStore => Value<LegacyFeePool>);
}

impl<C: Config> App<C> {
    /// Layout version found in the store, 1 when never recorded.
    pub fn stored_consensus_version(ctx: &Context) -> DistrResult<u64> {
        ConsensusVersion::get(ctx.store.clone())
            .map(|v| v.unwrap_or(1))
            .map_err(DistrError::from)
    }

    /// Merge the bare ratios and the reference counts into one record.
    pub fn migrate_v1_to_v2(ctx: &Context) -> DistrResult<()> {
        let ratios = legacy::ValidatorHistoricalRewardsStore::iterate(ctx.store.clone())?;

        let mut validators = BTreeSet::new();
        for (validator, period, ratio) in ratios.iter() {
            let reference_count =
                legacy::HistoricalReferenceCount::get(ctx.store.clone(), validator, period)?
                    .ok_or_else(|| {
                        DistrError::ReconciliationError(format!(
                            "no reference count for period {} of {}",
                            period, validator
                        ))
                    })?;
            ValidatorHistoricalRewardsStore::insert(
                ctx.store.clone(),
                validator,
                period,
                &ValidatorHistoricalRewards {
                    cumulative_reward_ratio: *ratio,
                    reference_count,
                },
            )?;
            validators.insert(*validator);
        }

        // counts of pruned periods may linger
        for (validator, _, _) in legacy::HistoricalReferenceCount::iterate(ctx.store.clone())? {
            validators.insert(validator);
        }
        for validator in validators.iter() {
            legacy::HistoricalReferenceCount::remove_prefix(ctx.store.clone(), validator)?;
        }

        log::info!(target: LOG_TARGET, "migrated {} historical records to v2, {} validators",
            ratios.len(), validators.len());
        Ok(())
    }

    /// Move the params out of the fee pool.
    pub fn migrate_v2_to_v3(ctx: &Context) -> DistrResult<()> {
        let old = legacy::FeePoolStore::get_or_default(ctx.store.clone())?;

        Self::set_params(
            ctx,
            &Params {
                community_tax: old.community_tax,
                withdraw_addr_enabled: old.withdraw_addr_enabled,
            },
        )?;
        FeePoolStore::put(
            ctx.store.clone(),
            &FeePool {
                community_pool: old.community_pool,
            },
        )?;

        log::info!(target: LOG_TARGET, "migrated fee pool to v3, dropped proposer rewards {} and {}",
            old.base_proposer_reward, old.bonus_proposer_reward);
        Ok(())
    }

    pub fn migrate(ctx: &Context, from_version: u64) -> DistrResult<()> {
        match from_version {
            1 => {
                Self::migrate_v1_to_v2(ctx)?;
                Self::migrate_v2_to_v3(ctx)?;
            }
            2 => Self::migrate_v2_to_v3(ctx)?,
            CONSENSUS_VERSION => {}
            from => return Err(DistrError::UnknownMigration { from }),
        }
        ConsensusVersion::put(ctx.store.clone(), &CONSENSUS_VERSION)?;
        Ok(())
    }
}

impl<C: Config> AppModuleMigration for App<C> {
    fn run_migrations(&self, ctx: &Context, from_version: u64) -> Result<()> {
        Self::migrate(ctx, from_version).c(d!())
    }
}
