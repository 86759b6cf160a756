use super::*;
use crate::storage::*;
use fp_core::module::AppModuleGenesis;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorWithdrawInfo {
    pub delegator_address: Address,
    pub withdraw_address: Address,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorOutstandingRewardsRecord {
    pub validator_address: Address,
    pub outstanding_rewards: Dec,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorAccumulatedCommissionRecord {
    pub validator_address: Address,
    pub accumulated: Dec,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorHistoricalRewardsRecord {
    pub validator_address: Address,
    pub period: u64,
    pub rewards: ValidatorHistoricalRewards,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorCurrentRewardsRecord {
    pub validator_address: Address,
    pub rewards: ValidatorCurrentRewards,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorStartingInfoRecord {
    pub delegator_address: Address,
    pub validator_address: Address,
    pub starting_info: DelegatorStartingInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSlashEventRecord {
    pub validator_address: Address,
    pub height: u64,
    pub period: u64,
    pub validator_slash_event: ValidatorSlashEvent,
}

/// Everything the module stores, in storage key order.
///
/// Exporting then importing reproduces the exact same store, so later
/// blocks compute the same rewards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisState {
    pub params: Params,
    pub fee_pool: FeePool,
    pub delegator_withdraw_infos: Vec<DelegatorWithdrawInfo>,
    pub outstanding_rewards: Vec<ValidatorOutstandingRewardsRecord>,
    pub validator_accumulated_commissions: Vec<ValidatorAccumulatedCommissionRecord>,
    pub validator_historical_rewards: Vec<ValidatorHistoricalRewardsRecord>,
    pub validator_current_rewards: Vec<ValidatorCurrentRewardsRecord>,
    pub delegator_starting_infos: Vec<DelegatorStartingInfoRecord>,
    pub validator_slash_events: Vec<ValidatorSlashEventRecord>,
}

impl GenesisState {
    pub fn validate(&self) -> DistrResult<()> {
        self.params.validate()?;

        let invalid = |msg: String| Err(DistrError::InvalidGenesis(msg));

        let mut seen = BTreeSet::new();
        for info in self.delegator_withdraw_infos.iter() {
            if !seen.insert(info.delegator_address) {
                return invalid(format!(
                    "duplicate withdraw address of {}",
                    info.delegator_address
                ));
            }
        }

        let periods: BTreeSet<(Address, u64)> = self
            .validator_historical_rewards
            .iter()
            .map(|r| (r.validator_address, r.period))
            .collect();
        if periods.len() != self.validator_historical_rewards.len() {
            return invalid("duplicate historical rewards record".to_owned());
        }

        let mut current = BTreeSet::new();
        for record in self.validator_current_rewards.iter() {
            let validator = record.validator_address;
            if !current.insert(validator) {
                return invalid(format!("duplicate current rewards of {}", validator));
            }
            if record.rewards.period == 0
                || !periods.contains(&(validator, record.rewards.period - 1))
            {
                return invalid(format!(
                    "{} has no record of the period before {}",
                    validator, record.rewards.period
                ));
            }
        }

        for record in self.delegator_starting_infos.iter() {
            let key = (
                record.validator_address,
                record.starting_info.previous_period,
            );
            if !periods.contains(&key) {
                return invalid(format!(
                    "delegation of {} on {} starts at unknown period {}",
                    record.delegator_address, key.0, key.1
                ));
            }
        }

        for record in self.validator_slash_events.iter() {
            if record.period != record.validator_slash_event.validator_period {
                return invalid(format!(
                    "slash event of {} filed under period {} closes {}",
                    record.validator_address,
                    record.period,
                    record.validator_slash_event.validator_period
                ));
            }
            if record.validator_slash_event.fraction > Dec::one() {
                return invalid(format!(
                    "slash fraction {} of {} above one",
                    record.validator_slash_event.fraction, record.validator_address
                ));
            }
        }

        self.validate_reference_counts()
    }

    /// Each validator's records are referenced exactly by its open period,
    /// its delegations and its slash events.
    fn validate_reference_counts(&self) -> DistrResult<()> {
        let mut references: BTreeMap<Address, u64> = BTreeMap::new();
        let validators = self
            .validator_current_rewards
            .iter()
            .map(|r| r.validator_address)
            .chain(
                self.delegator_starting_infos
                    .iter()
                    .map(|r| r.validator_address),
            )
            .chain(self.validator_slash_events.iter().map(|r| r.validator_address));
        for validator in validators {
            *references.entry(validator).or_default() += 1;
        }

        let mut counted: BTreeMap<Address, u64> = BTreeMap::new();
        for r in self.validator_historical_rewards.iter() {
            *counted.entry(r.validator_address).or_default() += r.rewards.reference_count as u64;
        }

        if let Some((validator, count)) = counted
            .iter()
            .find(|(v, c)| references.get(*v).copied().unwrap_or_default() != **c)
        {
            return Err(DistrError::InvalidGenesis(format!(
                "records of {} count {} references, found {}",
                validator,
                count,
                references.get(validator).copied().unwrap_or_default()
            )));
        }
        if let Some(validator) = references.keys().find(|v| !counted.contains_key(*v)) {
            return Err(DistrError::InvalidGenesis(format!(
                "{} is referenced but has no historical records",
                validator
            )));
        }
        Ok(())
    }

    /// What the module account must hold: the pool and everything owed.
    pub fn module_holdings(&self) -> DistrResult<Dec> {
        let mut total = self.fee_pool.community_pool;
        for r in self.outstanding_rewards.iter() {
            total = total.checked_add(r.outstanding_rewards)?;
        }
        for r in self.validator_accumulated_commissions.iter() {
            total = total.checked_add(r.accumulated)?;
        }
        Ok(total)
    }
}

impl<C: Config> App<C> {
    pub fn import_genesis(ctx: &Context, genesis: &GenesisState) -> DistrResult<()> {
        genesis.validate()?;

        let expected = genesis.module_holdings()?;
        let balance = C::AccountAsset::balance(ctx, &Self::settings().module_account)?;
        if balance != expected {
            return Err(DistrError::InvalidGenesis(format!(
                "module account holds {}, genesis accounts for {}",
                balance, expected
            )));
        }

        let store = || ctx.store.clone();
        ParamsStore::put(store(), &genesis.params)?;
        FeePoolStore::put(store(), &genesis.fee_pool)?;
        for info in genesis.delegator_withdraw_infos.iter() {
            DelegatorWithdrawAddr::insert(
                store(),
                &info.delegator_address,
                &info.withdraw_address,
            )?;
        }
        for r in genesis.outstanding_rewards.iter() {
            ValidatorOutstandingRewards::insert(
                store(),
                &r.validator_address,
                &r.outstanding_rewards,
            )?;
        }
        for r in genesis.validator_accumulated_commissions.iter() {
            ValidatorAccumulatedCommission::insert(store(), &r.validator_address, &r.accumulated)?;
        }
        for r in genesis.validator_historical_rewards.iter() {
            ValidatorHistoricalRewardsStore::insert(
                store(),
                &r.validator_address,
                &r.period,
                &r.rewards,
            )?;
        }
        for r in genesis.validator_current_rewards.iter() {
            ValidatorCurrentRewardsStore::insert(store(), &r.validator_address, &r.rewards)?;
        }
        for r in genesis.delegator_starting_infos.iter() {
            DelegatorStartingInfos::insert(
                store(),
                &r.validator_address,
                &r.delegator_address,
                &r.starting_info,
            )?;
        }
        for r in genesis.validator_slash_events.iter() {
            ValidatorSlashEvents::insert(
                store(),
                &r.validator_address,
                &(r.height, r.period),
                &r.validator_slash_event,
            )?;
        }
        ConsensusVersion::put(store(), &CONSENSUS_VERSION)?;

        log::info!(target: LOG_TARGET, "genesis loaded: {} validators, {} delegations, community pool {}",
            genesis.validator_current_rewards.len(), genesis.delegator_starting_infos.len(),
            genesis.fee_pool.community_pool);
        Ok(())
    }

    pub fn dump_genesis(ctx: &Context) -> DistrResult<GenesisState> {
        let store = || ctx.store.clone();
        Ok(GenesisState {
            params: Self::params(ctx)?,
            fee_pool: Self::fee_pool(ctx)?,
            delegator_withdraw_infos: DelegatorWithdrawAddr::iterate(store())?
                .into_iter()
                .map(|(delegator_address, withdraw_address)| DelegatorWithdrawInfo {
                    delegator_address,
                    withdraw_address,
                })
                .collect(),
            outstanding_rewards: ValidatorOutstandingRewards::iterate(store())?
                .into_iter()
                .map(|(validator_address, outstanding_rewards)| {
                    ValidatorOutstandingRewardsRecord {
                        validator_address,
                        outstanding_rewards,
                    }
                })
                .collect(),
            validator_accumulated_commissions: ValidatorAccumulatedCommission::iterate(store())?
                .into_iter()
                .map(|(validator_address, accumulated)| {
                    ValidatorAccumulatedCommissionRecord {
                        validator_address,
                        accumulated,
                    }
                })
                .collect(),
            validator_historical_rewards: ValidatorHistoricalRewardsStore::iterate(store())?
                .into_iter()
                .map(|(validator_address, period, rewards)| {
                    ValidatorHistoricalRewardsRecord {
                        validator_address,
                        period,
                        rewards,
                    }
                })
                .collect(),
            validator_current_rewards: ValidatorCurrentRewardsStore::iterate(store())?
                .into_iter()
                .map(|(validator_address, rewards)| ValidatorCurrentRewardsRecord {
                    validator_address,
                    rewards,
                })
                .collect(),
            delegator_starting_infos: DelegatorStartingInfos::iterate(store())?
                .into_iter()
                .map(|(validator_address, delegator_address, starting_info)| {
                    DelegatorStartingInfoRecord {
                        delegator_address,
                        validator_address,
                        starting_info,
                    }
                })
                .collect(),
            validator_slash_events: ValidatorSlashEvents::iterate(store())?
                .into_iter()
                .map(|(validator_address, (height, period), validator_slash_event)| {
                    ValidatorSlashEventRecord {
                        validator_address,
                        height,
                        period,
                        validator_slash_event,
                    }
                })
                .collect(),
        })
    }
}

impl<C: Config> AppModuleGenesis for App<C> {
    fn init_genesis(&self, ctx: &Context, data: &[u8]) -> Result<()> {
        let genesis: GenesisState = serde_json::from_slice(data).c(d!())?;
        Self::import_genesis(ctx, &genesis).c(d!())
    }

    fn export_genesis(&self, ctx: &Context) -> Result<Vec<u8>> {
        let genesis = Self::dump_genesis(ctx).c(d!())?;
        serde_json::to_vec(&genesis).c(d!())
    }
}
