//! Test runtime: the account module, a store-backed staking module firing
//! the distribution hooks, and a block runner.
#![allow(dead_code)]

use fp_core::{
    context::Context,
    crypto::Address,
    module::{AppModule, RequestBeginBlock},
    transaction::{ActionResult, Applyable, CheckedTransaction},
};
use fp_traits::{
    account::AccountAsset,
    staking::{StakingHooks, StakingInfo},
};
use fp_types::Dec;
use lazy_static::lazy_static;
use module_distribution::{Action, DistributionConfig};
use ruc::*;
use serde::{Deserialize, Serialize};

pub struct TestRuntime;

pub type AccountModule = module_account::App<TestRuntime>;
pub type Distribution = module_distribution::App<TestRuntime>;

fp_core::parameter_types! {
    pub Settings: DistributionConfig = DistributionConfig {
        check_invariants: true,
        ..Default::default()
    };
}

lazy_static! {
    pub static ref FEE_COLLECTOR: Address = Settings::get().fee_collector;
    pub static ref MODULE_ACCOUNT: Address = Settings::get().module_account;
    pub static ref AUTHORITY: Address = Settings::get().authority;
}

impl module_account::Config for TestRuntime {}

impl module_distribution::Config for TestRuntime {
    type AccountAsset = AccountModule;
    type Staking = MockStaking;
    type Settings = Settings;
}

pub fn addr(n: u8) -> Address {
    Address::from_bytes([n; 32])
}

pub fn dec(s: &str) -> Dec {
    s.parse().unwrap()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockValidator {
    pub power: u64,
    pub commission_rate: Dec,
}

pub mod staking_storage {
    use super::MockValidator;
    use fp_core::crypto::Address;
    use fp_storage::*;
    use fp_types::Dec;

    generate_storage!(MockStaking, Validators => Map<Address, MockValidator>);
    // validator, delegator => stake
    generate_storage!(MockStaking, Delegations => DoubleMap<Address, Address, Dec>);
}

use staking_storage::{Delegations, Validators};

/// Staking without bonding rules: validators have a fixed voting power,
/// delegations are plain amounts.
pub struct MockStaking;

impl StakingInfo<Address> for MockStaking {
    fn validator_voting_power(ctx: &Context, validator: &Address) -> Result<u64> {
        Ok(Validators::get(ctx.store.clone(), validator)?
            .map(|v| v.power)
            .unwrap_or_default())
    }

    fn total_voting_power(ctx: &Context) -> Result<u64> {
        Ok(Validators::iterate(ctx.store.clone())?
            .iter()
            .map(|(_, v)| v.power)
            .sum())
    }

    fn bonded_validators(ctx: &Context) -> Result<Vec<(Address, u64)>> {
        Ok(Validators::iterate(ctx.store.clone())?
            .into_iter()
            .filter(|(_, v)| v.power > 0)
            .map(|(a, v)| (a, v.power))
            .collect())
    }

    fn commission_rate(ctx: &Context, validator: &Address) -> Result<Dec> {
        Validators::get(ctx.store.clone(), validator)?
            .map(|v| v.commission_rate)
            .ok_or_else(|| eg!("unknown validator"))
    }

    fn validator_tokens(ctx: &Context, validator: &Address) -> Result<Dec> {
        let mut total = Dec::zero();
        for (_, stake) in Delegations::iterate_prefix(ctx.store.clone(), validator)? {
            total = total.checked_add(stake).map_err(|e| eg!(e))?;
        }
        Ok(total)
    }

    fn delegation_stake(
        ctx: &Context,
        delegator: &Address,
        validator: &Address,
    ) -> Result<Option<Dec>> {
        Delegations::get(ctx.store.clone(), validator, delegator)
    }

    fn validator_delegations(ctx: &Context, validator: &Address) -> Result<Vec<(Address, Dec)>> {
        Delegations::iterate_prefix(ctx.store.clone(), validator)
    }

    fn delegator_validators(ctx: &Context, delegator: &Address) -> Result<Vec<Address>> {
        Ok(Delegations::iterate(ctx.store.clone())?
            .into_iter()
            .filter(|(_, d, _)| d == delegator)
            .map(|(v, _, _)| v)
            .collect())
    }
}

impl MockStaking {
    pub fn create_validator(ctx: &Context, validator: &Address, power: u64, rate: Dec) {
        Validators::insert(
            ctx.store.clone(),
            validator,
            &MockValidator {
                power,
                commission_rate: rate,
            },
        )
        .unwrap();
        Distribution::after_validator_created(ctx, validator).unwrap();
    }

    pub fn set_power(ctx: &Context, validator: &Address, power: u64) {
        let mut v = Validators::get(ctx.store.clone(), validator).unwrap().unwrap();
        v.power = power;
        Validators::insert(ctx.store.clone(), validator, &v).unwrap();
    }

    pub fn delegate(ctx: &Context, delegator: &Address, validator: &Address, amount: Dec) {
        let old = Delegations::get(ctx.store.clone(), validator, delegator).unwrap();
        let hooked = match old {
            Some(_) => Distribution::before_delegation_shares_modified(ctx, delegator, validator),
            None => Distribution::before_delegation_created(ctx, delegator, validator),
        };
        hooked.unwrap();

        let stake = old.unwrap_or_default().checked_add(amount).unwrap();
        Delegations::insert(ctx.store.clone(), validator, delegator, &stake).unwrap();
        Distribution::after_delegation_modified(ctx, delegator, validator).unwrap();
    }

    pub fn undelegate(ctx: &Context, delegator: &Address, validator: &Address, amount: Dec) {
        Distribution::before_delegation_shares_modified(ctx, delegator, validator).unwrap();

        let old = Delegations::get(ctx.store.clone(), validator, delegator)
            .unwrap()
            .unwrap();
        let stake = old.checked_sub(amount).unwrap();
        if stake.is_zero() {
            Delegations::remove(ctx.store.clone(), validator, delegator);
        } else {
            Delegations::insert(ctx.store.clone(), validator, delegator, &stake).unwrap();
        }
        Distribution::after_delegation_modified(ctx, delegator, validator).unwrap();
    }

    /// Burn `fraction` of every delegation, truncating like a real slash.
    pub fn slash(ctx: &Context, validator: &Address, fraction: Dec) {
        Distribution::before_validator_slashed(ctx, validator, fraction).unwrap();

        let keep = Dec::one().checked_sub(fraction).unwrap();
        for (delegator, stake) in Delegations::iterate_prefix(ctx.store.clone(), validator).unwrap()
        {
            let left = stake.checked_mul_trunc(keep).unwrap();
            Delegations::insert(ctx.store.clone(), validator, &delegator, &left).unwrap();
        }
    }

    pub fn remove_validator(ctx: &Context, validator: &Address) {
        assert!(Self::validator_delegations(ctx, validator).unwrap().is_empty());
        Distribution::before_validator_removed(ctx, validator).unwrap();
        Validators::remove(ctx.store.clone(), validator);
    }

    /// Raw copy of the staking state, hooks are not involved.
    pub fn export(ctx: &Context) -> (Vec<(Address, MockValidator)>, Vec<(Address, Address, Dec)>) {
        (
            Validators::iterate(ctx.store.clone()).unwrap(),
            Delegations::iterate(ctx.store.clone()).unwrap(),
        )
    }

    pub fn import(
        ctx: &Context,
        validators: &[(Address, MockValidator)],
        delegations: &[(Address, Address, Dec)],
    ) {
        for (v, info) in validators.iter() {
            Validators::insert(ctx.store.clone(), v, info).unwrap();
        }
        for (v, d, stake) in delegations.iter() {
            Delegations::insert(ctx.store.clone(), v, d, stake).unwrap();
        }
    }
}

pub fn setup_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A chain over an in-memory store, one block at a time.
pub struct TestChain {
    pub ctx: Context,
    pub app: Distribution,
}

impl TestChain {
    pub fn new(name: &str) -> Self {
        setup_logger();
        TestChain {
            ctx: Context::in_memory(name),
            app: Distribution::new(),
        }
    }

    pub fn height(&self) -> u64 {
        self.ctx.block_height()
    }

    /// Start the next block with `fees` waiting in the fee collector.
    pub fn begin_block(&mut self, fees: Dec) -> Result<()> {
        self.ctx.header.height += 1;
        if !fees.is_zero() {
            AccountModule::mint(&self.ctx, &FEE_COLLECTOR, fees)?;
        }
        let req = RequestBeginBlock {
            hash: self.ctx.header.height.to_be_bytes().to_vec(),
            header: self.ctx.header.clone(),
        };
        self.app.begin_block(&mut self.ctx, &req)
    }

    /// Validate and run one transaction, its writes are kept only if it succeeds.
    pub fn deliver(&self, tx: CheckedTransaction<Address, Action>) -> Result<ActionResult> {
        tx.validate::<Distribution>(&self.ctx)?;
        match tx.apply::<Distribution>(&self.ctx) {
            Ok(res) => {
                self.ctx.store.write().commit_session();
                Ok(res)
            }
            Err(e) => {
                self.ctx.store.write().discard_session();
                Err(e)
            }
        }
    }

    pub fn commit(&mut self) {
        let height = self.ctx.block_height();
        self.ctx.store.write().commit(height).unwrap();
    }

    /// Drop everything written since the last commit.
    pub fn discard(&mut self) {
        self.ctx.store.write().discard();
        self.ctx.header.height -= 1;
    }

    /// Run and commit a whole block, or discard it on failure.
    pub fn run_block(&mut self, fees: Dec) -> Result<()> {
        match self.begin_block(fees) {
            Ok(()) => {
                self.commit();
                Ok(())
            }
            Err(e) => {
                self.discard();
                Err(e)
            }
        }
    }

    pub fn balance(&self, who: &Address) -> Dec {
        AccountModule::balance(&self.ctx, who).unwrap()
    }

    pub fn root_hash(&self) -> Vec<u8> {
        let cs = self.ctx.store.read().chain_state();
        let hash = cs.read().root_hash().unwrap();
        hash
    }
}
