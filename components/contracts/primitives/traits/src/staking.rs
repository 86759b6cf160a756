use fp_core::context::Context;
use fp_types::Dec;
use ruc::Result;

/// Read access to the bonding state owned by the staking module.
///
/// Every list is returned in ascending address order.
pub trait StakingInfo<Address> {
    /// Voting power of a bonded validator, zero otherwise.
    fn validator_voting_power(ctx: &Context, validator: &Address) -> Result<u64>;

    /// Sum of the voting power of all bonded validators.
    fn total_voting_power(ctx: &Context) -> Result<u64>;

    /// `(validator, voting power)` of all bonded validators.
    fn bonded_validators(ctx: &Context) -> Result<Vec<(Address, u64)>>;

    /// Commission rate of a validator, in `[0, 1]`.
    fn commission_rate(ctx: &Context, validator: &Address) -> Result<Dec>;

    /// Total stake currently delegated to a validator.
    fn validator_tokens(ctx: &Context, validator: &Address) -> Result<Dec>;

    /// Current stake of a delegation, `None` if it does not exist.
    fn delegation_stake(
        ctx: &Context,
        delegator: &Address,
        validator: &Address,
    ) -> Result<Option<Dec>>;

    /// `(delegator, stake)` of all delegations to `validator`.
    fn validator_delegations(ctx: &Context, validator: &Address) -> Result<Vec<(Address, Dec)>>;

    /// Validators `delegator` currently delegates to.
    fn delegator_validators(ctx: &Context, delegator: &Address) -> Result<Vec<Address>>;
}

/// Callbacks the staking module runs around its own state changes.
///
/// The `before_*` hooks observe the state prior to the change,
/// the `after_*` hooks the state once it is applied.
pub trait StakingHooks<Address> {
    fn after_validator_created(_ctx: &Context, _validator: &Address) -> Result<()> {
        Ok(())
    }

    fn before_delegation_created(
        _ctx: &Context,
        _delegator: &Address,
        _validator: &Address,
    ) -> Result<()> {
        Ok(())
    }

    fn before_delegation_shares_modified(
        _ctx: &Context,
        _delegator: &Address,
        _validator: &Address,
    ) -> Result<()> {
        Ok(())
    }

    fn after_delegation_modified(
        _ctx: &Context,
        _delegator: &Address,
        _validator: &Address,
    ) -> Result<()> {
        Ok(())
    }

    /// `fraction` of the validator's stake is about to be burned.
    fn before_validator_slashed(_ctx: &Context, _validator: &Address, _fraction: Dec) -> Result<()> {
        Ok(())
    }

    /// The validator has no delegations left and is about to be deleted.
    fn before_validator_removed(_ctx: &Context, _validator: &Address) -> Result<()> {
        Ok(())
    }
}

impl<Address> StakingHooks<Address> for () {}
