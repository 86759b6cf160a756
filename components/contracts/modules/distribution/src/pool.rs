use crate::storage::*;
use crate::{errors::*, types::*, App, Config, LOG_TARGET};
use fp_core::{context::Context, crypto::Address};
use fp_traits::account::AccountAsset;
use fp_types::Dec;

impl<C: Config> App<C> {
    pub fn params(ctx: &Context) -> DistrResult<Params> {
        ParamsStore::get_or_default(ctx.store.clone()).map_err(DistrError::from)
    }

    pub fn set_params(ctx: &Context, params: &Params) -> DistrResult<()> {
        params.validate()?;
        ParamsStore::put(ctx.store.clone(), params).map_err(DistrError::from)
    }

    pub fn fee_pool(ctx: &Context) -> DistrResult<FeePool> {
        FeePoolStore::get_or_default(ctx.store.clone()).map_err(DistrError::from)
    }

    /// Deposit `amount` from `depositor` into the community pool.
    pub fn fund_community_pool(ctx: &Context, depositor: &Address, amount: Dec) -> DistrResult<()> {
        if Self::settings().is_blocked(depositor) {
            return Err(DistrError::BlockedPoolAccount(*depositor));
        }
        C::AccountAsset::transfer(ctx, depositor, &Self::settings().module_account, amount)
            .map_err(DistrError::account)?;

        let mut fee_pool = Self::fee_pool(ctx)?;
        fee_pool.community_pool = fee_pool.community_pool.checked_add(amount)?;
        FeePoolStore::put(ctx.store.clone(), &fee_pool)?;
        Ok(())
    }

    /// Pay `amount` out of the community pool.
    ///
    /// Authorization is up to the caller. Paying the module account or the
    /// fee collector would leave the funds unaccounted for, so both are refused.
    pub fn spend_community_pool(ctx: &Context, recipient: &Address, amount: Dec) -> DistrResult<()> {
        if Self::settings().is_blocked(recipient) {
            return Err(DistrError::BlockedPoolAccount(*recipient));
        }

        let mut fee_pool = Self::fee_pool(ctx)?;
        let available = fee_pool.community_pool;
        fee_pool.community_pool = available.checked_sub(amount).map_err(|_| {
            DistrError::InsufficientPoolFunds {
                requested: amount,
                available,
            }
        })?;

        FeePoolStore::put(ctx.store.clone(), &fee_pool)?;
        C::AccountAsset::transfer(ctx, &Self::settings().module_account, recipient, amount)
            .map_err(DistrError::account)?;

        log::info!(target: LOG_TARGET, "community pool paid {} to {}", amount, recipient);
        Ok(())
    }

    /// Where the rewards of `delegator` go, itself unless redirected.
    pub fn withdraw_addr(ctx: &Context, delegator: &Address) -> DistrResult<Address> {
        DelegatorWithdrawAddr::get(ctx.store.clone(), delegator)
            .map(|addr| addr.unwrap_or(*delegator))
            .map_err(DistrError::from)
    }

    /// Redirect the rewards of `delegator`, allowed once per delegator.
    pub fn set_withdraw_addr(
        ctx: &Context,
        delegator: &Address,
        withdraw_addr: &Address,
    ) -> DistrResult<()> {
        if Self::settings().is_blocked(withdraw_addr) {
            return Err(DistrError::BlockedWithdrawAddress(*withdraw_addr));
        }
        if !Self::params(ctx)?.withdraw_addr_enabled {
            return Err(DistrError::WithdrawAddrDisabled);
        }
        if DelegatorWithdrawAddr::contains_key(ctx.store.clone(), delegator)? {
            return Err(DistrError::WithdrawAddressAlreadySet(*delegator));
        }

        DelegatorWithdrawAddr::insert(ctx.store.clone(), delegator, withdraw_addr)?;
        Ok(())
    }
}
