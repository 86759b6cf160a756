use crate::storage::*;
use crate::{App, Config, SmartAccount};
use fp_core::{context::Context, crypto::Address};
use fp_traits::account::AccountAsset;
use fp_types::Dec;
use ruc::*;

impl<C: Config> App<C> {
    pub fn account_of(ctx: &Context, who: &Address) -> Result<Option<SmartAccount>> {
        AccountStore::get(ctx.store.clone(), who)
    }

    // Transfer some balance from `sender` to `dest`
    pub fn do_transfer(
        ctx: &Context,
        sender: &Address,
        dest: &Address,
        balance: Dec,
    ) -> Result<()> {
        if balance.is_zero() || sender == dest {
            return Ok(());
        }
        let mut from_account: SmartAccount = AccountStore::get(ctx.store.clone(), sender)
            .c(d!())?
            .ok_or_else(|| eg!("sender does not exist"))?;
        let mut to_account: SmartAccount =
            AccountStore::get(ctx.store.clone(), dest).c(d!())?.unwrap_or_default();

        from_account.balance = from_account.balance.checked_sub(balance).map_err(|_| {
            eg!(format!(
                "insufficient balance: {} < {}",
                from_account.balance, balance
            ))
        })?;
        to_account.balance = to_account.balance.checked_add(balance).c(d!())?;

        AccountStore::insert(ctx.store.clone(), sender, &from_account).c(d!())?;
        AccountStore::insert(ctx.store.clone(), dest, &to_account).c(d!())
    }
}

impl<C: Config> AccountAsset<Address> for App<C> {
    fn total_issuance(ctx: &Context) -> Result<Dec> {
        TotalIssuance::get_or_default(ctx.store.clone())
    }

    fn balance(ctx: &Context, who: &Address) -> Result<Dec> {
        Self::account_of(ctx, who).map(|sa| sa.map(|a| a.balance).unwrap_or_default())
    }

    fn nonce(ctx: &Context, who: &Address) -> Result<u64> {
        Self::account_of(ctx, who).map(|sa| sa.map(|a| a.nonce).unwrap_or_default())
    }

    fn transfer(ctx: &Context, sender: &Address, dest: &Address, balance: Dec) -> Result<()> {
        Self::do_transfer(ctx, sender, dest, balance)
    }

    fn mint(ctx: &Context, target: &Address, balance: Dec) -> Result<()> {
        let mut target_account: SmartAccount =
            Self::account_of(ctx, target).c(d!())?.unwrap_or_default();
        target_account.balance = target_account.balance.checked_add(balance).c(d!())?;

        let issuance = Self::total_issuance(ctx).c(d!())?.checked_add(balance).c(d!())?;
        AccountStore::insert(ctx.store.clone(), target, &target_account).c(d!())?;
        TotalIssuance::put(ctx.store.clone(), &issuance)
    }

    fn burn(ctx: &Context, target: &Address, balance: Dec) -> Result<()> {
        let mut target_account: SmartAccount = Self::account_of(ctx, target)
            .c(d!())?
            .ok_or_else(|| eg!("account does not exist"))?;
        target_account.balance = target_account
            .balance
            .checked_sub(balance)
            .map_err(|_| eg!("insufficient balance"))?;

        let issuance = Self::total_issuance(ctx).c(d!())?.checked_sub(balance).c(d!())?;
        AccountStore::insert(ctx.store.clone(), target, &target_account).c(d!())?;
        TotalIssuance::put(ctx.store.clone(), &issuance)
    }
}
