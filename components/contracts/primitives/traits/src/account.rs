use fp_core::context::Context;
use fp_types::Dec;
use ruc::Result;

pub trait AccountAsset<Address> {
    /// Total units held by all accounts.
    fn total_issuance(ctx: &Context) -> Result<Dec>;

    /// The balance of `who`.
    fn balance(ctx: &Context, who: &Address) -> Result<Dec>;

    /// The nonce of `who`.
    fn nonce(ctx: &Context, who: &Address) -> Result<u64>;

    /// Move `balance` from `sender` to `dest`.
    ///
    /// Fails without side effects if `sender` cannot afford it.
    fn transfer(ctx: &Context, sender: &Address, dest: &Address, balance: Dec) -> Result<()>;

    /// Create `balance` new units on `target`.
    fn mint(ctx: &Context, target: &Address, balance: Dec) -> Result<()>;

    /// Destroy `balance` units held by `target`.
    fn burn(ctx: &Context, target: &Address, balance: Dec) -> Result<()>;
}
