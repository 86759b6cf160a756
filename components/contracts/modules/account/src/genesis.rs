use super::*;
use crate::storage::*;
use fp_core::module::AppModuleGenesis;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub accounts: Vec<(Address, SmartAccount)>,
}

impl GenesisState {
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for (who, _) in self.accounts.iter() {
            if !seen.insert(who) {
                return Err(eg!(format!("duplicate genesis account {}", who)));
            }
        }
        Ok(())
    }
}

impl<C: Config> AppModuleGenesis for App<C> {
    fn init_genesis(&self, ctx: &Context, data: &[u8]) -> Result<()> {
        let genesis: GenesisState = serde_json::from_slice(data).c(d!())?;
        genesis.validate().c(d!())?;

        let mut issuance = Dec::zero();
        for (who, account) in genesis.accounts.iter() {
            issuance = issuance.checked_add(account.balance).c(d!())?;
            AccountStore::insert(ctx.store.clone(), who, account).c(d!())?;
        }
        TotalIssuance::put(ctx.store.clone(), &issuance)
    }

    fn export_genesis(&self, ctx: &Context) -> Result<Vec<u8>> {
        let accounts = AccountStore::iterate(ctx.store.clone()).c(d!())?;
        serde_json::to_vec(&GenesisState { accounts }).c(d!())
    }
}
