use super::*;
use crate::genesis::GenesisState;
use fp_core::module::AppModuleBasic;

impl<C: Config> AppModuleBasic for App<C> {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn default_genesis(&self) -> Vec<u8> {
        serde_json::to_vec(&GenesisState::default()).unwrap_or_default()
    }

    fn validate_genesis(&self, data: &[u8]) -> Result<()> {
        let genesis: GenesisState = serde_json::from_slice(data).c(d!())?;
        genesis.validate()
    }
}
