use fp_core::crypto::Address;
use ruc::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Addresses and switches the module needs, resolved once at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    /// Account collecting the fees of the current block.
    pub fee_collector: Address,
    /// Account holding every undistributed reward and the community pool.
    pub module_account: Address,
    /// The only origin allowed to spend the community pool or update params.
    pub authority: Address,
    /// Run the invariant checks at the start of every block.
    pub check_invariants: bool,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        DistributionConfig {
            fee_collector: Address::from_module_name("fee_collector"),
            module_account: Address::from_module_name("distribution"),
            authority: Address::from_module_name("gov"),
            check_invariants: false,
        }
    }
}

impl DistributionConfig {
    /// Defaults overridden by `DISTR_FEE_COLLECTOR`, `DISTR_AUTHORITY`
    /// and `DISTR_CHECK_INVARIANTS`.
    pub fn from_env() -> Result<DistributionConfig> {
        let mut cfg = DistributionConfig::default();

        if let Ok(addr) = std::env::var("DISTR_FEE_COLLECTOR") {
            cfg.fee_collector = addr.parse::<Address>().map_err(|e| eg!(e))?;
        }
        if let Ok(addr) = std::env::var("DISTR_AUTHORITY") {
            cfg.authority = addr.parse::<Address>().map_err(|e| eg!(e))?;
        }
        cfg.check_invariants = std::env::var("DISTR_CHECK_INVARIANTS")
            .unwrap_or_else(|_| "false".to_owned())
            .parse::<bool>()
            .c(d!())?;

        cfg.validate().map(|_| cfg)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DistributionConfig> {
        fs::read_to_string(path)
            .c(d!())
            .and_then(|contents| toml::from_str::<DistributionConfig>(&contents).c(d!()))
            .and_then(|cfg| cfg.validate().map(|_| cfg))
    }

    pub fn validate(&self) -> Result<()> {
        if self.module_account == self.fee_collector {
            return Err(eg!("module account and fee collector must differ"));
        }
        Ok(())
    }

    /// Accounts that can never be set as a withdraw address, nor fund or
    /// draw from the community pool.
    #[inline(always)]
    pub fn is_blocked(&self, addr: &Address) -> bool {
        *addr == self.module_account || *addr == self.fee_collector
    }
}
