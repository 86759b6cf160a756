use crate::errors::{DistrError, DistrResult};
use fp_core::crypto::Address;
use fp_types::Dec;
use serde::{Deserialize, Serialize};

/// Chain parameters of the module, changed only by the authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Share of every block's fees diverted to the community pool.
    pub community_tax: Dec,
    pub withdraw_addr_enabled: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            // 2%
            community_tax: Dec::from_ratio(2u64, 100u64).unwrap_or_default(),
            withdraw_addr_enabled: true,
        }
    }
}

impl Params {
    pub fn validate(&self) -> DistrResult<()> {
        if self.community_tax > Dec::one() {
            return Err(DistrError::InvalidParams(format!(
                "community tax must be within [0, 1], got {}",
                self.community_tax
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePool {
    pub community_pool: Dec,
}

/// A closed period of a validator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorHistoricalRewards {
    /// Reward per unit of stake accumulated from period 0 up to this one.
    pub cumulative_reward_ratio: Dec,
    /// Delegations, slash events and the current period pointing here.
    pub reference_count: u32,
}

/// The open period of a validator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorCurrentRewards {
    /// Reward per unit of stake since the last closed period.
    pub reward_ratio: Dec,
    pub period: u64,
}

/// Where a delegation was last settled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorStartingInfo {
    pub previous_period: u64,
    pub stake: Dec,
    pub height: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSlashEvent {
    /// Period closed by the slash.
    pub validator_period: u64,
    pub fraction: Dec,
}

/// Result of a withdrawal request.
///
/// Withdrawing nothing is a success, callers only use it for reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawOutcome {
    Withdrawn { amount: Dec, to: Address },
    NoRewards,
}

impl WithdrawOutcome {
    pub fn amount(&self) -> Dec {
        match self {
            WithdrawOutcome::Withdrawn { amount, .. } => *amount,
            WithdrawOutcome::NoRewards => Dec::zero(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationDelegatorReward {
    pub validator_address: Address,
    pub reward: Dec,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationTotalRewards {
    pub rewards: Vec<DelegationDelegatorReward>,
    pub total: Dec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        let params = Params::default();
        assert_eq!(params.community_tax, "0.02".parse().unwrap());
        assert!(params.validate().is_ok());

        let params = Params {
            community_tax: "1.000000000000000001".parse().unwrap(),
            withdraw_addr_enabled: false,
        };
        assert!(matches!(params.validate(), Err(DistrError::InvalidParams(_))));
    }
}
