pub mod account;
pub mod staking;
