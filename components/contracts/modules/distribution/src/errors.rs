use fp_core::crypto::Address;
use fp_types::{Dec, DecError};
use std::fmt;

pub type DistrResult<T> = std::result::Result<T, DistrError>;

/// Failures of the distribution keeper.
///
/// `InvalidPowerState` and `ReconciliationError` mean the block must be
/// rejected. The others only fail the operation that raised them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DistrError {
    /// Positive fees but no voting power to split them by.
    InvalidPowerState { fees: Dec, total_power: u64 },
    /// A computed amount would go negative.
    ReconciliationError(String),
    InsufficientPoolFunds { requested: Dec, available: Dec },
    NoDelegationDistInfo { delegator: Address, validator: Address },
    NoValidatorDistInfo(Address),
    EmptyDelegationStake { delegator: Address, validator: Address },
    WithdrawAddressAlreadySet(Address),
    WithdrawAddrDisabled,
    BlockedWithdrawAddress(Address),
    /// Module-owned accounts cannot move funds in or out of the community pool.
    BlockedPoolAccount(Address),
    InvalidParams(String),
    InvalidGenesis(String),
    InvariantBroken(String),
    UnknownMigration { from: u64 },
    Arithmetic(DecError),
    /// The account module refused a transfer.
    Account(String),
    /// Storage or staking reported a failure.
    External(String),
}

impl DistrError {
    /// Whether the block containing this error must be rejected.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DistrError::InvalidPowerState { .. }
                | DistrError::ReconciliationError(_)
                | DistrError::InvariantBroken(_)
                | DistrError::Arithmetic(_)
                | DistrError::External(_)
        )
    }

    pub(crate) fn account<E: fmt::Display>(e: E) -> Self {
        DistrError::Account(e.to_string())
    }
}

impl fmt::Display for DistrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DistrError::InvalidPowerState { fees, total_power } => write!(
                f,
                "InvalidPowerState: cannot allocate {} over total voting power {}",
                fees, total_power
            ),
            DistrError::ReconciliationError(msg) => write!(f, "ReconciliationError: {}", msg),
            DistrError::InsufficientPoolFunds { requested, available } => write!(
                f,
                "InsufficientPoolFunds: requested {}, community pool holds {}",
                requested, available
            ),
            DistrError::NoDelegationDistInfo { delegator, validator } => write!(
                f,
                "no delegation distribution info for {} on {}",
                delegator, validator
            ),
            DistrError::NoValidatorDistInfo(v) => {
                write!(f, "no validator distribution info for {}", v)
            }
            DistrError::EmptyDelegationStake { delegator, validator } => {
                write!(f, "delegation of {} on {} has no stake", delegator, validator)
            }
            DistrError::WithdrawAddressAlreadySet(d) => {
                write!(f, "withdraw address of {} is already set", d)
            }
            DistrError::WithdrawAddrDisabled => {
                write!(f, "set withdraw address disabled")
            }
            DistrError::BlockedWithdrawAddress(a) => {
                write!(f, "{} is not allowed to receive funds", a)
            }
            DistrError::BlockedPoolAccount(a) => {
                write!(f, "{} cannot fund or draw from the community pool", a)
            }
            DistrError::InvalidParams(msg) => write!(f, "invalid params: {}", msg),
            DistrError::InvalidGenesis(msg) => write!(f, "invalid genesis: {}", msg),
            DistrError::InvariantBroken(msg) => write!(f, "invariant broken: {}", msg),
            DistrError::UnknownMigration { from } => {
                write!(f, "no migration path from version {}", from)
            }
            DistrError::Arithmetic(e) => write!(f, "arithmetic: {}", e),
            DistrError::Account(msg) => write!(f, "account: {}", msg),
            DistrError::External(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DistrError {}

impl From<DecError> for DistrError {
    fn from(e: DecError) -> Self {
        DistrError::Arithmetic(e)
    }
}

impl From<Box<dyn ruc::RucError>> for DistrError {
    fn from(e: Box<dyn ruc::RucError>) -> Self {
        DistrError::External(e.to_string())
    }
}
