pub mod dec;

pub use dec::{Dec, DecError, PRECISION};
