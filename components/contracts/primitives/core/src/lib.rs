pub mod context;
pub mod crypto;
pub mod macros;
pub mod module;
pub mod transaction;
