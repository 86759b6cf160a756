//!
//! # Chain State
//!
//! A key-value chain state with two write buffers on top of the committed data:
//!
//! - a block cache, flushed into the backend on `commit(height)`
//!   and dropped on `discard()`
//! - a transaction session, merged into the block cache on `commit_session()`
//!   and dropped on `discard_session()`
//!
//! Reads always see `session -> cache -> committed`, and every iteration is
//! returned in ascending key order.
//!

pub mod db;
pub mod state;

pub use db::{DynDB, KValue, MemoryDB, SledDB, StateDB, StoreBatch};
pub use state::{ChainState, State};

#[cfg(test)]
mod tests;
