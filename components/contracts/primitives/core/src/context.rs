use crate::crypto::Address;
use chain_state::{ChainState, DynDB, MemoryDB, State};
pub use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
pub use std::sync::Arc;

pub type Store = State<DynDB>;

/// Header of the block being executed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: u64,
    /// Unix seconds, as agreed by consensus.
    pub time: u64,
    pub proposer: Option<Address>,
}

#[derive(Clone)]
pub struct Context {
    pub store: Arc<RwLock<Store>>,
    pub header: BlockHeader,
    pub header_hash: Vec<u8>,
    pub chain_id: String,
    pub check_tx: bool,
}

impl Context {
    pub fn new(cs: Arc<RwLock<ChainState<DynDB>>>) -> Self {
        Context {
            store: Arc::new(RwLock::new(Store::new(cs))),
            header: Default::default(),
            header_hash: vec![],
            chain_id: "".to_string(),
            check_tx: false,
        }
    }

    /// A context over a fresh in-memory chain state.
    pub fn in_memory(name: &str) -> Self {
        let db: DynDB = Box::new(MemoryDB::new());
        Self::new(Arc::new(RwLock::new(ChainState::new(db, name.to_string()))))
    }

    /// A copy whose writes never reach this context's store.
    ///
    /// Reads still see everything staged so far in the block.
    pub fn fork(&self) -> Self {
        let staged = self.store.read().clone();
        Context {
            store: Arc::new(RwLock::new(staged)),
            header: self.header.clone(),
            header_hash: self.header_hash.clone(),
            chain_id: self.chain_id.clone(),
            check_tx: true,
        }
    }
}

impl Context {
    pub fn commit_store(&self) -> Arc<RwLock<Store>> {
        self.store.clone()
    }

    pub fn block_header(&self) -> BlockHeader {
        self.header.clone()
    }

    pub fn header_hash(&self) -> Vec<u8> {
        self.header_hash.clone()
    }

    pub fn block_height(&self) -> u64 {
        self.header.height
    }

    pub fn block_time(&self) -> u64 {
        self.header.time
    }

    pub fn chain_id(&self) -> String {
        self.chain_id.clone()
    }

    pub fn is_check_tx(&self) -> bool {
        self.check_tx
    }
}
