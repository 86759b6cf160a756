use crate::db::{KValue, StateDB, StoreBatch};
use parking_lot::RwLock;
use ruc::*;
use sha2::{Digest, Sha256};
use std::{collections::BTreeMap, mem, sync::Arc};

type WriteSet = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// Committed chain state.
pub struct ChainState<D: StateDB> {
    name: String,
    db: D,
}

impl<D: StateDB> ChainState<D> {
    #[allow(missing_docs)]
    pub fn new(db: D, name: String) -> Self {
        ChainState { name, db }
    }

    #[inline(always)]
    #[allow(missing_docs)]
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.db.get(key).c(d!())
    }

    #[inline(always)]
    #[allow(missing_docs)]
    pub fn iterate(&self, prefix: &[u8]) -> Result<Vec<KValue>> {
        self.db.iterate(prefix).c(d!())
    }

    #[inline(always)]
    #[allow(missing_docs)]
    pub fn height(&self) -> Result<u64> {
        self.db.height().c(d!())
    }

    /// Persist a block's write set.
    pub fn commit(&mut self, batch: StoreBatch, height: u64) -> Result<()> {
        log::debug!(target: "chain_state", "{}: commit {} writes at height {}",
            self.name, batch.len(), height);
        self.db.commit(batch, height).c(d!())
    }

    /// Sha256 over every committed pair in key order.
    ///
    /// Two nodes that executed the same blocks must report the same root.
    pub fn root_hash(&self) -> Result<Vec<u8>> {
        let mut hasher = Sha256::new();
        for (k, v) in self.iterate(&[]).c(d!())? {
            hasher.update(&(k.len() as u64).to_be_bytes());
            hasher.update(&k);
            hasher.update(&(v.len() as u64).to_be_bytes());
            hasher.update(&v);
        }
        Ok(hasher.finalize().to_vec())
    }
}

/// A writable view over `ChainState`.
///
/// Writes go to the session first. A failed transaction calls `discard_session`,
/// a successful one `commit_session`. At the end of the block `commit` persists
/// everything; a rejected block calls `discard` and leaves no trace.
pub struct State<D: StateDB> {
    chain_state: Arc<RwLock<ChainState<D>>>,
    cache: WriteSet,
    session: WriteSet,
}

impl<D: StateDB> Clone for State<D> {
    fn clone(&self) -> Self {
        State {
            chain_state: self.chain_state.clone(),
            cache: self.cache.clone(),
            session: self.session.clone(),
        }
    }
}

impl<D: StateDB> State<D> {
    #[allow(missing_docs)]
    pub fn new(chain_state: Arc<RwLock<ChainState<D>>>) -> Self {
        State {
            chain_state,
            cache: BTreeMap::new(),
            session: BTreeMap::new(),
        }
    }

    #[inline(always)]
    #[allow(missing_docs)]
    pub fn chain_state(&self) -> Arc<RwLock<ChainState<D>>> {
        self.chain_state.clone()
    }

    #[inline(always)]
    #[allow(missing_docs)]
    pub fn height(&self) -> Result<u64> {
        self.chain_state.read().height()
    }

    /// Read through `session -> cache -> committed`.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(v) = self.session.get(key) {
            return Ok(v.clone());
        }
        if let Some(v) = self.cache.get(key) {
            return Ok(v.clone());
        }
        self.chain_state.read().get(key)
    }

    #[inline(always)]
    #[allow(missing_docs)]
    pub fn exists(&self, key: &[u8]) -> Result<bool> {
        self.get(key).map(|v| v.is_some())
    }

    #[inline(always)]
    #[allow(missing_docs)]
    pub fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.session.insert(key.to_vec(), Some(value));
    }

    #[inline(always)]
    #[allow(missing_docs)]
    pub fn delete(&mut self, key: &[u8]) {
        self.session.insert(key.to_vec(), None);
    }

    /// Merged view of all pairs under `prefix`, ascending by key.
    pub fn iterate(&self, prefix: &[u8]) -> Result<Vec<KValue>> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self
            .chain_state
            .read()
            .iterate(prefix)
            .c(d!())?
            .into_iter()
            .collect();

        for layer in [&self.cache, &self.session].iter() {
            layer
                .range(prefix.to_vec()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .for_each(|(k, v)| match v {
                    Some(v) => {
                        merged.insert(k.clone(), v.clone());
                    }
                    None => {
                        merged.remove(k);
                    }
                });
        }

        Ok(merged.into_iter().collect())
    }

    /// Keep the writes of the current transaction.
    pub fn commit_session(&mut self) {
        let session = mem::take(&mut self.session);
        self.cache.extend(session);
    }

    /// Drop the writes of the current transaction.
    #[inline(always)]
    pub fn discard_session(&mut self) {
        self.session.clear();
    }

    /// Persist the whole block, pending session included.
    pub fn commit(&mut self, height: u64) -> Result<u64> {
        self.commit_session();
        let batch = mem::take(&mut self.cache).into_iter().collect::<StoreBatch>();
        self.chain_state.write().commit(batch, height).c(d!())?;
        Ok(height)
    }

    /// Drop the whole block.
    pub fn discard(&mut self) {
        self.session.clear();
        self.cache.clear();
    }
}
