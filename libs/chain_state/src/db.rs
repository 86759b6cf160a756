use ruc::*;
use std::{collections::BTreeMap, path::Path};

/// A raw key-value pair.
pub type KValue = (Vec<u8>, Vec<u8>);

/// Write set of one block, `None` means deletion.
pub type StoreBatch = Vec<(Vec<u8>, Option<Vec<u8>>)>;

const HEIGHT_KEY: &[u8] = b"height";

/// Backend of the committed chain state.
pub trait StateDB {
    /// Read a committed value.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// All committed pairs under `prefix`, in ascending key order.
    fn iterate(&self, prefix: &[u8]) -> Result<Vec<KValue>>;

    /// Apply a block's write set atomically and record its height.
    fn commit(&mut self, batch: StoreBatch, height: u64) -> Result<()>;

    /// Height of the last committed block.
    fn height(&self) -> Result<u64>;
}

/// A backend chosen at startup.
pub type DynDB = Box<dyn StateDB + Send + Sync>;

impl<T: StateDB + ?Sized> StateDB for Box<T> {
    #[inline(always)]
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    #[inline(always)]
    fn iterate(&self, prefix: &[u8]) -> Result<Vec<KValue>> {
        (**self).iterate(prefix)
    }

    #[inline(always)]
    fn commit(&mut self, batch: StoreBatch, height: u64) -> Result<()> {
        (**self).commit(batch, height)
    }

    #[inline(always)]
    fn height(&self) -> Result<u64> {
        (**self).height()
    }
}

/// In-memory backend, mostly for tests and simulations.
#[derive(Clone, Debug, Default)]
pub struct MemoryDB {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    height: u64,
}

impl MemoryDB {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateDB for MemoryDB {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn iterate(&self, prefix: &[u8]) -> Result<Vec<KValue>> {
        Ok(self
            .data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn commit(&mut self, batch: StoreBatch, height: u64) -> Result<()> {
        if height < self.height {
            return Err(eg!(format!(
                "commit height {} is lower than current {}",
                height, self.height
            )));
        }
        for (k, v) in batch.into_iter() {
            match v {
                Some(v) => {
                    self.data.insert(k, v);
                }
                None => {
                    self.data.remove(&k);
                }
            }
        }
        self.height = height;
        Ok(())
    }

    #[inline(always)]
    fn height(&self) -> Result<u64> {
        Ok(self.height)
    }
}

/// Persistent backend on top of `sled`.
///
/// User data lives in the default tree, the committed height in a `meta` tree,
/// so prefix iteration never sees bookkeeping keys.
pub struct SledDB {
    db: sled::Db,
    meta: sled::Tree,
}

impl SledDB {
    /// Open or create a database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path).c(d!())?;
        let meta = db.open_tree("meta").c(d!())?;
        Ok(SledDB { db, meta })
    }
}

impl StateDB for SledDB {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.db
            .get(key)
            .c(d!())
            .map(|v| v.map(|iv| iv.to_vec()))
    }

    fn iterate(&self, prefix: &[u8]) -> Result<Vec<KValue>> {
        self.db
            .scan_prefix(prefix)
            .map(|kv| kv.c(d!()).map(|(k, v)| (k.to_vec(), v.to_vec())))
            .collect()
    }

    fn commit(&mut self, batch: StoreBatch, height: u64) -> Result<()> {
        let cur = self.height().c(d!())?;
        if height < cur {
            return Err(eg!(format!(
                "commit height {} is lower than current {}",
                height, cur
            )));
        }

        let mut b = sled::Batch::default();
        for (k, v) in batch.into_iter() {
            match v {
                Some(v) => b.insert(k, v),
                None => b.remove(k),
            }
        }
        self.db.apply_batch(b).c(d!())?;
        self.meta
            .insert(HEIGHT_KEY, &height.to_be_bytes()[..])
            .c(d!())?;
        self.db.flush().c(d!()).map(|_| ())
    }

    fn height(&self) -> Result<u64> {
        match self.meta.get(HEIGHT_KEY).c(d!())? {
            Some(v) if v.len() == 8 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&v);
                Ok(u64::from_be_bytes(buf))
            }
            Some(_) => Err(eg!("corrupted height record")),
            None => Ok(0),
        }
    }
}
