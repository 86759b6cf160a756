use crate::*;
use ruc::*;

/// A type that allow to store values for `(key1, key2)` couple.
///
/// Each value is stored at:
/// ```nocompile
/// Sha256(Prefix::module_prefix() + Prefix::STORAGE_PREFIX)
///     ++ encode(key1) ++ encode(key2)
/// ```
///
/// All values sharing `key1` are contiguous, so they can be listed or
/// removed together.
pub struct StorageDoubleMap<Prefix, Key1, Key2, Value>(
    core::marker::PhantomData<(Prefix, Key1, Key2, Value)>,
);

impl<Prefix, Key1, Key2, Value> StorageDoubleMap<Prefix, Key1, Key2, Value>
where
    Prefix: StorageInstance,
    Key1: StorageKey,
    Key2: StorageKey,
    Value: Serialize + DeserializeOwned,
{
    pub fn prefix() -> Vec<u8> {
        storage_prefix::<Prefix>()
    }

    fn build_prefix_for(k1: &Key1) -> Vec<u8> {
        [Self::prefix(), k1.encode_key()].concat()
    }

    /// Get the storage key used to fetch a value corresponding to a specific key.
    pub fn build_key_for(k1: &Key1, k2: &Key2) -> Vec<u8> {
        [Self::prefix(), k1.encode_key(), k2.encode_key()].concat()
    }

    pub fn contains_key<D: StateDB>(
        store: Arc<RwLock<State<D>>>,
        k1: &Key1,
        k2: &Key2,
    ) -> Result<bool> {
        store.read().exists(&Self::build_key_for(k1, k2)).c(d!())
    }

    pub fn get<D: StateDB>(
        store: Arc<RwLock<State<D>>>,
        k1: &Key1,
        k2: &Key2,
    ) -> Result<Option<Value>> {
        let output = store.read().get(&Self::build_key_for(k1, k2)).c(d!())?;
        match output {
            Some(val) => serde_json::from_slice::<Value>(&val).c(d!()).map(Some),
            None => Ok(None),
        }
    }

    pub fn insert<D: StateDB>(
        store: Arc<RwLock<State<D>>>,
        k1: &Key1,
        k2: &Key2,
        val: &Value,
    ) -> Result<()> {
        let v = serde_json::to_vec(val).c(d!())?;
        store.write().set(&Self::build_key_for(k1, k2), v);
        Ok(())
    }

    pub fn remove<D: StateDB>(store: Arc<RwLock<State<D>>>, k1: &Key1, k2: &Key2) {
        store.write().delete(&Self::build_key_for(k1, k2));
    }

    /// All `(key2, value)` pairs under `k1`, in `key2` order.
    pub fn iterate_prefix<D: StateDB>(
        store: Arc<RwLock<State<D>>>,
        k1: &Key1,
    ) -> Result<Vec<(Key2, Value)>> {
        let prefix = Self::build_prefix_for(k1);
        let kvs = store.read().iterate(&prefix).c(d!())?;

        kvs.into_iter()
            .map(|(k, v)| -> Result<(Key2, Value)> {
                let k2 = Key2::decode_key(&k[prefix.len()..])
                    .ok_or_else(|| eg!("malformed storage key"))?;
                let value = serde_json::from_slice::<Value>(&v).c(d!())?;
                Ok((k2, value))
            })
            .collect()
    }

    /// Remove every value under `k1`.
    pub fn remove_prefix<D: StateDB>(store: Arc<RwLock<State<D>>>, k1: &Key1) -> Result<()> {
        let prefix = Self::build_prefix_for(k1);
        let keys = store.read().iterate(&prefix).c(d!())?;
        let mut s = store.write();
        keys.into_iter().for_each(|(k, _)| s.delete(&k));
        Ok(())
    }

    /// Iter over all values of the storage, ordered by `(key1, key2)`.
    pub fn iterate<D: StateDB>(
        store: Arc<RwLock<State<D>>>,
    ) -> Result<Vec<(Key1, Key2, Value)>> {
        let prefix = Self::prefix();
        let kvs = store.read().iterate(&prefix).c(d!())?;

        kvs.into_iter()
            .map(|(k, v)| -> Result<(Key1, Key2, Value)> {
                let raw = &k[prefix.len()..];
                if raw.len() != Key1::LEN + Key2::LEN {
                    return Err(eg!("malformed storage key"));
                }
                let k1 = Key1::decode_key(&raw[..Key1::LEN])
                    .ok_or_else(|| eg!("malformed storage key"))?;
                let k2 = Key2::decode_key(&raw[Key1::LEN..])
                    .ok_or_else(|| eg!("malformed storage key"))?;
                let value = serde_json::from_slice::<Value>(&v).c(d!())?;
                Ok((k1, k2, value))
            })
            .collect()
    }
}
