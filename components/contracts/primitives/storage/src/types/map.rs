use crate::*;
use ruc::*;

/// A type that allow to store value for given key. Allowing to insert/remove/iterate on values.
///
/// Each value is stored at:
/// ```nocompile
/// Sha256(Prefix::module_prefix() + Prefix::STORAGE_PREFIX)
///     ++ encode(key)
/// ```
///
pub struct StorageMap<Prefix, Key, Value>(core::marker::PhantomData<(Prefix, Key, Value)>);

impl<Prefix, Key, Value> StorageMap<Prefix, Key, Value>
where
    Prefix: StorageInstance,
    Key: StorageKey,
    Value: Serialize + DeserializeOwned,
{
    pub fn prefix() -> Vec<u8> {
        storage_prefix::<Prefix>()
    }

    /// Get the storage key used to fetch a value corresponding to a specific key.
    pub fn build_key_for(key: &Key) -> Vec<u8> {
        [Self::prefix(), key.encode_key()].concat()
    }

    /// Does the value (explicitly) exist in storage?
    pub fn contains_key<D: StateDB>(store: Arc<RwLock<State<D>>>, key: &Key) -> Result<bool> {
        store.read().exists(&Self::build_key_for(key)).c(d!())
    }

    /// Load the value associated with the given key from the map.
    pub fn get<D: StateDB>(store: Arc<RwLock<State<D>>>, key: &Key) -> Result<Option<Value>> {
        let output = store.read().get(&Self::build_key_for(key)).c(d!())?;
        match output {
            Some(val) => serde_json::from_slice::<Value>(&val).c(d!()).map(Some),
            None => Ok(None),
        }
    }

    /// Store a value to be associated with the given key from the map.
    pub fn insert<D: StateDB>(store: Arc<RwLock<State<D>>>, key: &Key, val: &Value) -> Result<()> {
        let v = serde_json::to_vec(val).c(d!())?;
        store.write().set(&Self::build_key_for(key), v);
        Ok(())
    }

    /// Remove the value under a key.
    pub fn remove<D: StateDB>(store: Arc<RwLock<State<D>>>, key: &Key) {
        store.write().delete(&Self::build_key_for(key));
    }

    /// Iter over all value of the storage, in key order.
    pub fn iterate<D: StateDB>(store: Arc<RwLock<State<D>>>) -> Result<Vec<(Key, Value)>> {
        let prefix = Self::prefix();
        let kvs = store.read().iterate(&prefix).c(d!())?;

        kvs.into_iter()
            .map(|(k, v)| -> Result<(Key, Value)> {
                let key = Key::decode_key(&k[prefix.len()..])
                    .ok_or_else(|| eg!("malformed storage key"))?;
                let value = serde_json::from_slice::<Value>(&v).c(d!())?;
                Ok((key, value))
            })
            .collect()
    }
}
