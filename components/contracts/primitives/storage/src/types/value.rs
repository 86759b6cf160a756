use crate::*;
use ruc::*;

/// A type that allow to store a single value.
///
/// The value is stored at:
/// ```nocompile
/// Sha256(Prefix::module_prefix() + Prefix::STORAGE_PREFIX)
/// ```
pub struct StorageValue<Prefix, Value>(core::marker::PhantomData<(Prefix, Value)>);

impl<Prefix, Value> StorageValue<Prefix, Value>
where
    Prefix: StorageInstance,
    Value: Serialize + DeserializeOwned,
{
    pub fn hashed_key() -> Vec<u8> {
        storage_prefix::<Prefix>()
    }

    /// Does the value (explicitly) exist in storage?
    pub fn exists<D: StateDB>(store: Arc<RwLock<State<D>>>) -> Result<bool> {
        store.read().exists(&Self::hashed_key()).c(d!())
    }

    /// Load the value from the provided storage instance.
    pub fn get<D: StateDB>(store: Arc<RwLock<State<D>>>) -> Result<Option<Value>> {
        let output = store.read().get(&Self::hashed_key()).c(d!())?;
        match output {
            Some(val) => serde_json::from_slice::<Value>(&val).c(d!()).map(Some),
            None => Ok(None),
        }
    }

    /// Store a value under this hashed key into the provided storage instance.
    pub fn put<D: StateDB>(store: Arc<RwLock<State<D>>>, val: &Value) -> Result<()> {
        let v = serde_json::to_vec(val).c(d!())?;
        store.write().set(&Self::hashed_key(), v);
        Ok(())
    }

    /// Take a value from storage, removing it afterwards.
    pub fn delete<D: StateDB>(store: Arc<RwLock<State<D>>>) {
        store.write().delete(&Self::hashed_key());
    }
}

impl<Prefix, Value> StorageValue<Prefix, Value>
where
    Prefix: StorageInstance,
    Value: Serialize + DeserializeOwned + Default,
{
    /// Load the value, or its default if it was never stored.
    pub fn get_or_default<D: StateDB>(store: Arc<RwLock<State<D>>>) -> Result<Value> {
        Self::get(store).map(|v| v.unwrap_or_default())
    }
}
