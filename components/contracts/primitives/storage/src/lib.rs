//!
//! # Module storage
//!
//! `generate_storage!` declares typed storage items of a module:
//!
//! ```ignore
//! generate_storage!(Distribution, FeePool => Value<FeePool>);
//! generate_storage!(Distribution, WithdrawAddr => Map<Address, Address>);
//! generate_storage!(Distribution, HistoricalRewards => DoubleMap<Address, u64, Record>);
//! ```
//!
//! Every item lives under `sha256(module ++ item)`, followed by the
//! fixed-width encoding of its keys, so iteration is in key order.
//! Values are stored as JSON.
//!

pub mod hash;
mod types;

pub use chain_state::{State, StateDB};
pub use fp_core::context::{Arc, RwLock};
pub use hash::{Sha256, StorageHasher};
pub use paste;
pub use serde::{de::DeserializeOwned, Serialize};
pub use types::*;

/// An item of a module storage.
pub trait StorageInstance {
    /// Prefix of a module to use in the storage.
    fn module_prefix() -> &'static str;

    /// Prefix given to a storage to isolate from other storages in the module.
    const STORAGE_PREFIX: &'static str;
}

#[inline(always)]
pub(crate) fn storage_prefix<P: StorageInstance>() -> Vec<u8> {
    let raw = [P::module_prefix(), P::STORAGE_PREFIX].concat();
    Sha256::hash(raw.as_bytes()).to_vec()
}

#[macro_export]
macro_rules! generate_storage {
    ($module:ident, $name:ident => Value<$vt:ty>) => {
        $crate::paste::paste! {
            #[doc(hidden)]
            pub struct [<$name Instance>];

            impl $crate::StorageInstance for [<$name Instance>] {
                fn module_prefix() -> &'static str {
                    stringify!($module)
                }

                const STORAGE_PREFIX: &'static str = stringify!($name);
            }

            pub type $name = $crate::StorageValue<[<$name Instance>], $vt>;
        }
    };
    ($module:ident, $name:ident => Map<$kt:ty, $vt:ty>) => {
        $crate::paste::paste! {
            #[doc(hidden)]
            pub struct [<$name Instance>];

            impl $crate::StorageInstance for [<$name Instance>] {
                fn module_prefix() -> &'static str {
                    stringify!($module)
                }

                const STORAGE_PREFIX: &'static str = stringify!($name);
            }

            pub type $name = $crate::StorageMap<[<$name Instance>], $kt, $vt>;
        }
    };
    ($module:ident, $name:ident => DoubleMap<$kt1:ty, $kt2:ty, $vt:ty>) => {
        $crate::paste::paste! {
            #[doc(hidden)]
            pub struct [<$name Instance>];

            impl $crate::StorageInstance for [<$name Instance>] {
                fn module_prefix() -> &'static str {
                    stringify!($module)
                }

                const STORAGE_PREFIX: &'static str = stringify!($name);
            }

            pub type $name = $crate::StorageDoubleMap<[<$name Instance>], $kt1, $kt2, $vt>;
        }
    };
}
